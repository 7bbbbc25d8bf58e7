//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{Environment, GatewayConfig};
use crate::domain::{BroadcastRelay, ConnectionRegistry};
use crate::gateway::OriginPolicy;
use crate::provider::CompletionProvider;
use crate::service::QuestionService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Question answering over the completions provider.
    pub question_service: Arc<QuestionService>,
    /// Fan-out relay (and, through it, the connection registry).
    pub relay: BroadcastRelay,
    /// Origin allow-list for the HTTP API.
    pub origin_policy: OriginPolicy,
    /// Deployment mode; controls error detail exposure.
    pub environment: Environment,
    /// Outbound queue size for each new WebSocket connection.
    pub ws_outbound_capacity: usize,
}

impl AppState {
    /// Wires the state from configuration and a provider, with a fresh,
    /// empty connection registry.
    #[must_use]
    pub fn new(config: &GatewayConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            question_service: Arc::new(QuestionService::new(provider)),
            relay: BroadcastRelay::new(registry),
            origin_policy: OriginPolicy::new(config.allowed_origins.iter().cloned()),
            environment: config.environment,
            ws_outbound_capacity: config.ws_outbound_capacity,
        }
    }

    /// Returns the connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        self.relay.registry()
    }
}
