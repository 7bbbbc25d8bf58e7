//! Shared helpers for integration tests.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use fanchat_gateway::app_state::AppState;
use fanchat_gateway::config::GatewayConfig;
use fanchat_gateway::domain::ConnectionRegistry;
use fanchat_gateway::provider::{ChatCompletion, ChatRequest, CompletionProvider, ProviderError};
use fanchat_gateway::server;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Origin present in every test allow-list.
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Loads a config from the given variables only.
pub fn config(vars: &[(&str, &str)]) -> GatewayConfig {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    GatewayConfig::from_lookup(|key| map.get(key).cloned()).expect("test config")
}

/// Provider returning a fixed completion and counting calls.
#[derive(Debug)]
pub struct CountingProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl CountingProvider {
    /// Replies with a single choice carrying `text`.
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Fails every call with a 502 status.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of completed `complete` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for CountingProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(ChatCompletion::from_text(text.clone())),
            None => Err(ProviderError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        }
    }
}

/// Builds state over `provider` with the test allow-list.
pub fn state(provider: Arc<dyn CompletionProvider>, vars: &[(&str, &str)]) -> AppState {
    let mut all = vec![("ALLOWED_ORIGINS", ALLOWED_ORIGIN)];
    all.extend_from_slice(vars);
    AppState::new(&config(&all), provider)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// A running gateway.
pub struct Gateway {
    /// Bound address.
    pub addr: SocketAddr,
    /// Registry shared with the server.
    pub registry: Arc<ConnectionRegistry>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl Gateway {
    /// Starts the full server on an ephemeral port.
    pub async fn start(state: AppState) -> Self {
        let registry = Arc::clone(state.registry());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind gateway");
        let addr = listener.local_addr().expect("gateway addr");
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve(listener, state, async move {
            let _ = rx.await;
        }));
        Self {
            addr,
            registry,
            shutdown: Some(tx),
            handle,
        }
    }

    /// WebSocket URL of the relay.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Waits until the registry holds exactly `n` members.
    pub async fn wait_for_members(&self, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while self.registry.len().await != n {
            assert!(
                tokio::time::Instant::now() < deadline,
                "registry never reached {n} members"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Signals shutdown and waits for the server task.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), &mut self.handle).await;
    }
}
