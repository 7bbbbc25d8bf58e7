//! Process host: one listener for the HTTP API and the `/ws` channel.
//!
//! [`build_router`] composes the routes. HTTP routes sit behind the
//! access gateway and CORS layers; `/ws` does not. [`serve`] runs the
//! router on a bound listener until the shutdown future resolves, then
//! tears down the connection registry.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::gateway;
use crate::ws::handler::ws_handler;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let policy = state.origin_policy.clone();

    let http = api::build_router();
    #[cfg(feature = "swagger-ui")]
    let http = http.merge(swagger_ui());
    let http = http
        .layer(gateway::cors_layer(&policy))
        .layer(axum::middleware::from_fn_with_state(
            policy,
            gateway::enforce_origin,
        ));

    Router::new()
        .merge(http)
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use utoipa::OpenApi;

    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi())
}

/// Serves `state` on `listener` until `shutdown` resolves.
///
/// On return every registered connection has been unregistered and told
/// to close.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let registry = Arc::clone(state.registry());
    let app = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "server listening (HTTP + WebSocket)");
    }

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    let closed = registry.clear().await;
    tracing::info!(closed, "connection registry torn down");
    result
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
