pub mod health;
pub mod scan;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Settings;
use crate::engine::VerdictEngine;

pub use health::health_check;
pub use scan::{fail_closed_response, scan_token, ScanRequest};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<VerdictEngine>,
}

impl AppState {
    pub fn new(engine: VerdictEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Every response from this router carries either a health document or a
/// complete verdict contract.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/scan",
            post(scan::scan_token).fallback(scan::method_not_allowed),
        )
        .route("/health", get(health::health_check))
        .fallback(scan::not_found)
        .layer(CatchPanicLayer::custom(scan::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured `host:port`. The host may be a name such as `localhost`.
pub async fn bind_listener(settings: &Settings) -> std::io::Result<TcpListener> {
    TcpListener::bind(settings.server_address()).await
}
