//! Axum-based backend server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::error::BackendError;

/// Body returned by the health route.
pub const HEALTH_MESSAGE: &str = "voting backend is running";

/// The backend's routes, with permissive CORS applied.
pub fn router() -> Router {
    Router::new()
        .route("/", get(health))
        .layer(CorsLayer::permissive())
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

pub struct BackendServer {
    pub port: u16,
}

impl BackendServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Listen on all interfaces until the process is stopped.
    pub async fn serve(&self) -> Result<(), BackendError> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| BackendError::Bind {
                addr: addr.clone(),
                source,
            })?;
        tracing::info!("Backend running at http://localhost:{}", self.port);
        axum::serve(listener, router()).await?;
        Ok(())
    }
}
