//! Observability HTTP Routes
//!
//! Liveness probe reporting the running build.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    /// Status of this process
    pub fn current() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Health check route at root /health
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_crate_version() {
        let json = serde_json::to_value(HealthResponse::current()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")})
        );
    }

    #[tokio::test]
    async fn test_handler_returns_current_status() {
        let Json(body) = health_handler().await;
        assert_eq!(body, HealthResponse::current());
    }
}
