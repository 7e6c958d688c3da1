//! # HTTP Server
//!
//! Builds the router and runs it until a shutdown signal, then drains
//! in-flight requests for a bounded grace period.

use std::future::{Future, IntoFuture};
use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::observability_routes::health_routes;
use super::student_routes::{student_routes, StudentsState};
use crate::storage::StudentStorage;

/// HTTP server for the students API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given storage
    pub fn with_storage(config: HttpServerConfig, storage: Arc<dyn StudentStorage>) -> Self {
        let router = Self::build_router(&config, storage);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, storage: Arc<dyn StudentStorage>) -> Router {
        let students_state = Arc::new(StudentsState::new(storage));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", student_routes(students_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the configured socket address
    pub fn socket_addr(&self) -> &str {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// A bind failure is returned to the caller and is fatal at startup.
    pub async fn start<F>(self, shutdown: F) -> Result<(), io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let grace = self.config.shutdown_grace();
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "server started");

        let draining = Arc::new(Notify::new());
        let notify = Arc::clone(&draining);

        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("shutting down the server");
                notify.notify_one();
            })
            .into_future();

        let deadline = async move {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = server => {
                result?;
                info!("server shut down gracefully");
            }
            _ = deadline => {
                warn!(
                    grace_secs = grace.as_secs(),
                    "grace period elapsed, closing remaining connections"
                );
            }
        }

        Ok(())
    }
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "received signal, shutting down"),
        _ = terminate => info!(signal = "SIGTERM", "received signal, shutting down"),
    }
}
