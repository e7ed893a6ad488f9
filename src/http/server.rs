//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the request adapter from the handler factory
//! - Mount the adapter under the configured prefix
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapter::{HandlerFactory, HandlerOptions, RequestAdapter};
use crate::config::ServiceConfig;
use crate::host::axum::{routed_handler, unrouted_handler, AdapterState};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::shutdown::wait as wait_for_shutdown;

/// HTTP server exposing the adapter.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server whose adapter delegates to handlers built by `factory`.
    pub fn new<F>(config: ServiceConfig, factory: &F, options: HandlerOptions) -> Self
    where
        F: HandlerFactory + ?Sized,
    {
        let adapter = RequestAdapter::new(factory, options).with_route_key(&config.mount.route_key);
        let state = AdapterState {
            adapter: Arc::new(adapter),
            max_body_bytes: config.mount.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AdapterState) -> Router {
        Router::new()
            .route(&config.mount.catch_all_route(), any(routed_handler))
            .route(&config.mount.bare_route(), any(unrouted_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.mount.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// A clone of the router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.mount.prefix,
            route_key = %self.config.mount.route_key,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
