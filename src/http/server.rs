//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (tracing, request ID, read timeout)
//! - Serve connections from the listener, bounding how long a client may
//!   take to send its request headers
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto::Builder, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, RelayConfig};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::relay::{relay_handler, RelayContext};

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    context: Arc<RelayContext>,
    read_timeout: Duration,
}

impl RelayServer {
    /// Create a new HTTP server from a validated configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, ConfigError> {
        let context = Arc::new(RelayContext::from_config(config)?);
        let router = Self::build_router(config, context.clone());
        Ok(Self {
            router,
            context,
            read_timeout: Duration::from_secs(config.timeouts.read_secs),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, context: Arc<RelayContext>) -> Router {
        Router::new()
            .route("/", get(relay_handler))
            .route("/{*path}", get(relay_handler))
            .with_state(context)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.read_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    ///
    /// The read timeout applies twice: hyper drops a connection whose request
    /// headers do not arrive in time, and `TimeoutLayer` answers 408 when the
    /// handler does not produce response headers in time.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.context.root.display(),
            codec = %self.context.endpoint,
            "HTTP server starting"
        );

        let mut builder = Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.read_timeout);
        let graceful = GracefulShutdown::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            continue;
                        }
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    let conn = builder
                        .serve_connection(TokioIo::new(stream), service)
                        .into_owned();
                    let conn = graceful.watch(conn);
                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        drop(listener);
        graceful.shutdown().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
