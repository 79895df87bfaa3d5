//! GatewayServer: binds the listener and serves the router

use super::handlers::AppState;
use super::router::build_router;
use crate::config::GatewayConfig;
use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// HTTP server for the gateway
///
/// # Example
///
/// ```ignore
/// let config = GatewayConfig::load(".env")?;
/// GatewayServer::new(config).serve().await?;
/// ```
pub struct GatewayServer {
    state: AppState,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Address the server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        self.state.config.listen_addr
    }

    /// Build the router without binding
    pub fn build(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve the application with graceful shutdown
    ///
    /// Fails if the listener cannot bind. Otherwise runs until SIGTERM or
    /// Ctrl+C; in-flight requests are allowed to finish.
    pub async fn serve(self) -> Result<()> {
        let addr = self.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> Result<()> {
        let app = self.build();

        tracing::info!(
            addr = %listener.local_addr()?,
            table = %self.state.config.table,
            "Server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_comes_from_config() {
        let addr: SocketAddr = "127.0.0.1:7000".parse().unwrap();
        let server = GatewayServer::new(
            GatewayConfig::new("s", "invoices", "postgres://localhost/db").with_listen_addr(addr),
        );
        assert_eq!(server.listen_addr(), addr);
    }

    #[tokio::test]
    async fn test_serve_fails_when_address_is_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let server = GatewayServer::new(
            GatewayConfig::new("s", "invoices", "postgres://localhost/db").with_listen_addr(addr),
        );
        let err = server.serve().await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }
}
