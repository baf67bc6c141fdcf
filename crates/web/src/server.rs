//! HTTP server for the Wordlens web shell.

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use wordlens_core::WordlensConfig;

use crate::error::{WebError, WebResult};
use crate::router::{build_router, AppState};

/// HTTP server for the web shell.
pub struct WebServer {
    addr: SocketAddr,
    request_logging: bool,
    router: Router,
}

impl WebServer {
    /// Create a server with the HTTP fetcher and jieba counter.
    pub fn new(config: WordlensConfig) -> WebResult<Self> {
        Self::with_state(AppState::new(config))
    }

    /// Create a server around prepared state.
    pub fn with_state(state: AppState) -> WebResult<Self> {
        let addr = state.config.bind_addr()?;
        let request_logging = state.config.http.enable_request_logging;
        let router = build_router(state);

        Ok(Self {
            addr,
            request_logging,
            router,
        })
    }

    /// Get the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> WebResult<()> {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            WebError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", self.addr, e),
            ))
        })?;

        info!("Wordlens listening on http://{}", self.addr);
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> WebResult<()> {
        let router = self.build_router_with_middleware();

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server shutdown complete");
        Ok(())
    }

    fn build_router_with_middleware(&self) -> Router {
        let mut router = self.router.clone();

        if self.request_logging {
            router = router.layer(tower_http::trace::TraceLayer::new_for_http());
        }

        router
    }
}

/// Build and run a server from configuration.
pub async fn start_server(config: WordlensConfig) -> WebResult<()> {
    WebServer::new(config)?.run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, shutting down..."),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down...");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
