//! Portal server lifecycle

use std::future::Future;

use axum::Router;
use kenq_config::PortalConfig;
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    routes,
    state::AppState,
};

/// Bound configuration plus the state every handler shares
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(config: PortalConfig) -> ApiResult<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> ApiResult<Router> {
        routes::app(self.state.clone())
    }

    /// Serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router()?;
        let address = self.state.config.bind_address();
        info!("Binding to {address}");

        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind {address}: {e}")))?;
        info!("Portal running on {address}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        info!("Portal shut down");
        Ok(())
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> ApiResult<()> {
        self.serve(shutdown_signal()).await
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
