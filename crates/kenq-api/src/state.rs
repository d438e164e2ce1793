//! Application state for the portal server

use std::{sync::Arc, time::Instant};

use kenq_config::PortalConfig;
use kenq_domain::UniversityCatalog;
use kenq_http::{shared_client, BackendApi, HttpConfig};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    pages::Pages,
    session::SessionManager,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<PortalConfig>,
    /// Backend API client
    pub backend: Arc<dyn BackendApi>,
    /// Session token issuer and verifier
    pub sessions: Arc<SessionManager>,
    /// Compiled page templates
    pub pages: Arc<Pages>,
    /// Universities offered on the registration form
    pub universities: Arc<UniversityCatalog>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Build state from configuration, creating the backend client and loading the catalog
    pub fn new(config: PortalConfig) -> ApiResult<Self> {
        let backend = shared_client(http_config(&config))
            .map_err(|e| ApiError::Internal(format!("Failed to create backend client: {e}")))?;
        let universities = load_universities(&config)?;
        Self::with_backend(config, backend, universities)
    }

    /// Build state around an existing backend implementation
    pub fn with_backend(
        config: PortalConfig,
        backend: Arc<dyn BackendApi>,
        universities: UniversityCatalog,
    ) -> ApiResult<Self> {
        Ok(Self {
            sessions: Arc::new(SessionManager::new(&config.session)),
            pages: Arc::new(Pages::new()?),
            config: Arc::new(config),
            backend,
            universities: Arc::new(universities),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Backend client settings derived from the portal configuration
pub fn http_config(config: &PortalConfig) -> HttpConfig {
    let mut http = HttpConfig::new()
        .with_timeout(config.backend.timeout())
        .with_connect_timeout(config.backend.connect_timeout());
    if let Some(url) = &config.backend.api_url {
        http = http.with_base_url(url.clone());
    }
    if let Some(agent) = &config.backend.user_agent {
        http = http.with_user_agent(agent.clone());
    }
    http
}

fn load_universities(config: &PortalConfig) -> ApiResult<UniversityCatalog> {
    let Some(path) = &config.portal.universities_path else {
        warn!("No university catalog configured; the registration form offers only 全大学");
        return Ok(UniversityCatalog::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ApiError::Internal(format!("Failed to read university catalog {}: {e}", path.display()))
    })?;
    let catalog = UniversityCatalog::from_json(&raw)
        .map_err(|e| ApiError::Internal(format!("Invalid university catalog: {e}")))?;
    info!("Loaded {} universities from {}", catalog.len(), path.display());
    Ok(catalog)
}
