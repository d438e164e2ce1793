//! Configuration manager implementation

use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::{info, warn};

use crate::{
    error::{ConfigError, Result},
    types::{ConfigManager as ConfigManagerTrait, PortalConfig},
};

/// Minimum length of the session signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_CONFIG_FILE: &str = "kenq.toml";

/// Configuration manager
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager reading `kenq.toml` from the working directory
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            env_prefix: "KENQ".to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: "KENQ".to_string(),
        }
    }

    /// Load and validate in one step
    pub fn load(&mut self) -> Result<PortalConfig> {
        let config = self.load_config()?;
        self.validate_config(&config)?;
        Ok(config)
    }
}

/// Fill unset settings from the variable names of the previous deployment
pub fn apply_legacy_env<F>(config: &mut PortalConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.backend.api_url.is_none() {
        if let Some(api_url) = lookup("API_URL").filter(|v| !v.trim().is_empty()) {
            info!("Using API_URL for backend.api_url");
            config.backend.api_url = Some(api_url);
        }
    }
    if config.session.secret.is_empty() {
        if let Some(secret) = lookup("NEXTAUTH_SECRET").filter(|v| !v.is_empty()) {
            info!("Using NEXTAUTH_SECRET for session.secret");
            config.session.secret = secret;
        }
    }
    if let Some(public_url) = lookup("NEXTAUTH_URL").filter(|v| !v.trim().is_empty()) {
        if config.portal.public_url == crate::types::PortalSettings::default().public_url {
            config.portal.public_url = public_url;
        }
    }
}

impl ConfigManagerTrait for ConfigManager {
    fn load_config(&mut self) -> Result<PortalConfig> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mut portal_config: PortalConfig = config.try_deserialize()?;
        apply_legacy_env(&mut portal_config, |key| std::env::var(key).ok());

        if portal_config.backend.api_url.is_none() {
            warn!("backend.api_url is not set; proxy routes will answer 500");
        }
        Ok(portal_config)
    }

    fn validate_config(&self, config: &PortalConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if config.session.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "session.secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if config.session.max_age_hours == 0 {
            return Err(ConfigError::Validation(
                "session.max_age_hours must be greater than 0".to_string(),
            ));
        }
        if config.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "session.cookie_name cannot be empty".to_string(),
            ));
        }
        if let Some(api_url) = &config.backend.api_url {
            url::Url::parse(api_url).map_err(|e| {
                ConfigError::Validation(format!("backend.api_url is not a valid URL: {e}"))
            })?;
        }
        if config.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "backend.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
