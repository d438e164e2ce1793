//! Core configuration types and data structures

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration
    pub server: ServerConfig,
    /// Backend API configuration
    pub backend: BackendConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
    /// Deployment-level settings
    pub portal: PortalSettings,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend REST API; requests fail with 500 while unset
    pub api_url: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Overrides the default user agent
    pub user_agent: Option<String>,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens
    pub secret: String,
    /// Session lifetime in hours
    pub max_age_hours: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Mark the cookie `Secure`
    pub secure: bool,
}

/// Deployment flavour; selects the content security policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Deployment-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalSettings {
    /// Development or production
    pub environment: Environment,
    /// Public URL the portal is served from
    pub public_url: String,
    /// Path to `universities_by_subregion.json`
    pub universities_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            max_age_hours: 12,
            cookie_name: "kenq_session".to_string(),
            secure: false,
        }
    }
}

impl SessionConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours * 60 * 60)
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            public_url: "http://localhost:3000".to_string(),
            universities_path: None,
        }
    }
}

impl PortalConfig {
    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration manager trait
pub trait ConfigManager {
    /// Load configuration
    fn load_config(&mut self) -> Result<PortalConfig, crate::error::ConfigError>;
    /// Validate configuration
    fn validate_config(&self, config: &PortalConfig) -> Result<(), crate::error::ConfigError>;
}
