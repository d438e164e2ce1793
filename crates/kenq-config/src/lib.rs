//! KenQ portal configuration
//!
//! Settings are read from an optional TOML file and overlaid by `KENQ_*`
//! environment variables. The variable names of the previous deployment
//! (`API_URL`, `NEXTAUTH_SECRET`, `NEXTAUTH_URL`) are still honoured when the
//! corresponding setting is left unset.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    BackendConfig, ConfigManager as ConfigManagerTrait, Environment, PortalConfig, PortalSettings,
    ServerConfig, SessionConfig,
};
