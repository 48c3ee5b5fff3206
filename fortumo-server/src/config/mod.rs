//! Configuration module for fortumo-server.
//!
//! Handles loading configuration from the TOML file and CLI arguments, and
//! converting it into the runtime types used by the core.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{CatalogSettings, ServerConfig, ServiceConfig, SharedConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub catalog: CatalogSettings,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.service, self.catalog)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Build the runtime configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;

        if file_config.service.secret.is_none() {
            tracing::warn!("service secret not set, every payment notification will be rejected");
        }

        Ok(self.build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.catalog.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "catalog.fetch_timeout_secs must be greater than zero".to_owned(),
            ));
        }
        // Matching is by exact string, so ranges or host names would never match.
        for ip in &config.service.allowed_ips {
            if ip.parse::<IpAddr>().is_err() {
                return Err(ConfigError::ValidationError(format!(
                    "service.allowed_ips entry {ip:?} is not an IP address"
                )));
            }
        }
        Ok(())
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> LoadedConfig {
        let FileConfig {
            server,
            service,
            catalog,
        } = file_config;

        LoadedConfig {
            server: ServerConfig {
                listen: server.listen,
            },
            service: ServiceConfig::new(service.id, service.secret, service.allowed_ips),
            catalog: CatalogSettings {
                source: catalog.source.filter(|s| !s.trim().is_empty()),
                only_approved: catalog.only_approved,
                fetch_timeout: Duration::from_secs(catalog.fetch_timeout_secs),
            },
        }
    }
}
