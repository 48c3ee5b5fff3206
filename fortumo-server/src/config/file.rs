//! TOML file configuration structures.
//!
//! These structs directly map to the `fortumo-config.toml` file format.

use serde::Deserialize;
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Fortumo service section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// Service ID. When set, notifications and the service description must
    /// carry the same ID.
    pub id: Option<String>,
    /// Service secret used to sign notifications.
    pub secret: Option<String>,
    /// Addresses allowed to send notifications. Empty means the vendor's
    /// published addresses.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

/// Service description section.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Local path or URL of the service description XML.
    pub source: Option<String>,
    /// Keep only approved countries.
    #[serde(default = "default_only_approved")]
    pub only_approved: bool,
    /// Timeout for fetching the description, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: None,
            only_approved: default_only_approved(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_only_approved() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    30
}
