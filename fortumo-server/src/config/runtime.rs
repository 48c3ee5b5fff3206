//! Runtime configuration types.
//!
//! Service and catalog settings are defined in `fortumo-core::config` and
//! re-exported here; only the listener belongs to the server.

pub use fortumo_core::config::{CatalogSettings, ServiceConfig, SharedConfig};

use std::net::SocketAddr;

/// Listener configuration. Changing it requires a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}
