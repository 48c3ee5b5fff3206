//! Configuration types for the payment validator and the service catalog.
//!
//! These types represent validated runtime configuration. Loading and
//! parsing of configuration files is handled by the server crate.

mod catalog;
mod service;

pub use catalog::CatalogSettings;
pub use service::{DEFAULT_ALLOWED_IPS, ServiceConfig};

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Shared configuration state with separate locks for each section.
///
/// Each section is replaced wholesale on reload; readers never see a section
/// that is half updated.
#[derive(Clone)]
pub struct SharedConfig {
    /// Credentials and trusted sources for payment notifications.
    pub service: Arc<RwLock<ServiceConfig>>,
    /// Where and how the service description is fetched.
    pub catalog: Arc<RwLock<CatalogSettings>>,
}

impl SharedConfig {
    pub fn new(service: ServiceConfig, catalog: CatalogSettings) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Get a read lock on the service configuration.
    pub async fn service(&self) -> RwLockReadGuard<'_, ServiceConfig> {
        self.service.read().await
    }

    /// Get a read lock on the catalog settings.
    pub async fn catalog(&self) -> RwLockReadGuard<'_, CatalogSettings> {
        self.catalog.read().await
    }

    /// Replace both sections, service first.
    pub async fn update_all(&self, service: ServiceConfig, catalog: CatalogSettings) {
        *self.service.write().await = service;
        *self.catalog.write().await = catalog;
    }
}
