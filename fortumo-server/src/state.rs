//! Application state shared across all request handlers.

use crate::config::runtime::{CatalogSettings, ServiceConfig, SharedConfig};
use fortumo_core::catalog::{CatalogStore, RefreshError};
use fortumo_core::source::source_from_location;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// The most recently loaded service catalog.
    pub catalog: CatalogStore,
}

impl AppState {
    pub fn new(config: SharedConfig, catalog: CatalogStore) -> Self {
        Self { config, catalog }
    }

    /// Fetch the configured service description and publish it.
    ///
    /// Returns `Ok(None)` when no source is configured. On failure the
    /// previous catalog stays in place.
    pub async fn refresh_catalog(&self) -> Result<Option<usize>, RefreshError> {
        let settings = self.config.catalog().await.clone();
        let service_id = self
            .config
            .service()
            .await
            .service_id()
            .map(str::to_owned);
        self.load_catalog(&settings, service_id.as_deref()).await
    }

    /// Install a reloaded configuration.
    ///
    /// The catalog is refreshed against the new settings and service id
    /// before the configuration is swapped in. The configuration is applied
    /// even if the refresh fails; the previous catalog then stays published.
    pub async fn apply_config(
        &self,
        service: ServiceConfig,
        catalog: CatalogSettings,
    ) -> Result<Option<usize>, RefreshError> {
        let refreshed = self.load_catalog(&catalog, service.service_id()).await;
        if refreshed.is_err() {
            let previous = self
                .config
                .service()
                .await
                .service_id()
                .map(str::to_owned);
            if previous.as_deref() != service.service_id() {
                tracing::warn!(
                    previous_service_id = previous.as_deref(),
                    service_id = service.service_id(),
                    "Service ID changed but the catalog could not be refreshed, \
                     the published catalog is stale"
                );
            }
        }
        self.config.update_all(service, catalog).await;
        refreshed
    }

    async fn load_catalog(
        &self,
        settings: &CatalogSettings,
        service_id: Option<&str>,
    ) -> Result<Option<usize>, RefreshError> {
        let Some(location) = settings.source.as_deref() else {
            tracing::info!("No catalog source configured, skipping catalog load");
            return Ok(None);
        };
        let source = source_from_location(location, settings.fetch_timeout)?;
        let countries = self
            .catalog
            .refresh(source.as_ref(), settings.only_approved, service_id)
            .await?;
        Ok(Some(countries))
    }
}
