//! Shared catalog with wholesale replacement and change notification.
//!
//! `CatalogStore` keeps the current [`Catalog`] behind `Arc<RwLock<Arc<_>>>`.
//! A new catalog is built completely before it is swapped in, so readers see
//! either the previous catalog or the new one. Subscribers receive a
//! [`CatalogWatcher`] that can `await` the next publication.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{RwLock, watch};
use tracing::{error, info};

use super::{Catalog, CatalogError, load_catalog};
use crate::source::{ServiceXmlSource, SourceError};

/// Errors from fetching and loading a new catalog.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to fetch service description: {0}")]
    Fetch(#[from] SourceError),
    #[error("failed to load service description: {0}")]
    Load(#[from] CatalogError),
}

/// A shared, versioned catalog.
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    current: RwLock<Arc<Catalog>>,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Receives notifications when a [`CatalogStore`] publishes a new catalog.
pub struct CatalogWatcher {
    version_rx: watch::Receiver<u64>,
}

// -- CatalogStore -------------------------------------------------------

impl CatalogStore {
    /// Create a store holding `initial` as version 0.
    pub fn new(initial: Catalog) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(CatalogStoreInner {
                current: RwLock::new(Arc::new(initial)),
                version: AtomicU64::new(0),
                version_tx,
            }),
        }
    }

    /// Replace the current catalog and notify all watchers. Returns the new
    /// version.
    pub async fn publish(&self, catalog: Catalog) -> u64 {
        let catalog = Arc::new(catalog);
        let mut guard = self.inner.current.write().await;
        *guard = catalog;
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        // Release the write lock before notifying so subscribers can read
        // right away.
        drop(guard);
        let _ = self.inner.version_tx.send(new_version);
        new_version
    }

    /// The catalog as of now. Later publications do not affect the returned
    /// snapshot.
    pub async fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&*self.inner.current.read().await)
    }

    /// Number of publications so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    /// Subscribe to publication notifications.
    pub fn subscribe(&self) -> CatalogWatcher {
        CatalogWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }

    /// Load `xml` and publish the result. On failure the current catalog is
    /// kept. Returns the number of countries published.
    pub async fn load_xml(
        &self,
        xml: &[u8],
        only_approved: bool,
        expected_service_id: Option<&str>,
    ) -> Result<usize, CatalogError> {
        let catalog = load_catalog(xml, only_approved, expected_service_id)?;
        let countries = catalog.len();
        let version = self.publish(catalog).await;
        info!(countries, version, "service catalog published");
        Ok(countries)
    }

    /// Fetch the description from `source`, load it and publish it. On
    /// failure the current catalog is kept.
    pub async fn refresh(
        &self,
        source: &dyn ServiceXmlSource,
        only_approved: bool,
        expected_service_id: Option<&str>,
    ) -> Result<usize, RefreshError> {
        let result = self
            .fetch_and_load(source, only_approved, expected_service_id)
            .await;
        if let Err(e) = &result {
            error!(source = %source.describe(), error = %e, "catalog refresh failed");
        }
        result
    }

    async fn fetch_and_load(
        &self,
        source: &dyn ServiceXmlSource,
        only_approved: bool,
        expected_service_id: Option<&str>,
    ) -> Result<usize, RefreshError> {
        let xml = source.fetch().await?;
        Ok(self
            .load_xml(&xml, only_approved, expected_service_id)
            .await?)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

impl Clone for CatalogStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// -- CatalogWatcher -----------------------------------------------------

impl CatalogWatcher {
    /// Wait until a new catalog is published.
    ///
    /// Returns the new version, or `Err` if the [`CatalogStore`] has been
    /// dropped.
    pub async fn changed(&mut self) -> Result<u64, watch::error::RecvError> {
        self.version_rx.changed().await?;
        Ok(*self.version_rx.borrow_and_update())
    }
}
