//! Service description fetch settings.

use std::time::Duration;

/// Where the service description lives and how it is filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Local path or `http(s)` URL of the service description XML.
    pub source: Option<String>,
    /// Keep only countries flagged `approved="true"`.
    pub only_approved: bool,
    /// Upper bound for a single fetch of the description.
    pub fetch_timeout: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: None,
            only_approved: true,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}
