//! Envelope checks and country extraction for the service description.
//!
//! Expected shape:
//!
//! ```text
//! services_api_response
//! ├── status / code                 "0" on success
//! └── service (id=...)
//!     └── countries / country*      (code, name, approved)
//!         ├── promotional_text?
//!         └── prices / price*       (all_operators, ...)
//!             └── message_profile
//!                 └── operator*
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Catalog, CountryRecord, MessageProfile, PriceEntry};
use crate::error::ErrorKind;
use crate::xml::{self, XmlError, XmlValue};

/// Root element of a service description.
pub const RESPONSE_TAG: &str = "services_api_response";

/// Status code reported by the vendor for a usable document.
pub const STATUS_OK: &str = "0";

/// Reasons a service description is refused. No catalog is produced in any
/// of these cases.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed XML: {0}")]
    MalformedXml(#[from] XmlError),
    #[error("invalid XML: no <services_api_response> root element")]
    InvalidXml,
    #[error("invalid status code: {}", .0.as_deref().unwrap_or("<missing>"))]
    InvalidStatus(Option<String>),
    #[error(
        "invalid service code in XML: expected {expected}, found {}",
        .found.as_deref().unwrap_or("<missing>")
    )]
    ServiceIdMismatch {
        expected: String,
        found: Option<String>,
    },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MalformedXml(_) | CatalogError::InvalidXml => ErrorKind::MalformedInput,
            CatalogError::InvalidStatus(_) => ErrorKind::Semantic,
            CatalogError::ServiceIdMismatch { .. } => ErrorKind::Trust,
        }
    }
}

/// Build a catalog from a service description document.
///
/// With `only_approved`, countries whose `approved` attribute is not exactly
/// `"true"` are left out. When `expected_service_id` is set it must equal the
/// `id` attribute of `<service>`.
pub fn load_catalog(
    xml: &[u8],
    only_approved: bool,
    expected_service_id: Option<&str>,
) -> Result<Catalog, CatalogError> {
    let document = xml::parse(xml)?;
    let response = document.first(RESPONSE_TAG).ok_or_else(|| {
        warn!("service description has no {RESPONSE_TAG} root");
        CatalogError::InvalidXml
    })?;

    let status = response.at(&["status", "code"]).and_then(XmlValue::text);
    if status != Some(STATUS_OK) {
        warn!(status, "service description reports a failure");
        return Err(CatalogError::InvalidStatus(status.map(str::to_owned)));
    }

    let service = response.first("service");
    if let Some(expected) = expected_service_id {
        let found = service.and_then(|s| s.attr("id"));
        if found != Some(expected) {
            warn!(expected, found, "service description is for another service");
            return Err(CatalogError::ServiceIdMismatch {
                expected: expected.to_owned(),
                found: found.map(str::to_owned),
            });
        }
    }

    let countries = service
        .and_then(|s| s.first("countries"))
        .map(|c| c.all("country"))
        .unwrap_or_default();

    let catalog: Catalog = countries
        .iter()
        .filter_map(|country| country_record(country, only_approved))
        .collect();

    info!(
        countries = catalog.len(),
        only_approved, "service catalog loaded"
    );
    Ok(catalog)
}

fn country_record(country: &XmlValue, only_approved: bool) -> Option<CountryRecord> {
    let Some(element) = country.as_element().filter(|e| {
        !e.attributes().is_empty() || e.has_children()
    }) else {
        debug!("skipping empty country entry");
        return None;
    };
    let Some(code) = element.attr("code") else {
        debug!("skipping country without a code");
        return None;
    };
    if only_approved && element.attr("approved") != Some("true") {
        debug!(code, "skipping country that is not approved");
        return None;
    }

    let prices = country
        .first("prices")
        .map(|p| p.all("price"))
        .unwrap_or_default()
        .iter()
        .map(price_entry)
        .collect();

    Some(CountryRecord {
        code: code.to_owned(),
        attributes: element.attributes().clone(),
        prices,
        promotional_text: country.first("promotional_text").map(XmlValue::attributes),
    })
}

fn price_entry(price: &XmlValue) -> PriceEntry {
    let profile = price.first("message_profile");
    PriceEntry {
        attributes: price.attributes(),
        message_profile: MessageProfile {
            attributes: profile.map(XmlValue::attributes).unwrap_or_default(),
            operators: profile
                .map(|p| p.all("operator"))
                .unwrap_or_default()
                .iter()
                .map(XmlValue::attributes)
                .collect(),
        },
    }
}
