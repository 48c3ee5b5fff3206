//! Country and pricing catalog built from the service description XML.
//!
//! A [`Catalog`] is built from scratch on every load and then published as a
//! whole through [`CatalogStore`]; there is no incremental update.

mod loader;
mod query;
mod store;

pub use loader::{CatalogError, load_catalog};
pub use store::{CatalogStore, CatalogWatcher, RefreshError};

use fortumo_sdk::objects::Attributes;
use std::collections::HashMap;

/// Attribute on `<price>` marking settings shared by every operator.
pub const ALL_OPERATORS_FLAG: &str = "all_operators";

/// Countries in document order, addressable by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    countries: Vec<CountryRecord>,
    index: HashMap<String, usize>,
}

/// One `<country>` of the service description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    /// Value of the `code` attribute, exactly as given.
    pub code: String,
    pub attributes: Attributes,
    pub prices: Vec<PriceEntry>,
    /// Attributes of `<promotional_text>`, when the element is present.
    pub promotional_text: Option<Attributes>,
}

/// One `<price>` of a country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceEntry {
    pub attributes: Attributes,
    pub message_profile: MessageProfile,
}

/// The `<message_profile>` of a price and the operators it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageProfile {
    pub attributes: Attributes,
    pub operators: Vec<Attributes>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.iter()
    }

    /// Exact lookup by code, without normalization.
    pub fn get(&self, code: &str) -> Option<&CountryRecord> {
        self.index.get(code).map(|&position| &self.countries[position])
    }

    pub fn first(&self) -> Option<&CountryRecord> {
        self.countries.first()
    }

    /// Add a country. A repeated code replaces the earlier record but keeps
    /// its position.
    fn insert(&mut self, record: CountryRecord) {
        match self.index.get(&record.code) {
            Some(&position) => self.countries[position] = record,
            None => {
                self.index.insert(record.code.clone(), self.countries.len());
                self.countries.push(record);
            }
        }
    }
}

impl FromIterator<CountryRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CountryRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl PriceEntry {
    /// Price attributes overlaid with message profile attributes and then
    /// with `operator`, without the `all_operators` flag.
    pub fn flatten(&self, operator: Option<&Attributes>) -> Attributes {
        let mut merged = self.attributes.clone();
        merged.extend(self.message_profile.attributes.clone());
        if let Some(operator) = operator {
            merged.extend(operator.clone());
        }
        merged.remove(ALL_OPERATORS_FLAG);
        merged
    }

    pub fn applies_to_all_operators(&self) -> bool {
        self.attributes.get(ALL_OPERATORS_FLAG).map(String::as_str) == Some("true")
    }
}
