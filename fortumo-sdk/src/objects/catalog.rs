//! Country and pricing objects derived from the service description.

use serde::{Deserialize, Serialize};

use super::Attributes;

/// One entry of the country list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    /// ISO 3166-1 alpha-2 code as given in the service description.
    pub code: String,
    pub name: String,
}

/// Flattened pricing information for a single country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInformation {
    /// Attributes of the `<country>` element (`code`, `name`, `approved`, ...).
    pub country: Attributes,
    /// Price and message profile attributes shared by every operator, present
    /// only when the first price entry is flagged `all_operators="true"`.
    pub all_operators: Option<Attributes>,
    /// One record per (price, operator) pair in document order. Operator
    /// attributes override message profile attributes, which override price
    /// attributes.
    pub operators: Vec<Attributes>,
    /// Attributes of `<promotional_text>`; its text content is not carried.
    pub promotional_text: Option<Attributes>,
}

impl CountryInformation {
    pub fn code(&self) -> Option<&str> {
        self.country.get("code").map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.country.get("name").map(String::as_str)
    }
}
