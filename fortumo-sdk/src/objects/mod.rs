pub mod catalog;
pub mod payment;

pub use catalog::{CountryInformation, CountrySummary};
pub use payment::ValidatedPayment;

use std::collections::BTreeMap;

/// Request parameters of a payment notification, ordered by key.
pub type PaymentParams = BTreeMap<String, String>;

/// XML attributes of a service description element.
pub type Attributes = BTreeMap<String, String>;
