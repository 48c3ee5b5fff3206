//! Payment notification objects.

use serde::{Deserialize, Serialize};

use super::PaymentParams;
use crate::signature::SERVICE_ID_PARAM;

/// A payment notification that passed every validation gate.
///
/// Holds the original request parameters with the `sig` entry removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedPayment(PaymentParams);

impl ValidatedPayment {
    /// Wrap already validated parameters. The caller is responsible for
    /// having stripped the signature.
    pub fn new(params: PaymentParams) -> Self {
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn service_id(&self) -> Option<&str> {
        self.get(SERVICE_ID_PARAM)
    }

    /// Phone number (MSISDN) of the paying user.
    pub fn sender(&self) -> Option<&str> {
        self.get("sender")
    }

    pub fn price(&self) -> Option<&str> {
        self.get("price")
    }

    pub fn currency(&self) -> Option<&str> {
        self.get("currency")
    }

    /// Billing status reported by the aggregator, e.g. `pending` or `ok`.
    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    /// Whether the aggregator flagged this as a test payment.
    pub fn is_test(&self) -> bool {
        self.get("test") == Some("true")
    }

    pub fn params(&self) -> &PaymentParams {
        &self.0
    }

    pub fn into_params(self) -> PaymentParams {
        self.0
    }
}
