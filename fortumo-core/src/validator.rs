//! Payment notification validation.
//!
//! A notification passes through the following gates in order, stopping at
//! the first failure:
//!
//! 1. a secret is configured
//! 2. `sig` and `service_id` are present and non-empty
//! 3. the caller's address is on the allow-list
//! 4. `service_id` matches the configured service, if one is configured
//! 5. the signature recomputed from the other parameters matches `sig`

use fortumo_sdk::objects::{PaymentParams, ValidatedPayment};
use fortumo_sdk::signature::{self, SERVICE_ID_PARAM, SIGNATURE_PARAM};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::error::ErrorKind;

/// Reasons a payment notification is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("secret not set")]
    Configuration,
    #[error("empty request: missing {0}")]
    MalformedRequest(&'static str),
    #[error("unknown IP {0}")]
    UntrustedSource(String),
    #[error("service ID mismatch: expected {expected}, got {received}")]
    ServiceMismatch { expected: String, received: String },
    #[error("signature mismatch")]
    SignatureMismatch,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Configuration => ErrorKind::Configuration,
            ValidationError::MalformedRequest(_) => ErrorKind::MalformedInput,
            ValidationError::UntrustedSource(_)
            | ValidationError::ServiceMismatch { .. }
            | ValidationError::SignatureMismatch => ErrorKind::Trust,
        }
    }
}

/// Validate a payment notification received from `remote_ip`.
///
/// On success the parameters are returned without `sig`.
pub fn validate_request(
    config: &ServiceConfig,
    params: PaymentParams,
    remote_ip: &str,
) -> Result<ValidatedPayment, ValidationError> {
    let result = check(config, &params, remote_ip);
    if let Err(reason) = &result {
        warn!(remote_ip, %reason, "payment notification rejected");
    }
    result?;

    let mut params = params;
    params.remove(SIGNATURE_PARAM);
    debug!(
        remote_ip,
        service_id = params.get(SERVICE_ID_PARAM).map(String::as_str),
        "payment notification accepted"
    );
    Ok(ValidatedPayment::new(params))
}

fn check(
    config: &ServiceConfig,
    params: &PaymentParams,
    remote_ip: &str,
) -> Result<(), ValidationError> {
    let secret = config.secret().ok_or(ValidationError::Configuration)?;

    required(params, SIGNATURE_PARAM)?;
    let service_id = required(params, SERVICE_ID_PARAM)?;

    if !config.is_ip_allowed(remote_ip) {
        return Err(ValidationError::UntrustedSource(remote_ip.to_owned()));
    }

    if let Some(expected) = config.service_id() {
        if expected != service_id {
            return Err(ValidationError::ServiceMismatch {
                expected: expected.to_owned(),
                received: service_id.to_owned(),
            });
        }
    }

    signature::verify_params(params, secret).map_err(|_| ValidationError::SignatureMismatch)
}

fn required<'a>(params: &'a PaymentParams, key: &'static str) -> Result<&'a str, ValidationError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MalformedRequest(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortumo_sdk::signature::attach_signature;

    const SERVICE_ID: &str = "c4b756ca6da4a88fa5c61181aa484b08";
    const SECRET: &str = "b1ec1bfba48bff06485e1291e5748471";
    const PEER: &str = "81.20.151.38";

    fn config() -> ServiceConfig {
        ServiceConfig::new(Some(SERVICE_ID.to_owned()), Some(SECRET.to_owned()), vec![])
    }

    fn notification() -> PaymentParams {
        [
            ("billing_type", "MO"),
            ("country", "EE"),
            ("currency", "EUR"),
            ("keyword", "FOR TEST"),
            ("message", "tere tere"),
            ("message_id", "5a4c47e43def7955a5d375fb19446fd0"),
            ("operator", "Elisa"),
            ("price", "0.32"),
            ("sender", "37251940072"),
            ("service_id", SERVICE_ID),
            ("shortcode", "1311"),
            ("sig", "9029c81198aacedc47dfc2b2289e5b87"),
            ("status", "pending"),
            ("test", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
    }

    #[test]
    fn test_valid_notification_is_accepted_without_sig() {
        let params = notification();
        let payment = validate_request(&config(), params.clone(), PEER).unwrap();

        let mut expected = params;
        expected.remove("sig");
        assert_eq!(payment.params(), &expected);
        assert_eq!(payment.sender(), Some("37251940072"));
    }

    #[test]
    fn test_missing_secret_comes_first() {
        let config = ServiceConfig::new(Some(SERVICE_ID.to_owned()), None, vec![]);
        let err = validate_request(&config, PaymentParams::new(), "127.0.0.1").unwrap_err();
        assert_eq!(err, ValidationError::Configuration);
        assert_eq!(err.to_string(), "secret not set");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_or_empty_fields_are_malformed() {
        let mut params = notification();
        params.remove("sig");
        assert_eq!(
            validate_request(&config(), params, PEER),
            Err(ValidationError::MalformedRequest("sig"))
        );

        let mut params = notification();
        params.insert("service_id".to_owned(), String::new());
        assert_eq!(
            validate_request(&config(), params, PEER),
            Err(ValidationError::MalformedRequest("service_id"))
        );
    }

    #[test]
    fn test_unknown_ip_rejected_even_with_valid_signature() {
        let err = validate_request(&config(), notification(), "127.0.0.1").unwrap_err();
        assert_eq!(err, ValidationError::UntrustedSource("127.0.0.1".to_owned()));
        assert_eq!(err.kind(), ErrorKind::Trust);
    }

    #[test]
    fn test_service_id_mismatch() {
        let config = ServiceConfig::new(Some("other".to_owned()), Some(SECRET.to_owned()), vec![]);
        assert!(matches!(
            validate_request(&config, notification(), PEER),
            Err(ValidationError::ServiceMismatch { expected, received })
                if expected == "other" && received == SERVICE_ID
        ));
    }

    #[test]
    fn test_unset_service_id_accepts_any_service() {
        let config = ServiceConfig::new(None, Some(SECRET.to_owned()), vec![]);
        let mut params = notification();
        params.insert("service_id".to_owned(), "another-service".to_owned());
        attach_signature(&mut params, SECRET);
        assert!(validate_request(&config, params, PEER).is_ok());
    }

    #[test]
    fn test_tampered_value_is_signature_mismatch() {
        let mut params = notification();
        params.insert("price".to_owned(), "0.33".to_owned());
        assert_eq!(
            validate_request(&config(), params, PEER),
            Err(ValidationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_extra_parameter_is_signature_mismatch() {
        let mut params = notification();
        params.insert("extra".to_owned(), "1".to_owned());
        assert_eq!(
            validate_request(&config(), params, PEER),
            Err(ValidationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_custom_allow_list() {
        let config = ServiceConfig::new(
            Some(SERVICE_ID.to_owned()),
            Some(SECRET.to_owned()),
            vec!["192.0.2.7".to_owned()],
        );
        assert!(validate_request(&config, notification(), "192.0.2.7").is_ok());
        assert!(validate_request(&config, notification(), PEER).is_err());
    }
}
