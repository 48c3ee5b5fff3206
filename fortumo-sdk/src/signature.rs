//! Signature scheme for Fortumo payment notifications.
//!
//! Every notification request carries a `sig` parameter computed over all
//! other parameters:
//!
//! ```text
//! sig = md5_hex("{key1}={value1}{key2}={value2}...{secret}")
//! ```
//!
//! Keys are ordered by byte-wise comparison and concatenated without any
//! separator between pairs. The digest is rendered as lowercase hex.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

use crate::objects::PaymentParams;

/// Query parameter carrying the request signature.
pub const SIGNATURE_PARAM: &str = "sig";

/// Query parameter carrying the service identifier.
pub const SERVICE_ID_PARAM: &str = "service_id";

/// Errors produced by signature operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("missing signature")]
    MissingSignature,
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Build the string that gets digested: every parameter except `sig`, in
/// key order, followed by the secret.
pub fn canonical_string(params: &PaymentParams, secret: &str) -> String {
    let mut data = String::new();
    // BTreeMap<String, _> iterates in byte order of the keys.
    for (key, value) in params {
        if key == SIGNATURE_PARAM {
            continue;
        }
        data.push_str(key);
        data.push('=');
        data.push_str(value);
    }
    data.push_str(secret);
    data
}

/// Compute the lowercase hex signature for `params`.
///
/// Any existing `sig` entry is ignored.
pub fn sign_params(params: &PaymentParams, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(canonical_string(params, secret).as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the signature and store it under `sig`, replacing any previous
/// value.
pub fn attach_signature(params: &mut PaymentParams, secret: &str) {
    let sig = sign_params(params, secret);
    params.insert(SIGNATURE_PARAM.to_owned(), sig);
}

/// Check the `sig` parameter against the signature recomputed from the rest
/// of `params`.
///
/// The comparison is exact and case-sensitive, and runs in constant time.
pub fn verify_params(params: &PaymentParams, secret: &str) -> Result<(), SignatureError> {
    let supplied = params
        .get(SIGNATURE_PARAM)
        .ok_or(SignatureError::MissingSignature)?;
    let expected = sign_params(params, secret);
    if !bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(SignatureError::SignatureMismatch);
    }
    Ok(())
}
