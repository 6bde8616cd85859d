//! HMAC-SHA256 verification of gateway webhook bodies.
//!
//! The digest is always taken over the raw request bytes. Parsing and
//! re-serializing the JSON first changes whitespace and key order and breaks
//! verification.

use hmac::{Hmac, Mac};
use mainsdesk_core::AppError;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing webhook signature header")]
    MissingSignature,

    #[error("webhook signature does not match payload")]
    Mismatch,

    #[error("webhook secret is not configured: {0}")]
    Misconfigured(String),
}

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::MissingSignature | SignatureError::Mismatch => {
                AppError::InvalidSignature(err.to_string())
            }
            SignatureError::Misconfigured(msg) => {
                AppError::Internal(format!("Webhook verification unavailable: {}", msg))
            }
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `raw_body` keyed by `secret`.
pub fn compute_signature(secret: &str, raw_body: &[u8]) -> Result<String, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::Misconfigured("secret is empty".to_string()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::Misconfigured(e.to_string()))?;
    mac.update(raw_body);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `provided` against the expected signature of `raw_body`.
///
/// Fails closed: an absent or blank header is rejected before any hashing.
pub fn verify_signature(
    secret: &str,
    raw_body: &[u8],
    provided: Option<&str>,
) -> Result<(), SignatureError> {
    let provided = provided
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSignature)?;

    let expected = compute_signature(secret, raw_body)?;

    if expected.as_bytes().ct_eq(provided.as_bytes()).into() {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
