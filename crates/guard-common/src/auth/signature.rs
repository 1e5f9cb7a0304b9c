//! HMAC request signatures with replay protection
//!
//! A signature is `hex(HMAC-SHA256(secret, payload || timestamp))` where both
//! parts are concatenated as raw text with no delimiter. Verification fails
//! closed and only ever answers `true` or `false`.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock distance between signer and verifier
pub const REPLAY_WINDOW_SECS: u64 = 300;

/// Header carrying the hex signature
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header carrying the unix timestamp (seconds) that was signed
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// Signature errors
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Invalid signing key")]
    InvalidKey,
}

/// Compute the hex signature for a payload and timestamp
///
/// # Errors
/// Returns an error if the key is rejected by the MAC implementation
pub fn sign(payload: &str, timestamp: &str, secret: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload.as_bytes());
    mac.update(timestamp.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signature against the current clock
pub fn verify(payload: &str, signature_hex: &str, timestamp: &str, secret: &str) -> bool {
    verify_at(payload, signature_hex, timestamp, secret, Utc::now().timestamp())
}

/// Verify a signature against an explicit `now` (unix seconds)
pub fn verify_at(
    payload: &str,
    signature_hex: &str,
    timestamp: &str,
    secret: &str,
    now: i64,
) -> bool {
    let Ok(signed_at) = timestamp.parse::<i64>() else {
        return false;
    };

    if now.abs_diff(signed_at) > REPLAY_WINDOW_SECS {
        return false;
    }

    match sign(payload, timestamp, secret) {
        Ok(expected) => expected.as_bytes().ct_eq(signature_hex.as_bytes()).into(),
        Err(_) => false,
    }
}

/// A payload with its signature and signing time
#[derive(Debug, Clone, Deserialize)]
pub struct SignedEnvelope {
    pub payload: String,
    pub signature: String,
    pub timestamp: String,
}

impl SignedEnvelope {
    /// Check the envelope against a secret at the current time
    pub fn verify(&self, secret: &str) -> bool {
        verify(&self.payload, &self.signature, &self.timestamp, secret)
    }
}

/// Holds the shared secret used to check signed requests
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify against the current clock
    pub fn verify(&self, payload: &str, signature_hex: &str, timestamp: &str) -> bool {
        verify(payload, signature_hex, timestamp, &self.secret)
    }

    /// Verify against an explicit clock
    pub fn verify_at(&self, payload: &str, signature_hex: &str, timestamp: &str, now: i64) -> bool {
        verify_at(payload, signature_hex, timestamp, &self.secret, now)
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
