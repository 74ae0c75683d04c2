//! Authentication service for the shared API key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Checks Bearer tokens against the single configured API key.
///
/// Both the presented token and the key are run through HMAC-SHA256 keyed by
/// the API key, and the two tags are compared with `verify_slice`, which is
/// constant-time. The comparison leaks neither the key's length nor the
/// position of the first differing byte.
pub struct AuthService {
    api_key: String,
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the key cannot initialise the MAC.
    pub fn new(api_key: String) -> Result<Self, AppError> {
        let expected_tag = tag(&api_key, api_key.as_bytes())?;
        Ok(Self {
            api_key,
            expected_tag,
        })
    }

    /// Authenticates a raw Bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match the key.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let mut mac = mac(&self.api_key)?;
        mac.update(token.as_bytes());

        mac.verify_slice(&self.expected_tag).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({"reason": "Invalid API key"}))
        })
    }
}

fn mac(key: &str) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::internal("Failed to initialise MAC", json!({"reason": e.to_string()})))
}

fn tag(key: &str, message: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = mac(key)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
