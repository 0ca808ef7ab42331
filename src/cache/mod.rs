//! Content fingerprinting for memoized evaluation.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the SHA256 fingerprint of a serializable value.
///
/// The value is serialized to JSON before hashing, so equal values always
/// produce the same 64-character lowercase hex digest. Filter contexts keep
/// their constraints sorted, which makes this deterministic across
/// construction orders.
///
/// # Errors
/// Returns an error if the value cannot be serialized to JSON.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
