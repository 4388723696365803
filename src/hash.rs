//! Option fingerprints for addressing generated image artifacts.
//!
//! [`hash_options`] turns any serializable options value into a short,
//! deterministic string. It is a cache key, not a security boundary: equal
//! inputs always produce the same fingerprint, across runs and machines, and
//! different inputs produce different fingerprints with overwhelming
//! probability.
//!
//! ## Canonical form
//!
//! The value is first converted to a `serde_json::Value`. Objects in that
//! representation keep their keys sorted, so two maps holding the same
//! entries hash identically regardless of insertion order (including
//! `HashMap`s, whose iteration order differs between processes). The compact
//! JSON text of the value is then hashed with SHA-256 and the first
//! [`FINGERPRINT_LEN`] hex characters are kept.
//!
//! Non-finite floats have no JSON representation; `serde_json` writes them as
//! `null`, so `{"a": NaN}` and `{"a": null}` share a fingerprint.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a fingerprint in hex characters (64 bits of the digest).
pub const FINGERPRINT_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("options could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fingerprint an options value.
///
/// Fails if the value cannot be represented as JSON (e.g. a map with
/// non-string keys); a placeholder fingerprint would silently collide.
pub fn hash_options<T>(options: &T) -> Result<String, HashError>
where
    T: Serialize + ?Sized,
{
    let canonical = serde_json::to_value(options)?;
    let json = serde_json::to_string(&canonical)?;
    let digest = Sha256::digest(json.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(FINGERPRINT_LEN);
    Ok(hex)
}
