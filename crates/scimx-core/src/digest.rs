//! Content fingerprinting for version tokens.
//!
//! Provides deterministic SHA256 fingerprints over the canonical JSON form
//! of a resource, excluding its `meta` block, so that the fingerprint
//! changes exactly when user-visible content changes.
//!
//! ## Determinism Guarantees
//!
//! - Same content → same fingerprint (canonical, key-sorted serialization)
//! - `meta` changes alone (version, lastModified) never move the fingerprint
//! - Unassigned attributes never contribute, however they became unassigned

use crate::errors::Result;
use crate::json::serialize_resource;
use crate::prop::Resource;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute the content fingerprint of a resource.
///
/// Serializes the resource canonically, drops the `meta` block, and hashes
/// the remainder.
///
/// ## Arguments
///
/// - `resource`: The resource to fingerprint
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Fails only when the property tree cannot be serialized (e.g. a
/// non-finite decimal value).
pub fn content_fingerprint(resource: &Resource) -> Result<String> {
    let mut value = serialize_resource(resource)?;
    if let Value::Object(object) = &mut value {
        object.remove("meta");
    }
    let canonical = value.to_string();
    Ok(hash_string(&canonical))
}

/// Format a fingerprint as a weak entity tag.
///
/// The tag carries the first sixteen hex characters, enough to make
/// accidental collisions irrelevant for concurrency control.
///
/// ## Example
///
/// ```
/// use scimx_core::digest::weak_etag;
///
/// let tag = weak_etag("03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4");
/// assert_eq!(tag, "W/\"03ac674216f3e15c\"");
/// ```
pub fn weak_etag(fingerprint: &str) -> String {
    let short = fingerprint.get(..16).unwrap_or(fingerprint);
    format!("W/\"{}\"", short)
}

/// Hash a string using SHA256.
fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
