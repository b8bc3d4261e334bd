//! SHA-256 content fingerprints
//!
//! Fingerprints use the canonical `sha256:<hex>` format. Real inventories get
//! their fingerprints from the scanning subsystem; these helpers exist so
//! fixtures and tools can produce values in the same format.

use sha2::{Digest, Sha256};

/// Prefix for all fingerprints produced by this module
pub const PREFIX: &str = "sha256:";

/// Compute the SHA-256 fingerprint of raw bytes.
pub fn compute_bytes_fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 fingerprint of string content.
pub fn compute_content_fingerprint(content: &str) -> String {
    compute_bytes_fingerprint(content.as_bytes())
}

/// Check whether a value looks like a fingerprint produced by this module.
pub fn is_sha256_fingerprint(value: &str) -> bool {
    value
        .strip_prefix(PREFIX)
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
