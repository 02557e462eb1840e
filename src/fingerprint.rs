//! URL fingerprinting for cache keys
//!
//! Cache identity is the SHA-256 digest of the raw URL string. No
//! normalization is applied, so `http://a/` and `http://a` are distinct
//! entries by design.

use sha2::{Digest, Sha256};

/// Fixed-width cache key derived from a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Hex rendering, used only for logs and diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Compute the cache key for a URL.
pub fn fingerprint(url: &str) -> CacheKey {
    let digest = Sha256::digest(url.as_bytes());
    CacheKey(digest.into())
}
