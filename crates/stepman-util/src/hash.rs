use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of a byte slice, returning a lowercase hex string.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// First `len` hex characters of the SHA-256 of `text`.
///
/// Used for stable, filesystem-safe folder names derived from URIs.
pub fn short_hash(text: &str, len: usize) -> String {
    let mut full = sha256_bytes(text.as_bytes());
    full.truncate(len.min(64));
    full
}
