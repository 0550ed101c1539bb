//! Stable content hashing.
//!
//! Scope identifiers and document identifiers must be identical across
//! processes and machines, so these helpers hash with SHA-256 rather than
//! the std `DefaultHasher` (which is randomized per process).

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a string, rendered as 64 lowercase hex
/// characters.
pub fn digest_hex(data: &str) -> String {
    use std::fmt::Write as _;

    let digest = Sha256::digest(data.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

/// The first `len` hex characters of the digest.
pub fn hash_prefix(data: &str, len: usize) -> String {
    let mut hex = digest_hex(data);
    hex.truncate(len.min(hex.len()));
    hex
}

/// The last `len` hex characters of the digest.
pub fn hash_suffix(data: &str, len: usize) -> String {
    let hex = digest_hex(data);
    let start = hex.len().saturating_sub(len);
    hex[start..].to_string()
}
