//! Hashing helpers for admin API key verification.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two strings without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Checks a presented key against a stored SHA-256 hex digest.
///
/// An empty stored digest never matches.
pub fn verify_key(presented: &str, expected_hash: &str) -> bool {
    if expected_hash.is_empty() || presented.is_empty() {
        return false;
    }
    constant_time_eq(&sha256_hex(presented), &expected_hash.to_ascii_lowercase())
}
