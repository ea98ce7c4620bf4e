//! Difficulty predicate and the raw digest used by the miners.

use sha2::{Digest, Sha256};

/// SHA-256 over `preimage || decimal(nonce)`, rendered as lowercase hex.
pub fn digest_hex(preimage: &[u8], nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(preimage);
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Number of leading `'0'` characters in a hex digest.
pub fn leading_zero_nibbles(hash_hex: &str) -> usize {
    hash_hex.bytes().take_while(|b| *b == b'0').count()
}

/// Whether `hash_hex` starts with at least `difficulty` zero characters.
/// Difficulty 0 matches anything, including an empty string.
pub fn meets_difficulty(hash_hex: &str, difficulty: usize) -> bool {
    leading_zero_nibbles(hash_hex) >= difficulty
}

/// Expected number of attempts to find a nonce at `difficulty` (16^d).
pub fn expected_attempts(difficulty: usize) -> f64 {
    16f64.powi(difficulty.min(i32::MAX as usize) as i32)
}
