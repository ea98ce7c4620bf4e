use crate::canonical::{canonical_payload, Payload};
use crate::constants::{GENESIS_HASH, GENESIS_PREVIOUS_HASH};
use crate::pow::{digest_hex, meets_difficulty};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A unit of the ledger.
///
/// `payload`, `previous_hash` and `timestamp` are fixed at construction.
/// Mining moves `nonce` and `hash`; once mined the block must not be touched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub payload: Payload,
    pub previous_hash: String,
    pub timestamp: DateTime<Utc>,
    pub nonce: u64,
    /// Lowercase hex SHA-256, empty until mined.
    pub hash: String,
}

impl Block {
    pub fn new(payload: Payload, previous_hash: impl Into<String>) -> Self {
        Self::with_timestamp(payload, previous_hash, Utc::now())
    }

    pub fn with_timestamp(
        payload: Payload,
        previous_hash: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            payload,
            previous_hash: previous_hash.into(),
            timestamp,
            nonce: 0,
            hash: String::new(),
        }
    }

    /// An empty block carrying the sentinel hash. It is never mined.
    pub fn genesis() -> Self {
        Self {
            hash: GENESIS_HASH.to_string(),
            ..Self::new(Payload::new(), GENESIS_PREVIOUS_HASH)
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.hash == GENESIS_HASH && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Timestamp as hashed: RFC 3339, nanosecond precision, `Z` suffix.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    /// Everything the hash covers except the nonce:
    /// `previous_hash || canonical(payload) || timestamp`.
    pub fn hash_preimage(&self) -> Vec<u8> {
        let payload = canonical_payload(&self.payload);
        let timestamp = self.timestamp_string();
        let mut bytes =
            Vec::with_capacity(self.previous_hash.len() + payload.len() + timestamp.len());
        bytes.extend_from_slice(self.previous_hash.as_bytes());
        bytes.extend_from_slice(payload.as_bytes());
        bytes.extend_from_slice(timestamp.as_bytes());
        bytes
    }

    pub fn calculate_hash(&self) -> String {
        digest_hex(&self.hash_preimage(), self.nonce)
    }

    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }

    /// Search nonces upward from the current one until the hash has
    /// `difficulty` leading zero characters. Blocks until found.
    ///
    /// The starting nonce is hashed and tested before any increment, so a
    /// fresh block can be mined at nonce 0.
    pub fn mine(&mut self, difficulty: usize) {
        let preimage = self.hash_preimage();
        self.hash = digest_hex(&preimage, self.nonce);
        while !self.meets_difficulty(difficulty) {
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = digest_hex(&preimage, self.nonce);
        }
        trace!(nonce = self.nonce, hash = %self.hash, "block mined");
    }
}
