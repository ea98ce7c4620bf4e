//! Error types for the ledger engine.

use thiserror::Error;

/// Errors returned while building payloads, mining or assembling chains.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The value could not be represented as JSON (e.g. a map with non-string keys).
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Payloads must be JSON objects at the top level.
    #[error("payload must be a JSON object, got {0}")]
    PayloadNotObject(&'static str),

    /// The cancel flag was raised before a valid nonce was found.
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    /// The attempt cap was reached without a valid nonce.
    #[error("no valid nonce found within {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },

    #[error("failed to build mining thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A chain needs at least its genesis block.
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The first broken edge found while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: stored hash {stored} does not match recomputed {computed}")]
    HashMismatch {
        index: usize,
        stored: String,
        computed: String,
    },

    #[error("block {index}: previous hash {found} does not match predecessor hash {expected}")]
    BrokenLink {
        index: usize,
        expected: String,
        found: String,
    },
}

impl ValidationError {
    /// Index of the offending block.
    pub fn index(&self) -> usize {
        match self {
            ValidationError::HashMismatch { index, .. } => *index,
            ValidationError::BrokenLink { index, .. } => *index,
        }
    }
}
