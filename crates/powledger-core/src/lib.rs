//! A minimal proof-of-work ledger.
//!
//! Blocks carry an opaque JSON payload and are bound to their predecessor by
//! hash. Appending a block to a [`Chain`] mines a nonce whose SHA-256 digest
//! starts with `difficulty` zero hex characters. [`Chain::is_valid`] rehashes
//! every non-genesis block and checks the links between them.

pub mod block;
pub mod canonical;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod mine;
pub mod pow;
pub mod shared;

pub use block::Block;
pub use canonical::{payload_from, Payload};
pub use chain::Chain;
pub use config::{ChainConfig, MinerConfig};
pub use error::{LedgerError, ValidationError};
pub use mine::{CancelFlag, MineOutcome};
pub use shared::SharedChain;

/// Shorthand for [`Chain::new`].
pub fn create_blockchain(difficulty: usize) -> Chain {
    Chain::new(difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GENESIS_HASH;

    #[test]
    fn create_blockchain_example() {
        let mut chain = create_blockchain(1);
        assert_eq!(chain.difficulty(), 1);
        assert_eq!(chain.blocks().len(), 1);
        assert_eq!(chain.genesis().hash, GENESIS_HASH);

        chain.add_block(Payload::new());
        assert_eq!(chain.blocks().len(), 2);
        assert!(chain.tip().meets_difficulty(1));
        assert!(chain.is_valid());
    }
}
