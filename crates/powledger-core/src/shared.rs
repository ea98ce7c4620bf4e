//! A chain handle that can be cloned across threads.
//!
//! Appends hold the write lock from reading the tip until the mined block is
//! pushed, so two appenders never build on the same tip. Readers validate
//! under the read lock or work from a cloned snapshot.

use crate::block::Block;
use crate::canonical::Payload;
use crate::chain::Chain;
use crate::error::{LedgerError, ValidationError};
use crate::mine::CancelFlag;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct SharedChain {
    inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    /// Mine and append; returns a copy of the appended block.
    pub fn add_block(&self, payload: Payload) -> Block {
        self.inner.write().add_block(payload).clone()
    }

    pub fn try_add_block(
        &self,
        payload: Payload,
        cancel: Option<&CancelFlag>,
    ) -> Result<Block, LedgerError> {
        self.inner
            .write()
            .try_add_block(payload, cancel)
            .map(Block::clone)
    }

    pub fn snapshot(&self) -> Vec<Block> {
        self.inner.read().blocks().to_vec()
    }

    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    pub fn tip_hash(&self) -> String {
        self.inner.read().tip().hash.clone()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.inner.read().validate()
    }

    pub fn is_valid(&self) -> bool {
        self.inner.read().is_valid()
    }

    /// Unwrap the chain if this is the last handle.
    pub fn into_inner(self) -> Result<Chain, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
