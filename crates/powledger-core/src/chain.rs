use crate::block::Block;
use crate::canonical::{payload_from, Payload};
use crate::config::{ChainConfig, MinerConfig};
use crate::error::{LedgerError, ValidationError};
use crate::mine::{mine_with_config, CancelFlag};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Append-only sequence of mined blocks starting at a genesis block.
#[derive(Clone, Debug)]
pub struct Chain {
    genesis: Block,
    blocks: Vec<Block>,
    difficulty: usize,
    miner: MinerConfig,
}

impl Chain {
    /// A fresh chain holding only its genesis block.
    pub fn new(difficulty: usize) -> Self {
        Self::with_config(&ChainConfig::with_difficulty(difficulty))
    }

    pub fn with_config(config: &ChainConfig) -> Self {
        let genesis = Block::genesis();
        debug!(
            "Created chain with difficulty {} at {}",
            config.difficulty,
            genesis.timestamp_string()
        );
        Self {
            blocks: vec![genesis.clone()],
            genesis,
            difficulty: config.difficulty,
            miner: config.miner.clone(),
        }
    }

    /// Adopt a block sequence built elsewhere. The first block is taken as
    /// genesis. Nothing is checked here; call [`Chain::validate`].
    pub fn from_blocks(blocks: Vec<Block>, config: &ChainConfig) -> Result<Self, LedgerError> {
        let genesis = blocks.first().cloned().ok_or(LedgerError::EmptyChain)?;
        Ok(Self {
            genesis,
            blocks,
            difficulty: config.difficulty,
            miner: config.miner.clone(),
        })
    }

    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds its genesis block")
    }

    /// Number of blocks after genesis.
    pub fn height(&self) -> usize {
        self.blocks.len() - 1
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn miner(&self) -> &MinerConfig {
        &self.miner
    }

    fn candidate(&self, payload: Payload) -> Block {
        Block::new(payload, self.tip().hash.clone())
    }

    fn push(&mut self, block: Block) -> &Block {
        info!(
            "Appended block {} with nonce {} and hash {}",
            self.blocks.len(),
            block.nonce,
            block.hash
        );
        self.blocks.push(block);
        self.tip()
    }

    /// Mine a block for `payload` on top of the tip and append it.
    /// Blocks until a nonce is found.
    pub fn add_block(&mut self, payload: Payload) -> &Block {
        let mut block = self.candidate(payload);
        block.mine(self.difficulty);
        self.push(block)
    }

    /// Like [`Chain::add_block`] but mines with the chain's miner settings
    /// and honours `cancel`. Nothing is appended on error.
    pub fn try_add_block(
        &mut self,
        payload: Payload,
        cancel: Option<&CancelFlag>,
    ) -> Result<&Block, LedgerError> {
        let mut block = self.candidate(payload);
        mine_with_config(&mut block, self.difficulty, &self.miner, cancel)?;
        Ok(self.push(block))
    }

    /// Serialize `value` into a payload and append it.
    pub fn add_block_from<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&Block, LedgerError> {
        let payload = payload_from(value)?;
        Ok(self.add_block(payload))
    }

    /// Check every consecutive pair of blocks and report the first bad edge.
    ///
    /// The genesis block is never rehashed: its hash is a placeholder.
    /// Difficulty is not rechecked either, only hash integrity and linkage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = i + 1;

            let computed = current.calculate_hash();
            if current.hash != computed {
                return Err(ValidationError::HashMismatch {
                    index,
                    stored: current.hash.clone(),
                    computed,
                });
            }
            if current.previous_hash != previous.hash {
                return Err(ValidationError::BrokenLink {
                    index,
                    expected: previous.hash.clone(),
                    found: current.previous_hash.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Chain validation failed: {e}");
                false
            }
        }
    }
}
