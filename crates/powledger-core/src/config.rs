//! Chain and miner settings.

use crate::constants::DEFAULT_DIFFICULTY;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Worker threads. 1 mines on the caller's thread, 0 lets rayon pick.
    pub threads: usize,
    /// Give up after this many hash attempts. `None` searches forever.
    pub max_attempts: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            max_attempts: None,
        }
    }
}

impl MinerConfig {
    pub fn is_parallel(&self) -> bool {
        self.threads != 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Required leading zero hex characters in each block hash.
    pub difficulty: usize,
    pub miner: MinerConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            miner: MinerConfig::default(),
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }
}
