use crate::{
    block::Block,
    config::MinerConfig,
    error::LedgerError,
    pow::{digest_hex, meets_difficulty},
};
use rayon::prelude::*;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use tracing::{debug, info};

/// Shared stop signal for an in-flight search.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MineOutcome {
    pub nonce: u64,
    pub hash: String,
    pub attempts: u64,
}

/// Single-threaded search upward from `block.nonce`.
///
/// The block is only written on success; on `Cancelled` or
/// `AttemptsExhausted` it keeps its previous nonce and hash.
pub fn mine_sequential(
    block: &mut Block,
    difficulty: usize,
    max_attempts: Option<u64>,
    cancel: Option<&CancelFlag>,
) -> Result<MineOutcome, LedgerError> {
    let preimage = block.hash_preimage();
    let mut nonce = block.nonce;
    let mut attempts = 0u64;

    loop {
        if max_attempts.is_some_and(|cap| attempts >= cap) {
            return Err(LedgerError::AttemptsExhausted { attempts });
        }
        if cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(LedgerError::Cancelled { attempts });
        }

        let hash = digest_hex(&preimage, nonce);
        attempts += 1;
        if meets_difficulty(&hash, difficulty) {
            info!(
                "Mined block with nonce {} after {} attempts, hash {}",
                nonce, attempts, hash
            );
            block.nonce = nonce;
            block.hash = hash.clone();
            return Ok(MineOutcome {
                nonce,
                hash,
                attempts,
            });
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Searches nonces in parallel until a hash has at least `difficulty`
/// leading zero characters.
///
/// The range `[block.nonce, block.nonce + max_attempts)` is split across a
/// rayon pool of `config.threads` workers. The first worker to succeed stops
/// the rest, so the winning nonce is some valid nonce in the range, not
/// necessarily the smallest.
pub fn mine_parallel(
    block: &mut Block,
    difficulty: usize,
    config: &MinerConfig,
    cancel: Option<&CancelFlag>,
) -> Result<MineOutcome, LedgerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let preimage = block.hash_preimage();
    let start = block.nonce;
    let end = match config.max_attempts {
        Some(cap) => start.saturating_add(cap),
        None => u64::MAX,
    };
    let attempts = AtomicU64::new(0);

    debug!(
        "Parallel mining on {} threads over nonces {}..{}",
        pool.current_num_threads(),
        start,
        end
    );

    // Inner `None` marks a cancelled search.
    let found = pool.install(|| {
        (start..end).into_par_iter().find_map_any(|nonce| {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                return Some(None);
            }
            attempts.fetch_add(1, Ordering::Relaxed);
            let hash = digest_hex(&preimage, nonce);
            meets_difficulty(&hash, difficulty).then_some(Some((nonce, hash)))
        })
    });

    let attempts = attempts.into_inner();
    match found {
        Some(Some((nonce, hash))) => {
            info!(
                "Mined block with nonce {} after {} attempts, hash {}",
                nonce, attempts, hash
            );
            block.nonce = nonce;
            block.hash = hash.clone();
            Ok(MineOutcome {
                nonce,
                hash,
                attempts,
            })
        }
        Some(None) => Err(LedgerError::Cancelled { attempts }),
        None => Err(LedgerError::AttemptsExhausted { attempts }),
    }
}

/// Sequential when `config.threads == 1`, parallel otherwise.
pub fn mine_with_config(
    block: &mut Block,
    difficulty: usize,
    config: &MinerConfig,
    cancel: Option<&CancelFlag>,
) -> Result<MineOutcome, LedgerError> {
    if config.is_parallel() {
        mine_parallel(block, difficulty, config, cancel)
    } else {
        mine_sequential(block, difficulty, config.max_attempts, cancel)
    }
}
