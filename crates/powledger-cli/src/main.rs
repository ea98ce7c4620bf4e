use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use powledger_core::{
    constants::DEFAULT_DIFFICULTY, payload_from, Block, Chain, ChainConfig, Payload,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "powledger")]
#[command(about = "Mine and verify a minimal proof-of-work ledger")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine two sample transfers and print the chain
    Demo {
        #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,
    },
    /// Mine one block per payload and print the chain
    Mine {
        /// Block payload as a JSON object; repeat for more blocks
        #[arg(long = "payload", required = true)]
        payloads: Vec<String>,
        /// Leading zero hex characters required in each hash
        #[arg(long)]
        difficulty: Option<usize>,
        /// Mining threads (1 = current thread, 0 = one per core)
        #[arg(long)]
        threads: Option<usize>,
        /// Give up on a block after this many attempts
        #[arg(long)]
        max_attempts: Option<u64>,
        /// JSON file with `difficulty` and `miner` settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write the chain to this file as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a chain file written by `mine --output`
    Verify {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo { difficulty } => demo(difficulty),
        Command::Mine {
            payloads,
            difficulty,
            threads,
            max_attempts,
            config,
            output,
        } => {
            let mut config = match config {
                Some(path) => ChainConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ChainConfig::default(),
            };
            if let Some(difficulty) = difficulty {
                config.difficulty = difficulty;
            }
            if let Some(threads) = threads {
                config.miner.threads = threads;
            }
            if max_attempts.is_some() {
                config.miner.max_attempts = max_attempts;
            }
            mine(&config, &payloads, output.as_deref())
        }
        Command::Verify { file } => verify(&file),
    }
}

fn demo(difficulty: usize) -> Result<()> {
    let mut chain = Chain::new(difficulty);
    chain.add_block_from(&json!({"from": "A", "to": "B", "code": "0x938018"}))?;
    chain.add_block_from(&json!({"from": "A", "to": "B", "amount": 10}))?;
    print_chain(&chain)
}

fn mine(config: &ChainConfig, raw_payloads: &[String], output: Option<&Path>) -> Result<()> {
    // Reject bad input before spending any time mining.
    let payloads = raw_payloads
        .iter()
        .map(|raw| parse_payload(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut chain = Chain::with_config(config);
    info!(
        "Mining {} blocks at difficulty {} on {} threads",
        payloads.len(),
        chain.difficulty(),
        chain.miner().threads
    );
    for payload in payloads {
        chain.try_add_block(payload, None)?;
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(chain.blocks())?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote chain to {}", path.display());
    }
    print_chain(&chain)
}

fn parse_payload(raw: &str) -> Result<Payload> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("payload is not valid JSON: {raw}"))?;
    payload_from(&value).with_context(|| format!("bad payload {raw}"))
}

fn verify(file: &Path) -> Result<()> {
    let raw =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let blocks: Vec<Block> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    let chain = Chain::from_blocks(blocks, &ChainConfig::default())?;
    if let Err(e) = chain.validate() {
        bail!("invalid chain: {e}");
    }
    println!("valid: {} blocks", chain.blocks().len());
    Ok(())
}

fn print_chain(chain: &Chain) -> Result<()> {
    println!("valid: {}", chain.is_valid());
    for block in chain.blocks() {
        println!("{}", serde_json::to_string(block)?);
    }
    Ok(())
}
