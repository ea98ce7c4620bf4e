use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

fn powledger() -> Command {
    Command::cargo_bin("powledger").expect("binary builds")
}

#[test]
fn demo_prints_a_valid_chain() {
    powledger()
        .args(["demo", "--difficulty", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("valid: true"))
        .stdout(predicate::str::contains("0x938018"))
        .stdout(predicate::str::contains(r#""amount":10"#));
}

#[test]
fn mine_then_verify_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("chain.json");

    powledger()
        .args(["mine", "--difficulty", "1", "--threads", "2"])
        .args(["--payload", r#"{"from":"A","to":"B","amount":10}"#])
        .args(["--payload", r#"{"note":"second"}"#])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid: true"));

    let blocks: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(blocks.len(), 3);

    powledger()
        .arg("verify")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid: 3 blocks"));
    Ok(())
}

#[test]
fn verify_rejects_tampered_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("chain.json");

    powledger()
        .args(["mine", "--difficulty", "1"])
        .args(["--payload", r#"{"from":"A","to":"B","amount":10}"#])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let mut blocks: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out)?)?;
    blocks[1]["payload"]["amount"] = json!(20);
    fs::write(&out, serde_json::to_string(&blocks)?)?;

    powledger()
        .arg("verify")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid chain"));
    Ok(())
}

#[test]
fn config_file_sets_difficulty() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("config.json");
    let out = dir.path().join("chain.json");
    fs::write(&config, r#"{"difficulty": 2, "miner": {"threads": 1}}"#)?;

    powledger()
        .arg("mine")
        .arg("--config")
        .arg(&config)
        .args(["--payload", "{}"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let blocks: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out)?)?;
    let hash = blocks[1]["hash"].as_str().unwrap_or_default();
    assert!(hash.starts_with("00"));
    Ok(())
}

#[test]
fn mine_rejects_non_object_payload() {
    powledger()
        .args(["mine", "--payload", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));
}

#[test]
fn mine_rejects_malformed_payload() {
    powledger()
        .args(["mine", "--payload", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn mine_gives_up_at_attempt_cap() {
    powledger()
        .args(["mine", "--difficulty", "12", "--max-attempts", "5"])
        .args(["--payload", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid nonce found within 5 attempts"));
}
