use criterion::{criterion_group, criterion_main, Criterion};
use powledger_core::{mine::mine_parallel, Block, MinerConfig, Payload};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

fn sample_block() -> Block {
    let mut rng = StdRng::seed_from_u64(42);
    let mut payload = Payload::new();
    for i in 0..10 {
        payload.insert(
            format!("tx-{i}"),
            json!({"from": format!("alice-{i}"), "to": "bob", "amount": rng.gen_range(1..10)}),
        );
    }
    Block::new(payload, "0")
}

fn bench_pow(c: &mut Criterion) {
    let block = sample_block();

    c.bench_function("calculate_hash", |b| b.iter(|| block.calculate_hash()));

    c.bench_function("mine_block_difficulty_3", |b| {
        b.iter(|| {
            let mut mined = block.clone();
            mined.mine(3);
        });
    });

    let config = MinerConfig {
        threads: 0,
        max_attempts: None,
    };
    c.bench_function("mine_parallel_difficulty_3", |b| {
        b.iter(|| {
            let mut mined = block.clone();
            mine_parallel(&mut mined, 3, &config, None).unwrap();
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
