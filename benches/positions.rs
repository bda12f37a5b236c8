//! Benchmarks for mine position generation and verification.
//!
//! Run with: cargo bench --bench positions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mines_fair::{commit, generate_mine_positions, verify_claim, BoardParams, RoundClaim};

const SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_mine_positions");

    for (board_size, mine_count) in [(25, 3), (25, 24), (100, 20), (1024, 100)] {
        let params = BoardParams::new(board_size, mine_count).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", board_size, mine_count)),
            &params,
            |b, params| {
                let mut nonce = 0u64;
                b.iter(|| {
                    nonce += 1;
                    black_box(generate_mine_positions(
                        black_box(SECRET),
                        black_box("bench"),
                        nonce,
                        *params,
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let params = BoardParams::standard(3).unwrap();
    let claim = RoundClaim {
        secret: SECRET.to_owned(),
        commitment_hash: commit(SECRET),
        client_seed: "bench".to_owned(),
        nonce: 7,
        board_size: params.board_size(),
        mine_count: params.mine_count(),
        claimed_positions: generate_mine_positions(SECRET, "bench", 7, params),
    };

    c.bench_function("verify_claim_25x3", |b| {
        b.iter(|| black_box(verify_claim(black_box(&claim)).unwrap()))
    });
}

criterion_group!(benches, bench_generate, bench_verify);
criterion_main!(benches);
