use criterion::{black_box, criterion_group, criterion_main, Criterion};
use craft_diff::{
    encrypt, Block, CipherOracle, Differential, DifferentialOracle, MasterKey, TweakeySchedule,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn oracle_benchmarks(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0xC4AF7);
    let key = MasterKey::random(&mut rng);
    let tk = TweakeySchedule::derive(&key, &Block::random(&mut rng));
    let p = Block::random(&mut rng);

    let mut group = c.benchmark_group("CRAFT");

    for rounds in [6usize, 32] {
        group.bench_with_input(format!("encrypt ({} rounds)", rounds), &rounds, |b, &r| {
            b.iter(|| encrypt(black_box(r), black_box(&p), &tk))
        });
    }

    group.bench_function("schedule derivation", |b| {
        b.iter(|| TweakeySchedule::derive(black_box(&key), black_box(&p)))
    });

    // One bunch of the default experiment
    let oracle = CipherOracle::new(6, Differential::craft_six_round());
    group.bench_function("oracle bunch (1024 queries, 6 rounds)", |b| {
        b.iter(|| oracle.count_matches(&tk, black_box(1024), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, oracle_benchmarks);
criterion_main!(benches);
