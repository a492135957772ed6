use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use coup_engine::{Config, Driver, RandomOracle};

fn complete_game(num_players: usize, seed: u64) {
    let oracle = RandomOracle::new(Pcg64::seed_from_u64(seed));
    let mut driver = Driver::new(oracle, Pcg64::seed_from_u64(seed + 1), Config::default());
    let coup = driver.initialize(&[], num_players).unwrap();
    black_box(coup.winner());
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_game");
    for num_players in 2..=5usize {
        group.bench_with_input(BenchmarkId::from_parameter(num_players), &num_players, |b, &num_players| {
            let mut seed = 0;
            b.iter(|| {
                seed += 2;
                complete_game(num_players, seed)
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
