use batchpool::BatchPool;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

/// CPU-bound executor: a small LCG spin proportional to the work value.
fn spin(iters: u64) -> u64 {
    let mut acc = iters;
    for _ in 0..iters {
        acc = acc
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
    }
    acc
}

fn dispatch_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for &threads in &[1u32, 4, 8] {
        group.bench_function(format!("threads-{threads}"), |b| {
            b.iter_batched(
                || {
                    let mut rng = thread_rng();
                    let work: Vec<u64> =
                        (0..256).map(|_| rng.gen_range(1_000..10_000)).collect();
                    (BatchPool::new(threads).unwrap(), work)
                },
                |(mut pool, work)| {
                    let results = pool.execute(work, spin).unwrap();
                    black_box(results);
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, dispatch_bench);
criterion_main!(benches);
