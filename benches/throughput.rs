//! Benchmarks for submission and drain throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strand_pool::{Config, QueuePool, WorkerPool};

fn wait_for(counter: &AtomicUsize, target: usize) {
    while counter.load(Ordering::Relaxed) < target {
        std::thread::yield_now();
    }
}

fn pool_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_throughput");

    for workers in [1, 4].iter() {
        let pool = WorkerPool::new(*workers).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        group.bench_with_input(
            BenchmarkId::new("workers", workers),
            workers,
            |b, _workers| {
                b.iter(|| {
                    counter.store(0, Ordering::Relaxed);
                    for i in 0..1_000usize {
                        let counter = counter.clone();
                        pool.execute(move || {
                            black_box(i);
                            counter.fetch_add(1, Ordering::Relaxed);
                        })
                        .unwrap();
                    }
                    wait_for(&counter, 1_000);
                });
            },
        );
    }

    group.finish();
}

fn priority_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_submission");

    for levels in [1, 4, 16].iter() {
        let config = Config::builder()
            .workers(2)
            .priority_levels(*levels)
            .build()
            .unwrap();
        let pool = WorkerPool::with_config(config).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        group.bench_with_input(BenchmarkId::new("levels", levels), levels, |b, &levels| {
            b.iter(|| {
                counter.store(0, Ordering::Relaxed);
                for i in 0..1_000usize {
                    let counter = counter.clone();
                    pool.execute_with_priority(
                        move || {
                            counter.fetch_add(1, Ordering::Relaxed);
                        },
                        i % levels,
                    )
                    .unwrap();
                }
                wait_for(&counter, 1_000);
            });
        });
    }

    group.finish();
}

fn shard_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_routing");

    for shards in [2, 8].iter() {
        let pool = QueuePool::new(*shards).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        group.bench_with_input(BenchmarkId::new("shards", shards), shards, |b, &shards| {
            b.iter(|| {
                counter.store(0, Ordering::Relaxed);
                for i in 0..1_000usize {
                    let counter = counter.clone();
                    pool.push(i % shards, move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                }
                wait_for(&counter, 1_000);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, pool_throughput, priority_submission, shard_routing);
criterion_main!(benches);
