use botswarm::{divide_tasks, processor_fn, BotConfig, BotManager};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;

fn partition_benchmark(c: &mut Criterion) {
    let tasks: Vec<u64> = (0..10_000).collect();

    c.bench_function("divide_10k_tasks_8_bots", |b| {
        b.iter(|| divide_tasks(black_box(tasks.clone()), black_box(8)))
    });
}

fn execution_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("execute_256_tasks_8_bots", |b| {
        b.iter(|| {
            rt.block_on(async {
                let config = BotConfig {
                    num_bots: 8,
                    max_retries: 0,
                    retry_delay_secs: 0.0,
                    ..BotConfig::default()
                };

                let manager = BotManager::new(
                    config,
                    processor_fn(|n: u64| async move {
                        Ok::<_, anyhow::Error>(n.wrapping_mul(31))
                    }),
                )
                .unwrap();

                manager.execute((0..256u64).collect()).await.unwrap()
            })
        })
    });
}

criterion_group!(benches, partition_benchmark, execution_benchmark);
criterion_main!(benches);
