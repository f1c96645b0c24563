//! Flaky tasks, bounded retries, and live progress monitoring.
//!
//! Tasks divisible by four fail on their first attempt and recover on
//! retry; tasks divisible by seven never recover and end up in the failed
//! list. A monitor task prints snapshots while the run is in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use botswarm::{processor_fn, BotConfig, BotManager, BotProgress};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    botswarm::init_logging(true);

    let attempts: Arc<Mutex<HashMap<u32, u32>>> = Arc::new(Mutex::new(HashMap::new()));
    let seen = attempts.clone();

    let processor = processor_fn(move |n: u32| {
        let seen = seen.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;

            let attempt = {
                let mut map = seen.lock().unwrap();
                let entry = map.entry(n).or_insert(0);
                *entry += 1;
                *entry
            };

            if n % 7 == 0 {
                return Err(anyhow!("task {n} is permanently broken"));
            }
            if n % 4 == 0 && attempt == 1 {
                return Err(anyhow!("task {n} needs a second try"));
            }

            Ok(n * 10)
        }
    });

    let config = BotConfig {
        num_bots: 4,
        max_retries: 2,
        retry_delay_secs: 0.05,
        monitor_interval_secs: 0.1,
        ..BotConfig::default()
    };
    let interval = config.monitor_interval();

    let manager = Arc::new(BotManager::new(config, processor)?);

    let exec = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.execute((1..=24).collect()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let monitor = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .monitor_progress(
                    interval,
                    Some(Box::new(|progress: &[BotProgress]| {
                        for p in progress {
                            println!(
                                "bot {} ({}): {}/{} done",
                                p.bot_id,
                                p.state,
                                p.tasks_completed + p.tasks_failed,
                                p.tasks_total
                            );
                        }
                    })),
                )
                .await;
        })
    };

    let report = exec.await??;
    monitor.await?;

    println!(
        "\n{} of {} tasks succeeded ({:.1}%)",
        report.successful, report.total_tasks, report.success_rate
    );
    for failed in &report.failed_tasks {
        println!(
            "task {} failed on bot {}: {}",
            failed.task, failed.bot_id, failed.error
        );
    }

    Ok(())
}
