//! Distribute a list of numbers across three bots and print the report.

use botswarm::{processor_fn, BotConfig, BotManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    botswarm::init_logging(false);

    let config = BotConfig {
        num_bots: 3,
        max_retries: 0,
        retry_delay_secs: 0.0,
        ..BotConfig::default()
    };

    let manager = BotManager::new(
        config,
        processor_fn(|n: i64| async move { Ok::<_, anyhow::Error>(n * n) }),
    )?;

    let report = manager.execute((1..=20i64).collect()).await?;

    println!(
        "processed {} tasks: {} ok, {} failed ({:.1}% in {:?})",
        report.total_tasks,
        report.successful,
        report.failed,
        report.success_rate,
        report.execution_time,
    );

    for result in report.results.iter().take(5) {
        println!("  {} -> {:?}", result.task, result.result);
    }

    for progress in &report.bot_progress {
        println!(
            "bot {} finished {} tasks in {:?}",
            progress.bot_id, progress.tasks_completed, progress.elapsed
        );
    }

    Ok(())
}
