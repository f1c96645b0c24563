//! Orchestration of a bot pool
//!
//! The manager validates configuration up front, partitions tasks, runs one
//! worker per bot, and compiles the aggregate report after the join. The
//! worker-pool size equals the bot count; there is no separate queue-pulling
//! pool.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use parking_lot::RwLock;
use tokio::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::config::BotConfig;
use crate::processor::TaskProcessor;
use crate::swarm::aggregation::AggregateReport;
use crate::swarm::bot::Bot;
use crate::swarm::partition::divide_tasks;
use crate::swarm::types::{BotProgress, BotState};
use crate::Result;

/// Callback invoked with each progress snapshot by the monitor loop
pub type ProgressCallback = Box<dyn Fn(&[BotProgress]) + Send + Sync>;

/// Manages a fixed pool of bots for concurrent task execution
pub struct BotManager<P: TaskProcessor> {
    config: BotConfig,
    processor: Arc<P>,
    bots: RwLock<Vec<Arc<Bot<P>>>>,
}

impl<P: TaskProcessor> BotManager<P> {
    /// Validate `config` and build a manager around `processor`.
    ///
    /// Misconfiguration is the only error surfaced here; it is raised before
    /// any bot exists.
    pub fn new(config: BotConfig, processor: P) -> Result<Self> {
        config.validate()?;

        info!(
            num_bots = config.num_bots,
            max_retries = config.max_retries,
            retry_delay_secs = config.retry_delay_secs,
            "bot manager initialized"
        );

        Ok(Self {
            config,
            processor: Arc::new(processor),
            bots: RwLock::new(Vec::new()),
        })
    }

    /// The validated configuration this manager runs with.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Execute `tasks` across the bot pool and block until every bot has
    /// reached a terminal state.
    ///
    /// The report's result list follows static partition order (bot index,
    /// then position within the batch), regardless of which bot finishes
    /// first. Task failures are reported as data; a worker that dies
    /// mid-batch marks its bot `Error` and its partial results are still
    /// included.
    #[instrument(skip(self, tasks), fields(task_count = tasks.len(), num_bots = self.config.num_bots))]
    pub async fn execute(&self, tasks: Vec<P::Task>) -> Result<AggregateReport<P::Task, P::Output>> {
        let total = tasks.len();
        if total == 0 {
            warn!("no tasks provided to execute");
        }

        let batches = divide_tasks(tasks, self.config.num_bots);

        let bots: Vec<Arc<Bot<P>>> = (0..self.config.num_bots)
            .map(|id| {
                Arc::new(Bot::new(
                    id,
                    Arc::clone(&self.processor),
                    self.config.max_retries,
                    self.config.retry_delay(),
                ))
            })
            .collect();

        *self.bots.write() = bots.clone();

        info!(total, "starting execution across bot pool");
        let run_start = Instant::now();

        let handles: Vec<_> = bots
            .iter()
            .zip(batches)
            .map(|(bot, batch)| {
                let bot = Arc::clone(bot);
                tokio::spawn(async move { bot.run(batch).await })
            })
            .collect();

        for (bot, joined) in bots.iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(fault)) => {
                    warn!(bot_id = bot.id(), error = %fault, "bot ended with bookkeeping fault");
                }
                Err(join_error) => {
                    error!(bot_id = bot.id(), error = %join_error, "bot worker died");
                    bot.mark_faulted(&join_error.to_string());
                }
            }
        }

        let execution_time = run_start.elapsed();

        let mut results = Vec::with_capacity(total);
        for bot in &bots {
            results.extend(bot.take_results());
        }
        let bot_progress: Vec<BotProgress> = bots.iter().map(|bot| bot.snapshot()).collect();

        let report = AggregateReport::compile(results, bot_progress, execution_time);

        let rate = format!("{:.2}%", report.success_rate);
        info!(
            total_tasks = report.total_tasks,
            successful = report.successful,
            failed = report.failed,
            success_rate = %rate,
            execution_ms = report.execution_time.as_millis() as u64,
            "execution finished"
        );

        Ok(report)
    }

    /// Current progress snapshot for every bot.
    ///
    /// Each per-bot snapshot is internally consistent, taken under that
    /// bot's own guard; the list as a whole is not one atomic instant.
    /// Empty until the first call to [`execute`](Self::execute).
    pub fn get_progress(&self) -> Vec<BotProgress> {
        self.bots.read().iter().map(|bot| bot.snapshot()).collect()
    }

    /// Poll progress on a fixed interval until every bot is terminal.
    ///
    /// Intended for a task distinct from the `execute` caller, since
    /// `execute` blocks until completion. Each round waits `interval`,
    /// snapshots progress, and hands the snapshot to `callback`; without a
    /// callback, active bots are logged instead. An empty roster counts as
    /// terminal, so start polling once a run is underway.
    pub async fn monitor_progress(&self, interval: Duration, callback: Option<ProgressCallback>) {
        loop {
            let all_terminal = self
                .bots
                .read()
                .iter()
                .all(|bot| bot.snapshot().state.is_terminal());
            if all_terminal {
                break;
            }

            tokio::time::sleep(interval).await;

            let progress = self.get_progress();
            match &callback {
                Some(callback) => callback(&progress),
                None => {
                    for snapshot in progress.iter().filter(|p| p.state == BotState::Active) {
                        info!(
                            bot_id = snapshot.bot_id,
                            completed = snapshot.tasks_completed,
                            failed = snapshot.tasks_failed,
                            total = snapshot.tasks_total,
                            "bot progress"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::processor_fn;
    use anyhow::anyhow;

    fn doubling_manager(num_bots: usize) -> BotManager<impl TaskProcessor<Task = i64, Output = i64>> {
        let config = BotConfig {
            num_bots,
            max_retries: 0,
            retry_delay_secs: 0.0,
            ..BotConfig::default()
        };

        BotManager::new(
            config,
            processor_fn(|n: i64| async move { Ok::<_, anyhow::Error>(n * 2) }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_execute_doubles_every_task() {
        let manager = doubling_manager(3);
        let report = manager.execute((1..=10i64).collect()).await.unwrap();

        assert_eq!(report.total_tasks, 10);
        assert_eq!(report.successful, 10);
        assert_eq!(report.failed, 0);
        assert_eq!(report.results[0].result, Some(2));
        assert_eq!(report.results[9].result, Some(20));

        let totals: Vec<usize> = report.bot_progress.iter().map(|p| p.tasks_total).collect();
        assert_eq!(totals, vec![4, 3, 3]);
    }

    #[tokio::test]
    async fn test_empty_input_yields_zeroed_report() {
        let manager = doubling_manager(4);
        let report = manager.execute(Vec::new()).await.unwrap();

        assert_eq!(report.total_tasks, 0);
        assert_eq!(report.successful, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report
            .bot_progress
            .iter()
            .all(|p| p.state == BotState::Completed && p.tasks_total == 0));
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let config = BotConfig {
            num_bots: 0,
            ..BotConfig::default()
        };

        let result = BotManager::new(
            config,
            processor_fn(|n: i64| async move { Ok::<_, anyhow::Error>(n) }),
        );

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failures_become_data() {
        let config = BotConfig {
            num_bots: 2,
            max_retries: 1,
            retry_delay_secs: 0.0,
            ..BotConfig::default()
        };

        let manager = BotManager::new(
            config,
            processor_fn(|n: i64| async move {
                if n % 2 == 0 {
                    Err(anyhow!("even tasks are rejected"))
                } else {
                    Ok(n)
                }
            }),
        )
        .unwrap();

        let report = manager.execute((1..=6i64).collect()).await.unwrap();

        assert_eq!(report.total_tasks, 6);
        assert_eq!(report.successful, 3);
        assert_eq!(report.failed, 3);
        assert_eq!(report.failed_tasks.len(), 3);
        assert!(report
            .failed_tasks
            .iter()
            .all(|f| f.error == "even tasks are rejected"));

        // Bots that merely saw task failures still complete normally.
        assert!(report
            .bot_progress
            .iter()
            .all(|p| p.state == BotState::Completed));
    }

    #[tokio::test]
    async fn test_get_progress_before_execute_is_empty() {
        let manager = doubling_manager(2);
        assert!(manager.get_progress().is_empty());
    }
}
