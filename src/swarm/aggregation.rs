//! Result aggregation
//!
//! The aggregate report is compiled exactly once, after every bot has
//! joined, and is immutable thereafter.

use std::time::Duration;

use serde::Serialize;

use crate::swarm::types::{BotProgress, TaskResult};

/// Projection of one permanently failed task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedTask<T> {
    /// The original task value
    pub task: T,
    /// Last error message recorded for the task
    pub error: String,
    /// Index of the bot that processed the task
    pub bot_id: usize,
}

/// Consolidated outcome of one `execute` run
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport<T, R> {
    /// Number of tasks attempted across all bots
    pub total_tasks: usize,
    /// Tasks that ended successfully
    pub successful: usize,
    /// Tasks that exhausted their retries
    pub failed: usize,
    /// Percentage of successful tasks, 0 when no tasks were supplied
    pub success_rate: f64,
    /// Wall-clock time from first bot start to last bot finish
    pub execution_time: Duration,
    /// Every task result, in static partition order
    pub results: Vec<TaskResult<T, R>>,
    /// Final progress snapshot per bot, in bot-index order
    pub bot_progress: Vec<BotProgress>,
    /// Every permanently failed task with its last error
    pub failed_tasks: Vec<FailedTask<T>>,
}

impl<T: Clone, R> AggregateReport<T, R> {
    /// Compile the report from per-bot results concatenated in bot-index
    /// order.
    pub fn compile(
        results: Vec<TaskResult<T, R>>,
        bot_progress: Vec<BotProgress>,
        execution_time: Duration,
    ) -> Self {
        let total_tasks = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        let failed = total_tasks - successful;

        let success_rate = if total_tasks > 0 {
            successful as f64 / total_tasks as f64 * 100.0
        } else {
            0.0
        };

        let failed_tasks = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| FailedTask {
                task: r.task.clone(),
                error: r.error.clone().unwrap_or_default(),
                bot_id: r.bot_id,
            })
            .collect();

        Self {
            total_tasks,
            successful,
            failed,
            success_rate,
            execution_time,
            results,
            bot_progress,
            failed_tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<TaskResult<i32, i32>> {
        vec![
            TaskResult::succeeded(0, 1, 2, Duration::from_millis(5)),
            TaskResult::failed(0, 2, "broken".to_string(), Duration::from_millis(8)),
            TaskResult::succeeded(1, 3, 6, Duration::from_millis(3)),
        ]
    }

    #[test]
    fn test_compile_statistics() {
        let report = AggregateReport::compile(sample_results(), Vec::new(), Duration::ZERO);

        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert!((report.success_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_failed_task_projection() {
        let report = AggregateReport::compile(sample_results(), Vec::new(), Duration::ZERO);

        assert_eq!(report.failed_tasks.len(), 1);
        assert_eq!(report.failed_tasks[0].task, 2);
        assert_eq!(report.failed_tasks[0].error, "broken");
        assert_eq!(report.failed_tasks[0].bot_id, 0);
        assert_eq!(report.failed_tasks.len(), report.failed);
    }

    #[test]
    fn test_empty_report_has_zero_rate() {
        let report: AggregateReport<i32, i32> =
            AggregateReport::compile(Vec::new(), Vec::new(), Duration::ZERO);

        assert_eq!(report.total_tasks, 0);
        assert_eq!(report.successful, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.success_rate, 0.0);
    }

    #[test]
    fn test_counts_always_balance() {
        let report = AggregateReport::compile(sample_results(), Vec::new(), Duration::ZERO);
        assert_eq!(report.successful + report.failed, report.total_tasks);
    }
}
