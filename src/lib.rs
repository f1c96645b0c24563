//! # Botswarm
//!
//! A framework for distributing independent tasks across a fixed pool of
//! concurrent workers ("bots"), with bounded retry on failure, live progress
//! tracking, and a deterministic aggregated report.
//!
//! ## Overview
//!
//! Callers supply a per-task processing function and a bot count; the engine
//! partitions the task list into contiguous near-even batches, runs one
//! worker per bot, retries failed tasks with a fixed delay, and returns a
//! single consolidated report once every bot has finished. Task order in the
//! report follows the static partition, never wall-clock completion order.
//!
//! ## Quick Start
//!
//! ```rust
//! use botswarm::{processor_fn, BotConfig, BotManager};
//!
//! # async fn example() -> botswarm::Result<()> {
//! let config = BotConfig {
//!     num_bots: 3,
//!     max_retries: 0,
//!     ..BotConfig::default()
//! };
//!
//! let manager = BotManager::new(config, processor_fn(|n: i64| async move {
//!     Ok::<_, anyhow::Error>(n * 2)
//! }))?;
//!
//! let report = manager.execute((1..=10i64).collect()).await?;
//! assert_eq!(report.successful, 10);
//! assert_eq!(report.results[0].result, Some(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Static partitioning**: contiguous near-even batches, one per bot
//! - **Bounded retry**: per-task retry loop with a fixed delay, failures
//!   become data rather than errors
//! - **Live progress**: per-bot copy-on-read snapshots, safe to poll while
//!   a run is in flight
//! - **Deterministic reports**: result order is a function of the partition,
//!   independent of which bot finishes first
//!
//! ## Modules
//!
//! - [`swarm`]: the worker-pool execution engine
//! - [`processor`]: the caller-supplied task processor seam
//! - [`config`]: configuration loading and validation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use thiserror::Error;

/// Result type for botswarm operations
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Main error type for botswarm operations
#[derive(Error, Debug)]
pub enum SwarmError {
    /// Invalid configuration, rejected before any bot starts
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A fault in a bot's own bookkeeping, distinct from a task failure
    #[error("bot {bot_id} bookkeeping fault: {message}")]
    BotFault {
        /// Index of the faulted bot
        bot_id: usize,
        /// Description of the fault
        message: String,
    },
}

/// Configuration loading and validation
pub mod config;

/// Caller-supplied task processor seam
pub mod processor;

/// Worker-pool execution engine
pub mod swarm;

pub use config::BotConfig;
pub use processor::{processor_fn, FnProcessor, TaskProcessor};
pub use swarm::{
    divide_tasks, AggregateReport, Bot, BotManager, BotProgress, BotState, FailedTask,
    ProgressCallback, TaskResult,
};

/// Install a global `tracing` subscriber for the process.
///
/// Honors `RUST_LOG` when set; otherwise defaults to `debug` when `verbose`
/// is true and `info` when it is not. Safe to call more than once — later
/// calls are no-ops.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
