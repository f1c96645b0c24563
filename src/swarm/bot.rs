//! Bot execution unit
//!
//! A bot owns one batch and drives a sequential per-task retry loop. Exactly
//! one worker drives a given bot for its entire lifetime; everyone else only
//! reads progress snapshots taken under the bot's own guard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::processor::TaskProcessor;
use crate::swarm::types::{BotProgress, BotState, TaskResult};
use crate::{Result, SwarmError};

/// A worker unit that sequentially processes one batch of tasks
pub struct Bot<P: TaskProcessor> {
    id: usize,
    max_retries: u32,
    retry_delay: Duration,
    processor: Arc<P>,
    progress: Mutex<ProgressState>,
    results: Mutex<Vec<TaskResult<P::Task, P::Output>>>,
}

/// Progress snapshot plus the monotonic instants backing `elapsed`
struct ProgressState {
    snapshot: BotProgress,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl<P: TaskProcessor> Bot<P> {
    /// Construct an idle bot with zeroed counters.
    pub fn new(id: usize, processor: Arc<P>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            id,
            max_retries,
            retry_delay,
            processor,
            progress: Mutex::new(ProgressState {
                snapshot: BotProgress::new(id),
                started: None,
                finished: None,
            }),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Index of this bot.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Process every task in `batch`, in order.
    ///
    /// A task failure never aborts the remaining batch; after the last task
    /// the bot is `Completed` even when every retry was exhausted. An empty
    /// batch completes immediately without passing through `Active`.
    pub async fn run(&self, batch: Vec<P::Task>) -> Result<()> {
        {
            let mut guard = self.progress.lock();
            guard.snapshot.tasks_total = batch.len();
        }

        if batch.is_empty() {
            debug!(bot_id = self.id, "empty batch, completing immediately");
            return self.transition(BotState::Completed);
        }

        info!(bot_id = self.id, tasks = batch.len(), "bot starting");
        self.transition(BotState::Active)?;

        for task in batch {
            let result = self.process_single(task).await;
            self.record(result);
        }

        self.transition(BotState::Completed)?;

        let progress = self.snapshot();
        info!(
            bot_id = self.id,
            completed = progress.tasks_completed,
            failed = progress.tasks_failed,
            "bot finished"
        );

        Ok(())
    }

    /// Process one task with the bounded retry loop.
    ///
    /// The processor is invoked at most `max_retries + 1` times; a fixed
    /// `retry_delay` separates attempts. Attempt counting is scoped to this
    /// task alone.
    async fn process_single(&self, task: P::Task) -> TaskResult<P::Task, P::Output> {
        let started = Instant::now();
        let max_attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.processor.process(task.clone()).await {
                Ok(output) => {
                    if attempt > 1 {
                        debug!(bot_id = self.id, attempt, "task succeeded after retry");
                    }
                    return TaskResult::succeeded(self.id, task, output, started.elapsed());
                }
                Err(error) => {
                    last_error = format!("{error:#}");
                    warn!(
                        bot_id = self.id,
                        attempt,
                        max_attempts,
                        error = %last_error,
                        "task attempt failed"
                    );

                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        TaskResult::failed(self.id, task, last_error, started.elapsed())
    }

    /// Update counters and stash the result; called after every task.
    fn record(&self, result: TaskResult<P::Task, P::Output>) {
        {
            let mut guard = self.progress.lock();
            if result.success {
                guard.snapshot.tasks_completed += 1;
            } else {
                guard.snapshot.tasks_failed += 1;
            }
            refresh_elapsed(&mut guard);
        }

        self.results.lock().push(result);
    }

    /// Apply a state transition, enforcing the transition table.
    ///
    /// A rejected transition is a bookkeeping fault: the bot moves to
    /// `Error` (when not already terminal) and the fault is returned.
    fn transition(&self, next: BotState) -> Result<()> {
        let mut guard = self.progress.lock();
        let current = guard.snapshot.state;

        if !current.can_transition_to(next) {
            let message = format!("invalid state transition: {current} -> {next}");
            if current.can_transition_to(BotState::Error) {
                apply_transition(&mut guard, BotState::Error);
            }
            warn!(bot_id = self.id, error = %message, "bot bookkeeping fault");
            return Err(SwarmError::BotFault {
                bot_id: self.id,
                message,
            });
        }

        apply_transition(&mut guard, next);
        Ok(())
    }

    /// Force the bot into `Error` after its worker died mid-batch.
    ///
    /// Partial results recorded before the fault remain collectable.
    pub(crate) fn mark_faulted(&self, message: &str) {
        let mut guard = self.progress.lock();
        if !guard.snapshot.state.is_terminal() {
            apply_transition(&mut guard, BotState::Error);
        }
        warn!(bot_id = self.id, error = message, "bot worker fault");
    }

    /// Copy-on-read snapshot of this bot's progress.
    pub fn snapshot(&self) -> BotProgress {
        self.progress.lock().snapshot.clone()
    }

    /// Drain the results accumulated so far, in batch order.
    pub fn take_results(&self) -> Vec<TaskResult<P::Task, P::Output>> {
        std::mem::take(&mut *self.results.lock())
    }
}

fn apply_transition(guard: &mut ProgressState, next: BotState) {
    let now = Instant::now();

    if guard.started.is_none() {
        guard.started = Some(now);
        guard.snapshot.started_at = Some(Utc::now());
    }
    if next.is_terminal() {
        guard.finished = Some(now);
    }

    guard.snapshot.state = next;
    refresh_elapsed(guard);
}

fn refresh_elapsed(guard: &mut ProgressState) {
    if let Some(started) = guard.started {
        let end = guard.finished.unwrap_or_else(Instant::now);
        guard.snapshot.elapsed = end.duration_since(started);
    }
}
