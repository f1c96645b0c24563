//! Data model for the worker-pool engine

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a bot
///
/// Transitions are monotonic: `Idle -> Active -> {Completed, Error}`, with a
/// direct `Idle -> Completed` shortcut for a bot assigned an empty batch.
/// Terminal states admit no exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotState {
    /// Constructed, not yet processing
    Idle,
    /// Processing its batch
    Active,
    /// A fault in the bot's own bookkeeping, not an ordinary task failure
    Error,
    /// All assigned tasks attempted
    Completed,
}

impl BotState {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BotState::Completed | BotState::Error)
    }

    /// Whether the transition table permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: BotState) -> bool {
        matches!(
            (self, next),
            (BotState::Idle, BotState::Active)
                | (BotState::Idle, BotState::Completed)
                | (BotState::Idle, BotState::Error)
                | (BotState::Active, BotState::Completed)
                | (BotState::Active, BotState::Error)
        )
    }
}

impl std::fmt::Display for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BotState::Idle => "idle",
            BotState::Active => "active",
            BotState::Error => "error",
            BotState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Copy-on-read snapshot of one bot's progress
///
/// Written only by the owning bot, after each task and at state transitions.
/// `elapsed` is stored rather than derived at read time, so two snapshots
/// taken with no intervening activity compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotProgress {
    /// Index of the bot this snapshot describes
    pub bot_id: usize,
    /// Current lifecycle state
    pub state: BotState,
    /// Tasks that ended successfully
    pub tasks_completed: usize,
    /// Tasks that exhausted their retries
    pub tasks_failed: usize,
    /// Tasks assigned to this bot
    pub tasks_total: usize,
    /// Wall-clock time the bot started processing, if it has
    pub started_at: Option<DateTime<Utc>>,
    /// Time spent processing so far, frozen once the bot is terminal
    pub elapsed: Duration,
}

impl BotProgress {
    /// A fresh snapshot for a newly constructed bot.
    pub fn new(bot_id: usize) -> Self {
        Self {
            bot_id,
            state: BotState::Idle,
            tasks_completed: 0,
            tasks_failed: 0,
            tasks_total: 0,
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }
}

/// Outcome of one task, recorded after its final attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult<T, R> {
    /// Index of the bot that processed the task
    pub bot_id: usize,
    /// The original task value
    pub task: T,
    /// Whether the task ended successfully
    pub success: bool,
    /// Processor output, present iff `success`
    pub result: Option<R>,
    /// Last error message, present iff not `success`
    pub error: Option<String>,
    /// Time from first attempt to final outcome, retry delays included
    pub execution_time: Duration,
}

impl<T, R> TaskResult<T, R> {
    /// A successful result carrying the processor's output.
    pub fn succeeded(bot_id: usize, task: T, result: R, execution_time: Duration) -> Self {
        Self {
            bot_id,
            task,
            success: true,
            result: Some(result),
            error: None,
            execution_time,
        }
    }

    /// A permanent failure carrying the last attempt's error message.
    pub fn failed(bot_id: usize, task: T, error: String, execution_time: Duration) -> Self {
        Self {
            bot_id,
            task,
            success: false,
            result: None,
            error: Some(error),
            execution_time,
        }
    }
}
