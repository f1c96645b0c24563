//! Static task partitioning
//!
//! One policy only: a fixed bot count with a contiguous near-even split.
//! Batch sizes differ by at most one, with the first `len % num_bots`
//! batches taking the extra task.

use tracing::debug;

/// Divide `tasks` into exactly `num_bots` contiguous batches.
///
/// Batches may be empty when there are fewer tasks than bots. The
/// concatenation of the returned batches equals the input sequence; no task
/// is duplicated, dropped, or reordered.
pub fn divide_tasks<T>(tasks: Vec<T>, num_bots: usize) -> Vec<Vec<T>> {
    if num_bots == 0 {
        return Vec::new();
    }

    let total = tasks.len();
    let base = total / num_bots;
    let remainder = total % num_bots;

    let mut batches = Vec::with_capacity(num_bots);
    let mut remaining = tasks.into_iter();

    for index in 0..num_bots {
        let size = base + usize::from(index < remainder);
        batches.push(remaining.by_ref().take(size).collect());
    }

    debug!(
        total,
        num_bots,
        largest = base + usize::from(remainder > 0),
        "divided tasks into batches"
    );

    batches
}
