//! Partition laws
//!
//! The union of batches equals the input, batches are disjoint by position,
//! and batch sizes differ by at most one — for every input length and bot
//! count.

use botswarm::divide_tasks;
use proptest::prelude::*;

#[test]
fn test_exactly_num_bots_batches() {
    for num_bots in 1..=8 {
        let batches = divide_tasks((0..5).collect::<Vec<i32>>(), num_bots);
        assert_eq!(batches.len(), num_bots);
    }
}

#[test]
fn test_concatenation_restores_input() {
    let tasks: Vec<i32> = (0..37).collect();
    let batches = divide_tasks(tasks.clone(), 5);

    let rejoined: Vec<i32> = batches.into_iter().flatten().collect();
    assert_eq!(rejoined, tasks);
}

#[test]
fn test_remainder_goes_to_first_batches() {
    let batches = divide_tasks((0..11).collect::<Vec<i32>>(), 4);
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();

    // 11 = 4 * 2 + 3, so the first three batches take the extra task.
    assert_eq!(sizes, vec![3, 3, 3, 2]);
}

#[test]
fn test_empty_batches_are_valid() {
    let batches = divide_tasks(vec![1, 2], 6);
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();

    assert_eq!(sizes, vec![1, 1, 0, 0, 0, 0]);
}

proptest! {
    #[test]
    fn prop_partition_laws(
        tasks in proptest::collection::vec(any::<i32>(), 0..200),
        num_bots in 1usize..16,
    ) {
        let batches = divide_tasks(tasks.clone(), num_bots);

        // Exactly num_bots batches.
        prop_assert_eq!(batches.len(), num_bots);

        // Union equals the input, order preserved.
        let rejoined: Vec<i32> = batches.iter().flatten().copied().collect();
        prop_assert_eq!(rejoined, tasks);

        // Sizes differ by at most one.
        let min = batches.iter().map(Vec::len).min().unwrap_or(0);
        let max = batches.iter().map(Vec::len).max().unwrap_or(0);
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn prop_larger_batches_come_first(
        len in 0usize..100,
        num_bots in 1usize..12,
    ) {
        let batches = divide_tasks((0..len).collect::<Vec<usize>>(), num_bots);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();

        for window in sizes.windows(2) {
            prop_assert!(window[0] >= window[1]);
        }
    }
}
