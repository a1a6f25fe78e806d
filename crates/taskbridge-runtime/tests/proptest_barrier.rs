//! Property-based tests for the shutdown barrier
//!
//! The barrier count must follow begin/end exactly, never go below zero,
//! and always drain to zero once every begin has a matching end.

use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use taskbridge_runtime::ShutdownBarrier;

proptest! {
    /// Property: the count equals a saturating model of the operation sequence
    #[test]
    fn proptest_count_matches_saturating_model(ops in prop::collection::vec(any::<bool>(), 0..200)) {
        let barrier = ShutdownBarrier::new();
        let mut model = 0usize;

        for begin in ops {
            if begin {
                barrier.begin();
                model += 1;
            } else {
                barrier.end();
                model = model.saturating_sub(1);
            }
            prop_assert_eq!(barrier.active(), model);
        }
    }

    /// Property: balanced begin/end pairs from many threads drain to zero
    #[test]
    fn proptest_concurrent_pairs_drain(threads in 1usize..8, pairs in 1usize..50) {
        let barrier = Arc::new(ShutdownBarrier::new());

        let workers: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    for _ in 0..pairs {
                        let _guard = barrier.guard();
                    }
                })
            })
            .collect();

        for worker in workers {
            prop_assert!(worker.join().is_ok());
        }
        barrier.wait_until_idle();
        prop_assert_eq!(barrier.active(), 0);
    }

    /// Property: the count is the number of live guards
    #[test]
    fn proptest_guards_count_live_bridges(n in 0usize..64, dropped in 0usize..64) {
        let barrier = Arc::new(ShutdownBarrier::new());
        let mut guards: Vec<_> = (0..n).map(|_| barrier.guard()).collect();
        prop_assert_eq!(barrier.active(), n);

        let dropped = dropped.min(n);
        guards.truncate(n - dropped);
        prop_assert_eq!(barrier.active(), n - dropped);

        drop(guards);
        prop_assert_eq!(barrier.active(), 0);
    }
}
