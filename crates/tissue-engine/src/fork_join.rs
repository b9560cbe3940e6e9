//! Structured fork/join over scoped threads.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::config::ConfigError;
use crate::error::EngineError;

/// Workers to use for `items` work items with at most `threads` threads.
///
/// Never more workers than items, and at least one.
pub fn worker_count_for(threads: usize, items: u64) -> usize {
    let items = usize::try_from(items).unwrap_or(usize::MAX);
    threads.min(items).max(1)
}

/// Run `work(worker)` for `worker in 0..workers` and collect the results in
/// worker order.
///
/// Workers `1..workers` run on freshly spawned scoped threads; worker 0 runs
/// on the calling thread. All spawned threads are joined before this
/// returns, on every path. A panicking worker is reported as
/// [`EngineError::WorkerPanicked`] after the others have finished.
pub fn fork_join<R, F>(workers: usize, work: F) -> Result<Vec<R>, EngineError>
where
    F: Fn(usize) -> R + Sync,
    R: Send,
{
    if workers == 0 {
        return Err(ConfigError::ZeroThreads.into());
    }
    let run = |worker: usize| panic::catch_unwind(AssertUnwindSafe(|| work(worker)));

    let mut spawn_error = None;
    let outcomes: Vec<thread::Result<R>> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers - 1);
        for worker in 1..workers {
            let run = &run;
            let spawned = thread::Builder::new()
                .name(format!("tissue-worker-{worker}"))
                .spawn_scoped(scope, move || run(worker));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(EngineError::ThreadSpawnFailed {
                        worker,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }
        let mut outcomes = Vec::with_capacity(workers);
        if spawn_error.is_none() {
            outcomes.push(run(0));
        }
        for handle in handles {
            outcomes.push(handle.join().unwrap_or_else(Err));
        }
        outcomes
    });

    if let Some(e) = spawn_error {
        tracing::warn!(error = %e, "fork/join aborted");
        return Err(e);
    }
    let mut results = Vec::with_capacity(workers);
    for (worker, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => results.push(value),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(worker, %message, "worker panicked");
                return Err(EngineError::WorkerPanicked { worker, message });
            }
        }
    }
    Ok(results)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tissue_space::StridedRange;

    #[test]
    fn results_come_back_in_worker_order() {
        let out = fork_join(5, |w| w * 10).unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn single_worker_runs_on_caller() {
        let caller = thread::current().id();
        let out = fork_join(1, |_| thread::current().id()).unwrap();
        assert_eq!(out, vec![caller]);
    }

    #[test]
    fn panics_are_reported_after_everyone_finished() {
        let finished = AtomicUsize::new(0);
        let err = fork_join(4, |w| {
            if w == 2 {
                panic!("boom in {w}");
            }
            finished.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::WorkerPanicked {
                worker: 2,
                message: "boom in 2".to_string()
            }
        );
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        assert_eq!(
            fork_join(0, |_| ()),
            Err(EngineError::Config(ConfigError::ZeroThreads))
        );
    }

    #[test]
    fn workers_are_capped_by_items() {
        assert_eq!(worker_count_for(8, 3), 3);
        assert_eq!(worker_count_for(8, 0), 1);
        assert_eq!(worker_count_for(2, 100), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn strided_shares_sum_to_the_whole(threads in 1usize..12, items in 0u64..200) {
            let workers = worker_count_for(threads, items);
            prop_assert!(workers >= 1 && workers <= threads);
            let sums = fork_join(workers, |w| StridedRange::new(w, workers, items).sum::<u64>())
                .unwrap();
            prop_assert_eq!(sums.iter().sum::<u64>(), (0..items).sum::<u64>());
        }
    }
}
