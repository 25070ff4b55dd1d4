//! Authentication solver coordinator (spec §4.G): fan out a brute-force
//! search for the dock's auth string across `numSolvers` worker threads,
//! cancel cooperatively on first success, write the winning string back.
//!
//! The original source pairs one mutex, one condition variable and a
//! `bool` by hand (`pthread_mutex_t`/`pthread_cond_t` in
//! `startSolverThread`/`undockShip`). Per the redesign note in
//! `spec.md` §9 ("manual thread coordination"), this keeps the same
//! mutex+condvar+flag shape — it is the simplest primitive that maps
//! directly onto "first successful producer latches the value" — but
//! built on `std::thread::scope`, which removes the need for explicit
//! `pthread_join` bookkeeping: the scope itself blocks until every
//! worker has returned.

use std::sync::{Arc, Condvar, Mutex};

use tracing::{info, warn};

use crate::domain::keyspace::AuthKeyspace;
use crate::infrastructure::messages::GuessOutcome;
use crate::infrastructure::ipc::SolverChannel;

use super::super::domain::DockId;

/// Outcome of a dock's authentication search, shared across worker
/// threads. `found` latches permanently once any worker sets it.
/// `workers_remaining` lets the coordinator detect "every worker
/// exhausted its range without success" instead of waiting forever.
#[derive(Debug)]
struct FoundState {
    found: bool,
    value: Option<String>,
    workers_remaining: usize,
}

/// Result of one fan-out attempt.
pub enum AuthResult {
    /// A worker found the correct string.
    Found(String),
    /// Every worker exhausted its range without success, or a worker
    /// reported a poisoned/abort condition. Retried next tick.
    NotFound,
}

/// Partition `[0, total)` into `num_workers` contiguous ranges by ceiling
/// division, matching `startSolverThread`'s `combPerThread` computation.
pub fn partition_range(total: u64, num_workers: usize, worker: usize) -> (u64, u64) {
    if num_workers == 0 {
        return (0, 0);
    }
    let per_worker = total.div_ceil(num_workers as u64);
    let start = (worker as u64) * per_worker;
    let end = ((worker as u64) + 1) * per_worker;
    (start.min(total), end.min(total))
}

/// Run the fan-out search for auth-string length `length` against
/// `dock_id`, using one `SolverChannel` per worker. Blocks until a worker
/// finds the string or every worker exhausts its range.
pub fn search(
    dock_id: DockId,
    length: usize,
    channels: Vec<Box<dyn SolverChannel>>,
) -> AuthResult {
    let keyspace = AuthKeyspace;
    let Some(total) = keyspace.count_for(length) else {
        warn!(dock = %dock_id, length, "auth length out of range, skipping search");
        return AuthResult::NotFound;
    };

    let num_workers = channels.len();
    let state = Arc::new((
        Mutex::new(FoundState {
            found: false,
            value: None,
            workers_remaining: num_workers,
        }),
        Condvar::new(),
    ));

    std::thread::scope(|scope| {
        for (worker_id, mut channel) in channels.into_iter().enumerate() {
            let state = Arc::clone(&state);
            let keyspace = keyspace;
            scope.spawn(move || {
                // Every exit path below must run this so the coordinator
                // can notice "all workers finished, none found it"
                // instead of waiting on the condvar forever.
                let finish = |found: bool, value: Option<String>| {
                    let (mutex, condvar) = &*state;
                    let mut guard = mutex.lock().unwrap();
                    if found {
                        guard.found = true;
                        // An abort reports `found` without a value (spec
                        // §4.G); never let it clobber a value another
                        // worker already published.
                        if value.is_some() {
                            guard.value = value;
                        }
                    }
                    guard.workers_remaining -= 1;
                    condvar.notify_all();
                };

                if channel.set_dock(dock_id).is_err() {
                    warn!(dock = %dock_id, worker = worker_id, "solver set-dock failed");
                    finish(false, None);
                    return;
                }

                let (start, end) = partition_range(total, num_workers, worker_id);
                for index in start..end {
                    {
                        let (mutex, _) = &*state;
                        let guard = mutex.lock().unwrap();
                        if guard.found {
                            break;
                        }
                    }

                    let candidate = keyspace.string_at(length, index);
                    match channel.guess(&candidate) {
                        Ok(GuessOutcome::Correct) => {
                            finish(true, Some(candidate));
                            return;
                        }
                        Ok(GuessOutcome::Abort) => {
                            finish(true, None);
                            return;
                        }
                        Ok(GuessOutcome::Wrong) => continue,
                        Err(err) => {
                            warn!(dock = %dock_id, worker = worker_id, %err, "solver queue fault, worker exiting");
                            break;
                        }
                    }
                }
                finish(false, None);
            });
        }

        // Wait for the first terminal outcome: a success/abort, or every
        // worker having exhausted its range. `thread::scope` joins every
        // spawned worker when this block ends, so there is no separate
        // join pass to remember.
        let (mutex, condvar) = &*state;
        let mut guard = mutex.lock().unwrap();
        while !guard.found && guard.workers_remaining > 0 {
            guard = condvar.wait(guard).unwrap();
        }
    });

    let (mutex, _) = &*state;
    let guard = mutex.lock().unwrap();
    match &guard.value {
        Some(value) => {
            info!(dock = %dock_id, %value, "auth string found");
            AuthResult::Found(value.clone())
        }
        None => AuthResult::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ipc::tests::ScriptedSolverChannel;

    #[test]
    fn partition_range_covers_whole_keyspace_without_overlap() {
        let total = 25;
        let workers = 4;
        let mut covered = vec![false; total as usize];
        for w in 0..workers {
            let (start, end) = partition_range(total, workers, w);
            for i in start..end {
                assert!(!covered[i as usize], "index {i} covered twice");
                covered[i as usize] = true;
            }
        }
        assert!(covered.iter().all(|&c| c), "every index must be covered");
    }

    #[test]
    fn search_finds_correct_string_with_multiple_workers() {
        let ks = AuthKeyspace;
        let total = ks.count_for(2).unwrap();
        let correct_index = 7;
        let correct = ks.string_at(2, correct_index);

        let num_workers = 4;
        let channels: Vec<Box<dyn SolverChannel>> = (0..num_workers)
            .map(|_| {
                Box::new(ScriptedSolverChannel {
                    correct_candidate: Some(correct.clone()),
                    guesses_seen: Vec::new(),
                }) as Box<dyn SolverChannel>
            })
            .collect();

        let result = search(DockId(0), 2, channels);
        match result {
            AuthResult::Found(value) => assert_eq!(value, correct),
            AuthResult::NotFound => panic!("expected a match"),
        }
        let _ = total;
    }

    #[test]
    fn search_reports_not_found_when_no_worker_matches() {
        let channels: Vec<Box<dyn SolverChannel>> = (0..2)
            .map(|_| {
                Box::new(ScriptedSolverChannel {
                    correct_candidate: None,
                    guesses_seen: Vec::new(),
                }) as Box<dyn SolverChannel>
            })
            .collect();

        let result = search(DockId(0), 1, channels);
        assert!(matches!(result, AuthResult::NotFound));
    }

    #[test]
    fn out_of_range_length_is_not_found_without_spawning_workers() {
        let result = search(DockId(0), 11, Vec::new());
        assert!(matches!(result, AuthResult::NotFound));
    }
}
