extern crate jobpool;
extern crate priority_queue;
extern crate rayon;

use std::cmp::Reverse;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;

use self::jobpool::JobPool;
use self::priority_queue::PriorityQueue;
use self::rayon::prelude::*;

use crate::error::{Error, Result};
use crate::task::Task;

/// Runs a batch of independent tasks, returning their outputs in submission order.
///
/// Every scheduler is fail-fast: after the first failure no further task is started, tasks
/// already running are allowed to finish, and the first error is returned.
pub trait Scheduler {
    /// Runs `tasks` to completion.
    fn compute<T: Task>(&mut self, tasks: Vec<T>) -> Result<Vec<T::Output>>;
}

fn describe_panic(name: &str, payload: Box<dyn std::any::Any + Send>) -> Error {
    let msg = payload.downcast_ref::<&str>().map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".into());
    Error::Worker(format!("{}: {}", name, msg))
}

/// Demand-driven dispatch onto a fixed pool of worker threads.  A task is handed out
/// whenever a worker frees up, so long and short tasks balance themselves.
pub struct GreedyScheduler(usize);

impl GreedyScheduler {
    /// Pool of `n_threads` workers, at least one.
    pub fn new(n_threads: usize) -> Self { GreedyScheduler(n_threads.max(1)) }
}

impl Scheduler for GreedyScheduler {

    fn compute<T: Task>(&mut self, tasks: Vec<T>) -> Result<Vec<T::Output>> {
        let total = tasks.len();
        debug!("Number of Tasks to Run: {}, Threads: {}", total, self.0);

        let mut queue = PriorityQueue::new();
        for (idx, t) in tasks.iter().enumerate() {
            queue.push(idx, (t.priority(), Reverse(idx)));
        }
        let mut pending: Vec<Option<T>> = tasks.into_iter().map(Some).collect();
        let mut outputs: Vec<Option<T::Output>> = (0..total).map(|_| None).collect();
        let mut failure = None;

        {
            let mut pool = JobPool::new(self.0);
            let mut free_threads = self.0;
            let (tx, rx) = mpsc::channel();
            loop {
                // Queue up all free items
                while failure.is_none() && free_threads > 0 && !queue.is_empty() {
                    if let Some((idx, _priority)) = queue.pop() {
                        if let Some(task) = pending[idx].take() {
                            trace!("Starting task {}: {}", idx, task.name());
                            let thread_tx = tx.clone();
                            pool.queue(move || {
                                let name = task.name().to_owned();
                                let out = catch_unwind(AssertUnwindSafe(move || task.run()))
                                    .unwrap_or_else(|p| Err(describe_panic(&name, p)));
                                // The receiver only goes away once every worker has reported
                                let _ = thread_tx.send((idx, out));
                            });
                            free_threads -= 1;
                        }
                    }
                }

                // Are we done yet?
                if free_threads == self.0 {
                    break
                }

                let (idx, out) = match rx.recv() {
                    Ok(msg) => msg,
                    Err(e) => {
                        failure = Some(Error::Worker(e.to_string()));
                        break
                    }
                };
                free_threads += 1;
                match out {
                    Ok(o) => {
                        trace!("Task {} finished", idx);
                        outputs[idx] = Some(o);
                    },
                    Err(e) => {
                        debug!("Task {} failed: {}", idx, e);
                        if failure.is_none() {
                            failure = Some(e);
                        }
                    }
                }
            }
            pool.shutdown();
        }

        if let Some(e) = failure {
            return Err(e);
        }
        debug!("Finished");
        outputs.into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Worker("task finished without output".into()))
    }
}

/// Runs every task on a dedicated rayon pool.  Idle threads steal queued tasks, one task per
/// split, which also balances uneven task costs.
pub struct StealingScheduler(usize);

impl StealingScheduler {
    /// `n_threads == 0` lets rayon pick the thread count.
    pub fn new(n_threads: usize) -> Self { StealingScheduler(n_threads) }
}

impl Scheduler for StealingScheduler {

    fn compute<T: Task>(&mut self, tasks: Vec<T>) -> Result<Vec<T::Output>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.0)
            .build()
            .map_err(|e| Error::Worker(e.to_string()))?;
        debug!("Number of Tasks to Run: {}, Threads: {}", tasks.len(), pool.current_num_threads());

        let mut tasks: Vec<(usize, T)> = tasks.into_iter().enumerate().collect();
        tasks.sort_by_key(|(idx, t)| (Reverse(t.priority()), *idx));
        let mut outputs = pool.install(|| {
            tasks.into_par_iter()
                .with_max_len(1)
                .map(|(idx, t)| {
                    let name = t.name().to_owned();
                    catch_unwind(AssertUnwindSafe(move || t.run()))
                        .unwrap_or_else(|p| Err(describe_panic(&name, p)))
                        .map(|o| (idx, o))
                })
                .collect::<Result<Vec<_>>>()
        })?;
        outputs.sort_by_key(|(idx, _)| *idx);
        debug!("Finished");
        Ok(outputs.into_iter().map(|(_, o)| o).collect())
    }
}
