//! Ratio-Queue
//! ---
//! Ratio-Queue finds the datasets that still need a type-ratio table and computes them in
//! parallel.
//!
//! What is it?
//! ---
//! Datasets live as one file each in an input directory; results go to an output directory
//! under the dataset's identifier (exact) or `<id>.<iterations>` (sampled).  A run
//!
//! 1. lists both directories and queues every dataset without an exact result or a sampled
//!    result of at least the requested size,
//! 2. runs each queued dataset's pipeline on a worker pool, handing out items as workers free
//!    up, since exact enumeration and sampling differ in cost by orders of magnitude,
//! 3. optionally prunes results superseded by a better one.
//!
//! Rerunning with a larger budget upgrades sampled results; rerunning with the same budget does
//! nothing.
//!
//! Example
//! ---
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ratio::dataset::Dataset;
//! use ratio::scheduler::GreedyScheduler;
//! use ratio_queue::{run_with, Config};
//! use ratio_queue::store::memory::MemoryStore;
//! use ratio_queue::work::StatusSink;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.add_dataset("small", Dataset::new(1, 1, vec![vec![0], vec![1]]));
//! store.add_dataset("large", Dataset::new(1, 1, vec![vec![0]; 12]));
//!
//! let config = Config::new(1000);
//! let report = run_with(store.clone(), &config, &mut GreedyScheduler::new(2), StatusSink::quiet())
//!     .unwrap();
//! assert_eq!(report.queued, vec!["large", "small"]);
//! assert!(store.result("small").is_some());
//! assert!(store.result("large.1000").is_some());
//!
//! // Nothing left to do at the same budget
//! let again = run_with(store, &config, &mut GreedyScheduler::new(2), StatusSink::quiet())
//!     .unwrap();
//! assert!(again.queued.is_empty());
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

/// Run configuration
pub mod config;

/// Describes the interfaces for reading datasets and storing results
pub mod interfaces;

/// File-name rules
pub mod names;

/// Splitting a run across processes
pub mod partition;

/// Work queue discovery and result selection
pub mod queue;

/// Defines the two stores: DiskStore and MemoryStore
pub mod store;

/// Per-dataset pipeline and status output
pub mod work;

use std::sync::Arc;

use ratio::error::Result;
use ratio::scheduler::{GreedyScheduler, Scheduler, StealingScheduler};

pub use config::{Config, SchedulerKind};

use interfaces::{Sink, Source};
use queue::{plan, superseded};
use store::disk::DiskStore;
use work::{Outcome, StatusSink, WorkItem};

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Datasets that were queued, in processing order
    pub queued: Vec<String>,
    /// One entry per queued dataset
    pub outcomes: Vec<Outcome>,
    /// Names in either location that fit no naming rule
    pub unexpected: Vec<String>,
    /// Results deleted because a better one exists
    pub pruned: Vec<String>
}

/// Runs against the directories named by `config`, printing status lines to stdout.
pub fn run(config: &Config) -> Result<RunReport> {
    let store = Arc::new(DiskStore::with_dirs(config.input_dir(), config.output_dir()));
    store.create_output()?;
    let status = StatusSink::stdout();
    match config.scheduler {
        SchedulerKind::Greedy => run_with(store, config, &mut GreedyScheduler::new(config.threads), status),
        SchedulerKind::Stealing => run_with(store, config, &mut StealingScheduler::new(config.threads), status)
    }
}

/// Runs against any store with any scheduler.
pub fn run_with<S, Sch>(
    store: Arc<S>,
    config: &Config,
    scheduler: &mut Sch,
    status: StatusSink
) -> Result<RunReport>
where
    S: Source + Sink + 'static,
    Sch: Scheduler
{
    let p = plan(store.dataset_names()?, store.result_names()?, config.iter, config.shard);
    info!("{} datasets to compute with budget {}", p.todo.len(), config.iter);

    let items: Vec<_> = p.todo.iter()
        .map(|id| WorkItem::new(id.clone(), config.iter, store.clone(), status.clone()))
        .collect();
    let outcomes = scheduler.compute(items)?;

    let mut pruned = Vec::new();
    if config.prune {
        for name in superseded(&store.result_names()?) {
            debug!("Pruning {}", name);
            store.remove(&name)?;
            pruned.push(name);
        }
    }

    let exact = outcomes.iter().filter(|o| o.mode.is_exact()).count();
    info!("Finished: {} exact, {} sampled, {} pruned", exact, outcomes.len() - exact, pruned.len());
    Ok(RunReport { queued: p.todo, outcomes, unexpected: p.unexpected, pruned })
}

#[cfg(test)]
mod test_lib {
    extern crate tempfile;

    use super::*;
    use std::fs;

    use ratio::dataset::Dataset;
    use ratio::error::Error;
    use ratio::mode::Mode;
    use store::memory::MemoryStore;

    fn fixture() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        // 3! = 6 orderings
        store.add_dataset("b", Dataset::new(2, 1, vec![vec![0, 2], vec![1], vec![0, 1]]));
        // 7! = 5040 orderings
        store.add_dataset("a", Dataset::new(2, 2, (0..7).map(|i| vec![i % 4]).collect()));
        store.add_input_name(".hidden");
        store.add_input_name("c.bak");
        store
    }

    fn run_mem(store: &Arc<MemoryStore>, config: &Config) -> RunReport {
        run_with(store.clone(), config, &mut GreedyScheduler::new(3), StatusSink::quiet()).unwrap()
    }

    #[test]
    fn test_mode_per_dataset() {
        let store = fixture();
        let report = run_mem(&store, &Config::new(100));
        assert_eq!(report.queued, vec!["a", "b"]);
        assert_eq!(report.unexpected, vec!["c.bak"]);
        let modes: Vec<_> = report.outcomes.iter().map(|o| (o.output.clone(), o.mode)).collect();
        assert_eq!(modes, vec![("a.100".to_string(), Mode::Sampled(100)), ("b".to_string(), Mode::Exact)]);
        assert_eq!(report.outcomes[0].total, 100 * 7);
        assert_eq!(report.outcomes[1].total, 6 * 3);
    }

    #[test]
    fn test_resume_upgrades_sampled_results() {
        let store = fixture();
        run_mem(&store, &Config::new(100));
        assert!(run_mem(&store, &Config::new(50)).queued.is_empty());
        assert!(run_mem(&store, &Config::new(100)).queued.is_empty());

        let report = run_mem(&store, &Config::new(200));
        assert_eq!(report.queued, vec!["a"]);
        let mut names = store.result_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.100", "a.200", "b"]);

        // 504 * 10 >= 5040 switches "a" to exact
        let report = run_mem(&store, &Config::new(504));
        assert_eq!(report.outcomes[0].output, "a");
        assert!(run_mem(&store, &Config::new(u64::MAX)).queued.is_empty());
    }

    #[test]
    fn test_prune_keeps_best() {
        let store = fixture();
        run_mem(&store, &Config::new(100));
        let mut config = Config::new(300);
        config.prune = true;
        let report = run_mem(&store, &config);
        assert_eq!(report.pruned, vec!["a.100"]);
        let mut names = store.result_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.300", "b"]);
    }

    #[test]
    fn test_schedulers_and_thread_counts_agree() {
        let mut outputs = Vec::new();
        for threads in 1..4 {
            let greedy = fixture();
            let stealing = fixture();
            let config = Config::new(150);
            run_with(greedy.clone(), &config, &mut GreedyScheduler::new(threads), StatusSink::quiet()).unwrap();
            run_with(stealing.clone(), &config, &mut StealingScheduler::new(threads), StatusSink::quiet()).unwrap();
            for name in ["a.150", "b"].iter() {
                assert_eq!(greedy.result(name), stealing.result(name));
            }
            outputs.push(greedy.result("a.150"));
        }
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_sharded_runs_cover_everything() {
        let store = fixture();
        store.add_dataset("c", Dataset::new(0, 1, vec![vec![0]]));
        let mut config = Config::new(10);
        config.shard = partition::Shard::new(1, 2).unwrap();
        assert_eq!(run_mem(&store, &config).queued, vec!["b"]);
        config.shard = partition::Shard::new(2, 2).unwrap();
        assert_eq!(run_mem(&store, &config).queued, vec!["a", "c"]);
    }

    #[test]
    fn test_bad_input_aborts_run() {
        let store = fixture();
        store.add_input_name("broken");
        match run_with(store, &Config::new(10), &mut GreedyScheduler::new(1), StatusSink::quiet()) {
            Err(Error::Io { path, .. }) => assert_eq!(path, std::path::Path::new("broken")),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn test_run_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(1000);
        config.data_dir = dir.path().to_path_buf();
        config.threads = 2;
        fs::create_dir_all(config.input_dir()).unwrap();
        fs::write(config.input_dir().join("ab"), "2 1 1\n0 -1 -1\n-1 0 -1\n").unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.queued, vec!["ab"]);
        let first = fs::read(config.output_dir().join("ab")).unwrap();
        assert_eq!(first, b"0 0\n0 2 1 1\n1 2 2\n".to_vec());

        // Recomputing from scratch is byte-identical
        fs::remove_file(config.output_dir().join("ab")).unwrap();
        config.scheduler = SchedulerKind::Stealing;
        run(&config).unwrap();
        assert_eq!(fs::read(config.output_dir().join("ab")).unwrap(), first);

        fs::write(config.input_dir().join("bad"), "2 1 1\n1 -1 -1\n-1 0 -1\n").unwrap();
        match run(&config) {
            Err(Error::InputFormat { path, .. }) => assert_eq!(path, config.input_dir().join("bad")),
            other => panic!("unexpected {:?}", other)
        }
    }
}
