use std::path::PathBuf;

use crate::partition::Shard;

/// Default root holding the `in` and `out` directories
pub const DEFAULT_DATA_DIR: &str = "type-ratio-data";

/// Which dispatcher drains the work queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchedulerKind {
    /// Fixed worker pool fed one item at a time as workers free up
    Greedy,
    /// rayon work stealing
    Stealing
}

/// Everything a run needs to know
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the input and output directories
    pub data_dir: PathBuf,
    /// Sampling budget
    pub iter: u64,
    /// Share of the candidates this process handles
    pub shard: Shard,
    /// Worker threads
    pub threads: usize,
    /// Dispatcher
    pub scheduler: SchedulerKind,
    /// Delete results made redundant by a better one after the run
    pub prune: bool
}

impl Config {
    /// Defaults for budget `iter`: the default data root, the whole candidate list, one thread
    /// per logical CPU, the greedy dispatcher and no pruning.
    pub fn new(iter: u64) -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            iter: iter,
            shard: Shard::whole(),
            threads: num_cpus::get(),
            scheduler: SchedulerKind::Greedy,
            prune: false
        }
    }

    /// Directory datasets are read from
    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join("in")
    }

    /// Directory results are written to
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("out")
    }
}
