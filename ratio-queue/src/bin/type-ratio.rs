#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use env_logger::Env;

use ratio_queue::config::DEFAULT_DATA_DIR;
use ratio_queue::partition::Shard;
use ratio_queue::{run, Config, SchedulerKind};

/// Computes type-ratio tables for every dataset that lacks a good enough result.
#[derive(Debug, Parser)]
#[command(name = "type-ratio", version)]
struct Cli {
    /// Sampling budget: random orderings per dataset when exact enumeration is too large
    iter: u64,

    /// This process' part, `1..=PARTS` (or `0..PARTS`)
    #[arg(requires = "parts")]
    part: Option<usize>,

    /// Number of processes sharing the input directory
    parts: Option<usize>,

    /// Root of the `in` and `out` directories
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Worker threads [default: number of logical CPUs]
    #[arg(long)]
    threads: Option<usize>,

    /// Dispatcher
    #[arg(long, value_enum, default_value_t = SchedulerKind::Greedy)]
    scheduler: SchedulerKind,

    /// Delete results superseded by a better one after the run
    #[arg(long)]
    prune: bool
}

impl Cli {
    fn into_config(self) -> Result<Config, String> {
        let mut config = Config::new(self.iter);
        if let (Some(part), Some(parts)) = (self.part, self.parts) {
            config.shard = Shard::new(part, parts).map_err(|e| e.to_string())?;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.data_dir = self.data_dir;
        config.scheduler = self.scheduler;
        config.prune = self.prune;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(msg) => Cli::command().error(ErrorKind::ValueValidation, msg).exit()
    };
    debug!("{:?}", config);

    match run(&config) {
        Ok(report) => {
            for name in report.unexpected.iter() {
                debug!("Ignored {}", name);
            }
            info!("Computed {} datasets", report.outcomes.len());
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            eprintln!("type-ratio: {}", e);
            ExitCode::FAILURE
        }
    }
}
