//! ratio
//!
//! `ratio` computes type-ratio frequency tables for batches of documents.
//!
//! What is it?
//! ---
//!
//! Each document carries a set of type identifiers drawn from two disjoint partitions, A and B.
//! Scanning the documents in some order, every prefix has seen `x` distinct types, `y` of them
//! from partition A.  A `FrequencyTable` counts how often each `(x, y)` pair occurs over all
//! prefixes of all orderings considered:
//!
//! * Exact mode replays every one of the `n!` orderings.
//! * Sampled mode replays a fixed number of seeded random shuffles, giving a reproducible Monte
//!   Carlo estimate of the same table.
//!
//! `Mode::select` picks exact enumeration whenever `n!` is at most ten times the sample budget.
//!
//! How to Use It?
//! ---
//!
//! 1. `Dataset::read` - Loads a dataset from its text representation
//! 2. `Mode::select` - Decides between exact enumeration and sampling
//! 3. `compute` - Replays the orderings into a table
//! 4. `FrequencyTable::write_sparse` - Writes the table one row range per line
//!
//! Many datasets are processed at once by wrapping each in a `Task` and handing the batch to a
//! `Scheduler`.
//!
//! Example
//! ---
//! ```rust
//! use ratio::accumulator::compute;
//! use ratio::dataset::Dataset;
//! use ratio::mode::Mode;
//!
//! let ds = Dataset::parse("2 1 1  0 -1 -1  -1 0 -1".as_bytes(), "in/ab".as_ref()).unwrap();
//! let mode = Mode::select(ds.n(), 1000);
//! assert_eq!(mode, Mode::Exact);
//!
//! let mut out = Vec::new();
//! compute(&ds, mode).write_sparse(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "0 0\n0 2 1 1\n1 2 2\n");
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

/// Error type shared by every stage
pub mod error;

/// Dataset parser
pub mod dataset;

/// Exact-versus-sampled decision
pub mod mode;

/// Ordering suppliers: exhaustive permutations and seeded shuffles
pub mod ordering;

/// Frequency table and its sparse row format
pub mod table;

/// Replays orderings into a frequency table
pub mod accumulator;

/// Contains Scheduler trait definition and implementations
pub mod scheduler;

/// Unit-of-work trait run by the schedulers
pub mod task;

pub use error::{Error, Result};
