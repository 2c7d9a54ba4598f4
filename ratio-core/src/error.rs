use std::io;
use std::path::{Path, PathBuf};

/// Errors produced while loading, computing or storing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.  Carries the path that was being accessed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error
    },

    /// The input decoded fine but is structurally invalid, e.g. an identifier outside its
    /// partition range.
    #[error("{}: invalid input: {reason}", path.display())]
    InputFormat {
        /// Dataset that failed validation
        path: PathBuf,
        /// What was wrong with it
        reason: String
    },

    /// Malformed or out-of-range run arguments.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A worker thread panicked or went away without reporting a result.
    #[error("worker failed: {0}")]
    Worker(String)
}

impl Error {
    /// Wraps an io::Error with the path it happened on.
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub(crate) fn input<P: AsRef<Path>, S: Into<String>>(path: P, reason: S) -> Self {
        Error::InputFormat { path: path.as_ref().to_path_buf(), reason: reason.into() }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = ::std::result::Result<T, Error>;
