//! File-name rules for the input and output locations.
//!
//! Dataset identifiers are opaque strings without a `.`.  Results are stored as `<id>` when exact
//! and `<id>.<iterations>` when sampled.  Names starting with `.` are hidden and never
//! considered; any other dotted name that does not fit the rules is unexpected.

use std::cmp::Ordering;
use std::fmt;

use ratio::mode::Mode;

/// How good a stored result is.  Exact beats any sample; larger samples beat smaller ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(Mode);

impl Quality {
    /// Mode the result was produced in
    pub fn mode(&self) -> Mode {
        self.0
    }

    /// Whether this result already covers a run with budget `iter`.
    pub fn satisfies(&self, iter: u64) -> bool {
        match self.0 {
            Mode::Exact => true,
            Mode::Sampled(k) => k >= iter
        }
    }
}

impl From<Mode> for Quality {
    fn from(m: Mode) -> Self {
        Quality(m)
    }
}

impl Ord for Quality {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Mode::Exact, Mode::Exact) => Ordering::Equal,
            (Mode::Exact, Mode::Sampled(_)) => Ordering::Greater,
            (Mode::Sampled(_), Mode::Exact) => Ordering::Less,
            (Mode::Sampled(a), Mode::Sampled(b)) => a.cmp(&b)
        }
    }
}

impl PartialOrd for Quality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Mode::Exact => write!(f, "exact"),
            Mode::Sampled(k) => write!(f, "{} samples", k)
        }
    }
}

/// What a file name in the input location denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputName<'a> {
    /// A dataset identifier
    Dataset(&'a str),
    /// Starts with `.`; skipped silently
    Hidden,
    /// Anything else
    Unexpected
}

/// What a file name in the output location denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultName<'a> {
    /// A result for dataset `id`
    Result {
        /// Dataset identifier
        id: &'a str,
        /// Exact or sampled with a count
        quality: Quality
    },
    /// Starts with `.`; skipped silently
    Hidden,
    /// Anything else
    Unexpected
}

/// Classifies a name found in the input location.
pub fn input_name(name: &str) -> InputName {
    match name.find('.') {
        None if !name.is_empty() => InputName::Dataset(name),
        Some(0) => InputName::Hidden,
        _ => InputName::Unexpected
    }
}

/// Classifies a name found in the output location.
/// ```rust
///   use ratio::mode::Mode;
///   use ratio_queue::names::{result_name, ResultName};
///
///   assert_eq!(result_name("abc"), ResultName::Result { id: "abc", quality: Mode::Exact.into() });
///   assert_eq!(result_name("abc.500"),
///              ResultName::Result { id: "abc", quality: Mode::Sampled(500).into() });
///   assert_eq!(result_name("abc.tmp"), ResultName::Unexpected);
///   assert_eq!(result_name(".tmp-1234"), ResultName::Hidden);
/// ```
pub fn result_name(name: &str) -> ResultName {
    match name.find('.') {
        None if name.is_empty() => ResultName::Unexpected,
        None => ResultName::Result { id: name, quality: Mode::Exact.into() },
        Some(0) => ResultName::Hidden,
        Some(dot) => {
            let ext = &name[dot + 1..];
            let digits = !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_digit());
            match ext.parse::<u64>() {
                Ok(k) if digits => ResultName::Result {
                    id: &name[..dot],
                    quality: Mode::Sampled(k).into()
                },
                _ => ResultName::Unexpected
            }
        }
    }
}

/// Name under which a result for `id` computed in `mode` is stored.
pub fn output_name(id: &str, mode: Mode) -> String {
    match mode {
        Mode::Exact => id.to_owned(),
        Mode::Sampled(iter) => format!("{}.{}", id, iter)
    }
}
