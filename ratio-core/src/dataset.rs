use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::{FromStr, SplitAsciiWhitespace};

use crate::error::{Error, Result};

/// Marks the end of one identifier group in the input.
const SENTINEL: i64 = -1;

/// A batch of documents over `m0 + m1` type identifiers.
///
/// Identifiers `[0, m0)` belong to partition A, `[m0, m0 + m1)` to partition B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    m0: usize,
    m1: usize,
    documents: Vec<Vec<usize>>
}

impl Dataset {

    /// Builds a dataset from already offset identifiers.
    ///
    /// # Panics
    /// If a document references an identifier outside `[0, m0 + m1)`.
    pub fn new(m0: usize, m1: usize, documents: Vec<Vec<usize>>) -> Self {
        let mm = m0 + m1;
        for doc in documents.iter() {
            for &t in doc.iter() {
                assert!(t < mm, "type identifier {} out of range 0..{}", t, mm);
            }
        }
        Dataset { m0, m1, documents }
    }

    /// Loads a dataset from a file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        Dataset::parse(f, path)
    }

    /// Parses the textual representation, `n m0 m1` followed by one `A-ids -1 B-ids -1`
    /// record per document.  Tokens are whitespace separated; line breaks carry no meaning.
    /// `source` is only used to label errors.
    pub fn parse<R: Read>(mut reader: R, source: &Path) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| Error::io(source, e))?;

        let mut tokens = Tokens { inner: text.split_ascii_whitespace(), path: source };
        let n: usize = tokens.next("document count")?;
        let m0: usize = tokens.next("partition A size")?;
        let m1: usize = tokens.next("partition B size")?;
        if table_cells(m0, m1).is_none() {
            return Err(Error::input(source, format!(
                "partition sizes {}+{} are too large for a frequency table", m0, m1)));
        }

        let mut documents = Vec::new();
        for doc in 0..n {
            let mut ids = Vec::new();
            tokens.read_group(&mut ids, doc, m0, 0)?;
            tokens.read_group(&mut ids, doc, m1, m0)?;
            documents.push(ids);
        }
        trace!("Parsed {}: n={}, m0={}, m1={}", source.display(), n, m0, m1);
        Ok(Dataset { m0, m1, documents })
    }

    /// Number of documents
    pub fn n(&self) -> usize {
        self.documents.len()
    }

    /// Size of partition A
    pub fn m0(&self) -> usize {
        self.m0
    }

    /// Size of partition B
    pub fn m1(&self) -> usize {
        self.m1
    }

    /// Total number of type identifiers
    pub fn mm(&self) -> usize {
        self.m0 + self.m1
    }

    /// Documents, each a list of identifiers in `[0, mm)`
    pub fn documents(&self) -> &[Vec<usize>] {
        &self.documents
    }
}

// Cells of the `(m0 + m1 + 1) x (m0 + 1)` table, if it is addressable at all
fn table_cells(m0: usize, m1: usize) -> Option<usize> {
    let rows = m0.checked_add(m1)?.checked_add(1)?;
    let cells = rows.checked_mul(m0.checked_add(1)?)?;
    cells.checked_mul(std::mem::size_of::<u64>())
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .map(|_| cells)
}

struct Tokens<'a> {
    inner: SplitAsciiWhitespace<'a>,
    path: &'a Path
}

impl <'a> Tokens<'a> {
    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let tok = self.inner.next().ok_or_else(|| {
            let msg = format!("unexpected end of input, expected {}", what);
            Error::io(self.path, io::Error::new(io::ErrorKind::UnexpectedEof, msg))
        })?;
        tok.parse().map_err(|_| {
            let msg = format!("malformed token {:?}, expected {}", tok, what);
            Error::io(self.path, io::Error::new(io::ErrorKind::InvalidData, msg))
        })
    }

    // Reads identifiers up to the sentinel, checks them against `range` and stores them
    // shifted by `base`.
    fn read_group(&mut self, ids: &mut Vec<usize>, doc: usize, range: usize, base: usize) -> Result<()> {
        loop {
            let a: i64 = self.next("type identifier")?;
            if a == SENTINEL {
                return Ok(());
            }
            if a < 0 || a as u64 >= range as u64 {
                return Err(Error::input(self.path, format!(
                    "document {}: identifier {} outside 0..{}", doc, a, range)));
            }
            ids.push(a as usize + base);
        }
    }
}

#[cfg(test)]
mod dataset_test {
    use super::*;

    fn parse(s: &str) -> Result<Dataset> {
        Dataset::parse(s.as_bytes(), Path::new("mem"))
    }

    #[test]
    fn test_oversized_partitions_are_rejected() {
        for text in ["0 18446744073709551615 1", "0 1 18446744073709551615", "0 4294967296 4294967296"].iter() {
            match parse(text) {
                Err(Error::InputFormat { path, .. }) => assert_eq!(path, Path::new("mem")),
                other => panic!("unexpected {:?} for {:?}", other, text)
            }
        }
        assert!(parse("0 1000 1000").is_ok());
    }

    #[test]
    fn test_parse_offsets_partition_b() {
        let ds = parse("2 1 2\n0 -1 1 -1\n-1 0 1 -1\n").unwrap();
        assert_eq!(ds.n(), 2);
        assert_eq!(ds.mm(), 3);
        assert_eq!(ds.documents().to_vec(), vec![vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn test_parse_ignores_line_layout() {
        let one = parse("1 2 2 0 1 -1 0 -1").unwrap();
        let two = parse("1\n2\n2\n0\n1 -1\n\n0\n-1\n").unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn test_parse_empty_dataset() {
        let ds = parse("0 0 0").unwrap();
        assert_eq!(ds.n(), 0);
        assert_eq!(ds.mm(), 0);
    }

    #[test]
    fn test_out_of_range_is_input_error() {
        match parse("1 1 1 1 -1 -1") {
            Err(Error::InputFormat { path, .. }) => assert_eq!(path, Path::new("mem")),
            other => panic!("unexpected {:?}", other),
        }
        match parse("1 1 1 -1 -2 -1") {
            Err(Error::InputFormat { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_truncated_input_is_io_error() {
        match parse("2 1 1 0 -1 -1 0") {
            Err(Error::Io { path, source }) => {
                assert_eq!(path, Path::new("mem"));
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_token_is_io_error() {
        match parse("1 1 x") {
            Err(Error::Io { source, .. }) => assert_eq!(source.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_carries_path() {
        let err = Dataset::read("/nonexistent/type-ratio/abc").unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/type-ratio/abc"));
    }
}
