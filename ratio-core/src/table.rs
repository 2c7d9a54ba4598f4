use std::io::{self, BufRead, Write};

/// Joint counts of "distinct types seen" (`x`) against "of those, in partition A" (`y`).
///
/// Stored densely as `(mm + 1) * (m0 + 1)` cells, row `x` at offset `x * (m0 + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    m0: usize,
    m1: usize,
    cells: Vec<u64>
}

impl FrequencyTable {

    /// Zeroed table for the given partition sizes
    pub fn new(m0: usize, m1: usize) -> Self {
        FrequencyTable { m0, m1, cells: vec![0; (m0 + m1 + 1) * (m0 + 1)] }
    }

    /// Size of partition A
    pub fn m0(&self) -> usize {
        self.m0
    }

    /// Size of partition B
    pub fn m1(&self) -> usize {
        self.m1
    }

    /// Number of rows, `mm + 1`
    pub fn rows(&self) -> usize {
        self.m0 + self.m1 + 1
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.rows() && y <= self.m0);
        x * (self.m0 + 1) + y
    }

    /// Count at `(x, y)`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u64 {
        self.cells[self.offset(x, y)]
    }

    #[inline]
    pub(crate) fn increment(&mut self, x: usize, y: usize) {
        let o = self.offset(x, y);
        self.cells[o] += 1;
    }

    /// Cells of row `x`, indexed by `y`
    pub fn row(&self, x: usize) -> &[u64] {
        let start = self.offset(x, 0);
        &self.cells[start..start + self.m0 + 1]
    }

    /// Sum of all cells
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Iterates over the non-zero cells as `(x, y, count)`.
    pub fn nonzero(&self) -> impl Iterator<Item=(usize, usize, u64)> + '_ {
        let width = self.m0 + 1;
        self.cells.iter().enumerate()
            .filter(|(_, &c)| c != 0)
            .map(move |(i, &c)| (i / width, i % width, c))
    }

    /// Smallest `[first, last)` covering every non-zero cell of row `x`; `(0, 0)` for an empty
    /// row.
    pub fn row_range(&self, x: usize) -> (usize, usize) {
        let row = self.row(x);
        match row.iter().position(|&c| c != 0) {
            None => (0, 0),
            Some(first) => {
                let last = row.iter().rposition(|&c| c != 0).map(|l| l + 1).unwrap_or(first);
                (first, last)
            }
        }
    }

    /// Writes one line per row: `first last v_first .. v_{last-1}`.
    /// ```rust
    ///   use ratio::table::FrequencyTable;
    ///
    ///   let table = FrequencyTable::new(1, 1);
    ///   let mut out = Vec::new();
    ///   table.write_sparse(&mut out).unwrap();
    ///   assert_eq!(out, b"0 0\n0 0\n0 0\n");
    /// ```
    pub fn write_sparse<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for x in 0..self.rows() {
            let (first, last) = self.row_range(x);
            write!(out, "{} {}", first, last)?;
            for v in &self.row(x)[first..last] {
                write!(out, " {}", v)?;
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Reads a table written by `write_sparse` back for known partition sizes.
    pub fn read_sparse<R: BufRead>(input: R, m0: usize, m1: usize) -> io::Result<Self> {
        let mut table = FrequencyTable::new(m0, m1);
        let mut x = 0;
        for line in input.lines() {
            let line = line?;
            if x >= table.rows() {
                return Err(invalid(format!("more than {} rows", table.rows())));
            }
            let values = line.split_ascii_whitespace()
                .map(|t| t.parse::<u64>().map_err(|_| invalid(format!("row {}: bad value {:?}", x, t))))
                .collect::<io::Result<Vec<u64>>>()?;
            if values.len() < 2 {
                return Err(invalid(format!("row {}: missing range", x)));
            }
            let (first, last) = (values[0] as usize, values[1] as usize);
            if first > last || last > m0 + 1 || values.len() != 2 + last - first {
                return Err(invalid(format!("row {}: inconsistent range {}..{}", x, first, last)));
            }
            let start = table.offset(x, 0);
            table.cells[start + first..start + last].copy_from_slice(&values[2..]);
            x += 1;
        }
        if x != table.rows() {
            return Err(invalid(format!("expected {} rows, found {}", table.rows(), x)));
        }
        Ok(table)
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
