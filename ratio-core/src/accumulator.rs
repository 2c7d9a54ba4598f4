use crate::dataset::Dataset;
use crate::mode::Mode;
use crate::ordering::{Orderings, Permutations, Shuffles};
use crate::table::FrequencyTable;

/// Replays orderings of a dataset's documents into a `FrequencyTable`.
pub struct Accumulator<'a> {
    dataset: &'a Dataset,
    seen: Vec<bool>,
    table: FrequencyTable,
    replayed: u64
}

impl <'a> Accumulator<'a> {

    /// Starts with a zeroed table sized for `dataset`.
    pub fn new(dataset: &'a Dataset) -> Self {
        Accumulator {
            dataset: dataset,
            seen: vec![false; dataset.mm()],
            table: FrequencyTable::new(dataset.m0(), dataset.m1()),
            replayed: 0
        }
    }

    /// Scans the documents in `order`, adding one count per prefix at
    /// `(distinct types so far, of which in partition A)`.
    #[inline]
    pub fn replay(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.dataset.n());
        for s in self.seen.iter_mut() {
            *s = false;
        }
        let m0 = self.dataset.m0();
        let docs = self.dataset.documents();
        let mut x = 0;
        let mut y = 0;
        for &d in order {
            for &t in docs[d].iter() {
                if !self.seen[t] {
                    self.seen[t] = true;
                    x += 1;
                    if t < m0 {
                        y += 1;
                    }
                }
            }
            self.table.increment(x, y);
        }
        self.replayed += 1;
    }

    /// Replays every ordering the supplier produces.
    pub fn consume<O: Orderings>(&mut self, mut orderings: O) {
        while let Some(order) = orderings.next_ordering() {
            self.replay(order);
        }
    }

    /// Orderings replayed so far
    pub fn replayed(&self) -> u64 {
        self.replayed
    }

    /// Hands over the finished table.
    pub fn finish(self) -> FrequencyTable {
        self.table
    }
}

/// Computes a dataset's table in the given mode.
/// ```rust
///   use ratio::accumulator::compute;
///   use ratio::dataset::Dataset;
///   use ratio::mode::Mode;
///
///   let ds = Dataset::new(1, 1, vec![vec![0], vec![1]]);
///   let table = compute(&ds, Mode::Exact);
///   assert_eq!(table.get(1, 0), 1);
///   assert_eq!(table.get(1, 1), 1);
///   assert_eq!(table.get(2, 1), 2);
///   assert_eq!(table.total(), 4);
/// ```
pub fn compute(dataset: &Dataset, mode: Mode) -> FrequencyTable {
    let mut acc = Accumulator::new(dataset);
    match mode {
        Mode::Exact => acc.consume(Permutations::new(dataset.n())),
        Mode::Sampled(iter) => acc.consume(Shuffles::new(dataset.n(), iter))
    }
    debug!("Replayed {} orderings of {} documents", acc.replayed(), dataset.n());
    acc.finish()
}
