//! Ordering suppliers.  Both produce permutations of `0..n` one at a time and are consumed by
//! `Accumulator::consume`, which does not need to know which kind it was handed.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Seed shared by every sampled dataset, so results depend only on the dataset and budget.
pub const SEED: u64 = 1;

/// A finite stream of orderings of `0..n`.
///
/// The returned slice is only valid until the next call, which lets suppliers permute a single
/// buffer in place instead of allocating per ordering.
pub trait Orderings {

    /// Produces the next ordering, or None once the supplier is exhausted.
    fn next_ordering(&mut self) -> Option<&[usize]>;
}

/// All `n!` permutations of `0..n` in lexicographic order, starting from the identity.
pub struct Permutations {
    order: Vec<usize>,
    started: bool,
    done: bool
}

impl Permutations {
    /// Creates the enumeration for `n` items.
    pub fn new(n: usize) -> Self {
        Permutations { order: (0..n).collect(), started: false, done: false }
    }
}

impl Orderings for Permutations {
    fn next_ordering(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if !next_permutation(&mut self.order) {
            self.done = true;
            return None;
        }
        Some(&self.order)
    }
}

/// Rearranges `v` into the next lexicographically greater permutation.  Returns false, leaving
/// `v` sorted ascending, when `v` was already the last one.
pub fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    // Longest non-increasing suffix starts at `i`
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        v.reverse();
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// `iter` uniformly random shuffles of `0..n` from a seeded generator.
///
/// Each shuffle permutes the previous ordering in place.  `restart` rewinds the generator, so
/// the same sequence is produced again.
pub struct Shuffles {
    order: Vec<usize>,
    rng: ChaCha20Rng,
    seed: u64,
    iter: u64,
    remaining: u64
}

impl Shuffles {
    /// Creates `iter` shuffles of `n` items seeded with `SEED`.
    pub fn new(n: usize, iter: u64) -> Self {
        Shuffles::with_seed(n, iter, SEED)
    }

    /// Creates `iter` shuffles of `n` items from an explicit seed.
    pub fn with_seed(n: usize, iter: u64, seed: u64) -> Self {
        Shuffles {
            order: (0..n).collect(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed: seed,
            iter: iter,
            remaining: iter
        }
    }

    /// Rewinds to the first shuffle.
    pub fn restart(&mut self) {
        let n = self.order.len();
        *self = Shuffles::with_seed(n, self.iter, self.seed);
    }
}

impl Orderings for Shuffles {
    fn next_ordering(&mut self) -> Option<&[usize]> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.order.shuffle(&mut self.rng);
        Some(&self.order)
    }
}
