/// Exact enumeration is chosen while `n!` stays within this multiple of the sample budget.
pub const EXACT_PREFERENCE: u64 = 10;

/// How a dataset's orderings are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every permutation exactly once
    Exact,

    /// The given number of seeded random shuffles
    Sampled(u64)
}

impl Mode {

    /// Picks exact enumeration when `n!` does not exceed `EXACT_PREFERENCE * iter`, sampling
    /// otherwise.  The factorial is built up incrementally and abandoned as soon as it crosses
    /// the bound, so it is never materialized for large `n`.
    ///
    /// Datasets with zero or one document have a single ordering and are always exact.
    /// ```rust
    ///   use ratio::mode::Mode;
    ///
    ///   assert_eq!(Mode::select(4, 3), Mode::Exact);      // 24 <= 30
    ///   assert_eq!(Mode::select(4, 2), Mode::Sampled(2)); // 24 >  20
    ///   assert_eq!(Mode::select(1, 0), Mode::Exact);
    /// ```
    pub fn select(n: usize, iter: u64) -> Mode {
        let bound = u128::from(iter) * u128::from(EXACT_PREFERENCE);
        let mut perm = 1u128;
        for i in 2..=n {
            perm = match perm.checked_mul(i as u128) {
                Some(p) if p <= bound => p,
                _ => return Mode::Sampled(iter)
            };
        }
        Mode::Exact
    }

    /// True for exhaustive enumeration
    pub fn is_exact(&self) -> bool {
        *self == Mode::Exact
    }

    /// Number of orderings this mode replays for `n` documents, if it fits in a u64.
    pub fn orderings(&self, n: usize) -> Option<u64> {
        match *self {
            Mode::Sampled(iter) => Some(iter),
            Mode::Exact => (2..=n as u64).try_fold(1u64, |acc, i| acc.checked_mul(i))
        }
    }
}

#[cfg(test)]
mod mode_test {
    use super::*;

    #[test]
    fn test_small_datasets_are_exact() {
        for iter in 0..3 {
            assert_eq!(Mode::select(0, iter), Mode::Exact);
            assert_eq!(Mode::select(1, iter), Mode::Exact);
        }
    }

    #[test]
    fn test_zero_budget_samples() {
        assert_eq!(Mode::select(2, 0), Mode::Sampled(0));
        assert_eq!(Mode::select(20, 0), Mode::Sampled(0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 5! = 120
        assert_eq!(Mode::select(5, 12), Mode::Exact);
        assert_eq!(Mode::select(5, 11), Mode::Sampled(11));
    }

    #[test]
    fn test_huge_inputs_do_not_overflow() {
        assert_eq!(Mode::select(1_000_000, u64::MAX), Mode::Sampled(u64::MAX));
        // 21! < 10 * u64::MAX < 22!
        assert_eq!(Mode::select(21, u64::MAX), Mode::Exact);
        assert_eq!(Mode::select(22, u64::MAX), Mode::Sampled(u64::MAX));
    }

    #[test]
    fn test_monotonic_in_budget() {
        for n in 0..9 {
            let mut was_exact = false;
            for iter in 0..5000u64 {
                let exact = Mode::select(n, iter).is_exact();
                assert!(exact || !was_exact, "n={} iter={}", n, iter);
                was_exact = exact;
            }
        }
    }

    #[test]
    fn test_orderings() {
        assert_eq!(Mode::Exact.orderings(0), Some(1));
        assert_eq!(Mode::Exact.orderings(4), Some(24));
        assert_eq!(Mode::Exact.orderings(30), None);
        assert_eq!(Mode::Sampled(7).orderings(30), Some(7));
    }
}
