use ratio::error::{Error, Result};

/// One part of a run split across several processes.
///
/// Candidates are dealt out round-robin by their position in the sorted candidate list, so
/// every process sharing the same input location agrees on the split.  Which part computes a
/// dataset never changes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    part: usize,
    parts: usize
}

impl Shard {

    /// Validates a `part` of `parts`.  Parts may be numbered `0..parts` or `1..=parts`; `part ==
    /// parts` is read as part 0.
    /// ```rust
    ///   use ratio_queue::partition::Shard;
    ///
    ///   assert_eq!(Shard::new(4, 4).unwrap(), Shard::new(0, 4).unwrap());
    ///   assert!(Shard::new(5, 4).is_err());
    ///   assert!(Shard::new(0, 0).is_err());
    /// ```
    pub fn new(part: usize, parts: usize) -> Result<Self> {
        let part = if part == parts { 0 } else { part };
        if part >= parts {
            return Err(Error::Argument(format!("part {} of {}", part, parts)));
        }
        Ok(Shard { part, parts })
    }

    /// The whole run in a single part
    pub fn whole() -> Self {
        Shard { part: 0, parts: 1 }
    }

    /// Zero-based part number
    pub fn part(&self) -> usize {
        self.part
    }

    /// Number of parts
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Whether the candidate at sorted position `idx` belongs to this part.
    pub fn owns(&self, idx: usize) -> bool {
        idx % self.parts == self.part
    }

    /// Keeps this part's share of a sorted candidate list.
    pub fn select<A>(&self, sorted: Vec<A>) -> Vec<A> {
        sorted.into_iter()
            .enumerate()
            .filter(|(idx, _)| self.owns(*idx))
            .map(|(_, a)| a)
            .collect()
    }
}

impl Default for Shard {
    fn default() -> Self {
        Shard::whole()
    }
}

#[cfg(test)]
mod partition_test {
    use super::*;

    #[test]
    fn test_whole_keeps_everything() {
        let v: Vec<usize> = (0..7).collect();
        assert_eq!(Shard::whole().select(v.clone()), v);
    }

    #[test]
    fn test_parts_cover_exactly_once() {
        let v: Vec<usize> = (0..11).collect();
        let mut all = Vec::new();
        for part in 1..=3 {
            let shard = Shard::new(part, 3).unwrap();
            all.extend(shard.select(v.clone()));
        }
        all.sort();
        assert_eq!(all, v);
        assert_eq!(Shard::new(1, 3).unwrap().select(v), vec![1, 4, 7, 10]);
    }

    #[test]
    fn test_invalid_parts() {
        match Shard::new(3, 2) {
            Err(Error::Argument(_)) => (),
            other => panic!("unexpected {:?}", other)
        }
    }
}
