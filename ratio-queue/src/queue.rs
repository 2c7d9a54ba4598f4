use std::collections::{BTreeMap, BTreeSet};

use crate::names::{input_name, result_name, InputName, Quality, ResultName};
use crate::partition::Shard;

/// The datasets a run still has to compute, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    /// Dataset identifiers to compute, sorted
    pub todo: Vec<String>,
    /// Names in either location that fit no naming rule
    pub unexpected: Vec<String>
}

/// Works out which datasets need computing for budget `iter`.
///
/// A dataset is done if the output location holds an exact result for it, or a sampled result
/// with at least `iter` iterations.  Everything else in this shard's share of the input
/// location is queued, sorted by identifier.
/// ```rust
///   use ratio_queue::partition::Shard;
///   use ratio_queue::queue::plan;
///
///   let inputs = vec!["c".to_string(), "a".into(), "b".into(), "d".into()];
///   let results = vec!["a".to_string(), "b.100".into(), "c.10".into()];
///   let p = plan(inputs, results, 50, Shard::whole());
///   assert_eq!(p.todo, vec!["c", "d"]);
/// ```
pub fn plan(inputs: Vec<String>, results: Vec<String>, iter: u64, shard: Shard) -> Plan {
    let mut unexpected = Vec::new();
    let mut candidates = BTreeSet::new();
    for name in inputs {
        match input_name(&name) {
            InputName::Dataset(_) => { candidates.insert(name); },
            InputName::Hidden => (),
            InputName::Unexpected => {
                warn!("unexpected file name in input location: {}", name);
                unexpected.push(name);
            }
        }
    }
    let total = candidates.len();
    let mut work_set: BTreeSet<String> = shard.select(candidates.into_iter().collect())
        .into_iter()
        .collect();
    debug!("Candidates: {}, in part {}/{}: {}", total, shard.part(), shard.parts(), work_set.len());

    for name in results {
        match result_name(&name) {
            ResultName::Result { id, quality } => {
                if quality.satisfies(iter) && work_set.remove(id) {
                    trace!("{} already has a result ({})", id, quality);
                }
            },
            ResultName::Hidden => (),
            ResultName::Unexpected => {
                warn!("unexpected file name in output location: {}", name);
                unexpected.push(name);
            }
        }
    }

    Plan { todo: work_set.into_iter().collect(), unexpected }
}

/// For each dataset, the name of its best stored result.
pub fn best_results(results: &[String]) -> BTreeMap<String, (Quality, String)> {
    let mut best: BTreeMap<String, (Quality, String)> = BTreeMap::new();
    for name in results {
        if let ResultName::Result { id, quality } = result_name(name) {
            let better = best.get(id).map(|(q, _)| quality > *q).unwrap_or(true);
            if better {
                best.insert(id.to_owned(), (quality, name.clone()));
            }
        }
    }
    best
}

/// Stored results that a better result for the same dataset makes redundant, sorted.
/// ```rust
///   use ratio_queue::queue::superseded;
///
///   let results = vec!["a.10".to_string(), "a.1000".into(), "b".into(), "b.5".into(), "c.7".into()];
///   assert_eq!(superseded(&results), vec!["a.10", "b.5"]);
/// ```
pub fn superseded(results: &[String]) -> Vec<String> {
    let best = best_results(results);
    let mut out: Vec<String> = results.iter()
        .filter(|name| match result_name(name) {
            ResultName::Result { id, .. } => best.get(id).map(|(_, b)| b != *name).unwrap_or(false),
            _ => false
        })
        .cloned()
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod queue_test {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_sorts_and_filters() {
        let p = plan(strings(&["f", "b", ".hidden", "x.txt", "a"]), Vec::new(), 10, Shard::whole());
        assert_eq!(p.todo, strings(&["a", "b", "f"]));
        assert_eq!(p.unexpected, strings(&["x.txt"]));
    }

    #[test]
    fn test_exact_result_completes_dataset() {
        let p = plan(strings(&["a", "b"]), strings(&["a"]), u64::MAX, Shard::whole());
        assert_eq!(p.todo, strings(&["b"]));
    }

    #[test]
    fn test_sampled_result_resumption() {
        let inputs = strings(&["a"]);
        let results = strings(&["a.1000"]);
        assert!(plan(inputs.clone(), results.clone(), 999, Shard::whole()).todo.is_empty());
        assert!(plan(inputs.clone(), results.clone(), 1000, Shard::whole()).todo.is_empty());
        assert_eq!(plan(inputs, results, 1001, Shard::whole()).todo, strings(&["a"]));
    }

    #[test]
    fn test_any_sufficient_result_counts() {
        let p = plan(strings(&["a"]), strings(&["a.10", "a.5000", "a.20"]), 4000, Shard::whole());
        assert!(p.todo.is_empty());
    }

    #[test]
    fn test_results_without_inputs_are_ignored() {
        let p = plan(strings(&["a"]), strings(&["zz", "zz.5", ".tmp-1", "zz.x"]), 10, Shard::whole());
        assert_eq!(p.todo, strings(&["a"]));
        assert_eq!(p.unexpected, strings(&["zz.x"]));
    }

    #[test]
    fn test_shard_split_is_stable() {
        let inputs = strings(&["e", "d", "c", "b", "a"]);
        // "b" is done but still counts for the split
        let results = strings(&["b"]);
        let zero = plan(inputs.clone(), results.clone(), 10, Shard::new(0, 2).unwrap());
        let one = plan(inputs, results, 10, Shard::new(1, 2).unwrap());
        assert_eq!(zero.todo, strings(&["a", "c", "e"]));
        assert_eq!(one.todo, strings(&["d"]));
    }

    #[test]
    fn test_best_results() {
        let best = best_results(&strings(&["a.10", "a", "a.99", "b.3", "b.30", "junk.x"]));
        assert_eq!(best.len(), 2);
        assert_eq!(best["a"].1, "a");
        assert_eq!(best["b"].1, "b.30");
    }

    #[test]
    fn test_superseded_keeps_single_results() {
        assert!(superseded(&strings(&["a", "b.3", ".tmp-x"])).is_empty());
    }
}
