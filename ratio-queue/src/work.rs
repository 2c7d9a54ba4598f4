use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use ratio::accumulator::compute;
use ratio::dataset::Dataset;
use ratio::error::Result;
use ratio::mode::Mode;
use ratio::task::Task;

use crate::interfaces::{Sink, Source};
use crate::names::output_name;

/// Console shared by all workers.  Each message is written as one line under a lock, so lines
/// from concurrent items never interleave.
#[derive(Clone)]
pub struct StatusSink {
    out: Arc<Mutex<dyn Write + Send>>
}

impl StatusSink {

    /// Writes to standard output.
    pub fn stdout() -> Self {
        StatusSink::new(io::stdout())
    }

    /// Discards every message.
    pub fn quiet() -> Self {
        StatusSink::new(io::sink())
    }

    /// Writes to `w`.
    pub fn new<W: Write + Send + 'static>(w: W) -> Self {
        StatusSink { out: Arc::new(Mutex::new(w)) }
    }

    /// Writes `<mark> <id>  <n> <m0>+<m1>`.
    pub fn message(&self, mark: char, id: &str, ds: &Dataset) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let res = writeln!(out, "{} {}  {} {}+{}", mark, id, ds.n(), ds.m0(), ds.m1())
            .and_then(|_| out.flush());
        if let Err(e) = res {
            warn!("Failed writing status for {}: {}", id, e);
        }
    }
}

/// What one finished item produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Dataset identifier
    pub id: String,
    /// Mode the table was computed in
    pub mode: Mode,
    /// Name the result was stored under
    pub output: String,
    /// Sum over the table, `n * orderings`
    pub total: u64
}

/// One dataset's full pipeline: load, pick a mode, replay orderings, store the table.
pub struct WorkItem<S> {
    id: String,
    iter: u64,
    store: Arc<S>,
    status: StatusSink
}

impl <S: Source + Sink + 'static> WorkItem<S> {
    /// Work on dataset `id` with sampling budget `iter`.
    pub fn new(id: String, iter: u64, store: Arc<S>, status: StatusSink) -> Self {
        WorkItem { id, iter, store, status }
    }
}

impl <S: Source + Sink + 'static> Task for WorkItem<S> {
    type Output = Outcome;

    fn name(&self) -> &str {
        &self.id
    }

    fn run(self) -> Result<Outcome> {
        let ds = self.store.load(&self.id)?;
        let mode = Mode::select(ds.n(), self.iter);
        debug!("{}: n={} m0={} m1={} -> {:?}", self.id, ds.n(), ds.m0(), ds.m1(), mode);

        self.status.message('+', &self.id, &ds);
        let table = compute(&ds, mode);
        self.status.message('-', &self.id, &ds);

        let output = output_name(&self.id, mode);
        self.store.store(&output, &table)?;
        Ok(Outcome { id: self.id, mode: mode, output: output, total: table.total() })
    }
}

#[cfg(test)]
mod work_test {
    use super::*;
    use crate::store::memory::MemoryStore;
    use ratio::error::Error;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, b: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(b)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_exact_item() {
        let store = Arc::new(MemoryStore::new());
        store.add_dataset("ab", Dataset::new(1, 1, vec![vec![0], vec![1]]));
        let buf = Buffer::default();
        let item = WorkItem::new("ab".into(), 5, store.clone(), StatusSink::new(buf.clone()));
        let out = item.run().unwrap();
        assert_eq!(out, Outcome { id: "ab".into(), mode: Mode::Exact, output: "ab".into(), total: 4 });
        assert_eq!(store.result("ab").unwrap(), b"0 0\n0 2 1 1\n1 2 2\n".to_vec());
        let status = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(status, "+ ab  2 1+1\n- ab  2 1+1\n");
    }

    #[test]
    fn test_sampled_item_is_tagged() {
        let store = Arc::new(MemoryStore::new());
        let docs = (0..6).map(|i| vec![i % 3, 3 + i % 2]).collect();
        store.add_dataset("six", Dataset::new(3, 2, docs));
        let out = WorkItem::new("six".into(), 20, store.clone(), StatusSink::quiet()).run().unwrap();
        assert_eq!(out.mode, Mode::Sampled(20));
        assert_eq!(out.output, "six.20");
        assert_eq!(out.total, 20 * 6);
        assert_eq!(store.table("six.20", 3, 2).unwrap().total(), 120);
    }

    #[test]
    fn test_missing_dataset_fails() {
        let store = Arc::new(MemoryStore::new());
        match WorkItem::new("gone".into(), 5, store.clone(), StatusSink::quiet()).run() {
            Err(Error::Io { .. }) => (),
            other => panic!("unexpected {:?}", other)
        }
        assert!(store.result_names().unwrap().is_empty());
    }
}
