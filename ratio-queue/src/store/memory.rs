//! MemoryStore
//! ---
//! MemoryStore keeps inputs and results in process.  It behaves like `DiskStore` as far as the
//! work queue and the pipeline can tell, which makes it useful for embedding and for tests.
//!

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ratio::dataset::Dataset;
use ratio::error::{Error, Result};
use ratio::table::FrequencyTable;

use crate::interfaces::{ResultWriter, Sink, Source};

#[derive(Default)]
struct Inner {
    // None marks a name with no loadable dataset behind it
    inputs: BTreeMap<String, Option<Dataset>>,
    results: BTreeMap<String, Vec<u8>>
}

/// Shared, cloneable in-process store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>
}

fn not_found(name: &str) -> Error {
    Error::io(name, io::Error::new(io::ErrorKind::NotFound, "no such entry"))
}

impl MemoryStore {

    /// Empty store
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> MutexGuard<Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a dataset under `id`.
    pub fn add_dataset(&self, id: &str, dataset: Dataset) {
        self.lock().inputs.insert(id.into(), Some(dataset));
    }

    /// Adds a bare name to the input location; loading it fails.
    pub fn add_input_name(&self, name: &str) {
        self.lock().inputs.insert(name.into(), None);
    }

    /// Adds raw result contents under `name`.
    pub fn add_result(&self, name: &str, contents: &[u8]) {
        self.lock().results.insert(name.into(), contents.to_vec());
    }

    /// Raw contents of a stored result
    pub fn result(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().results.get(name).cloned()
    }

    /// Parses a stored result back into a table.
    pub fn table(&self, name: &str, m0: usize, m1: usize) -> Result<FrequencyTable> {
        let raw = self.result(name).ok_or_else(|| not_found(name))?;
        FrequencyTable::read_sparse(&raw[..], m0, m1).map_err(|e| Error::io(name, e))
    }
}

impl Source for MemoryStore {
    fn dataset_names(&self) -> Result<Vec<String>> {
        Ok(self.lock().inputs.keys().cloned().collect())
    }

    fn load(&self, id: &str) -> Result<Dataset> {
        self.lock().inputs.get(id).cloned().and_then(|d| d).ok_or_else(|| not_found(id))
    }
}

impl Sink for MemoryStore {
    type RW = MemoryBuffer;

    fn result_names(&self) -> Result<Vec<String>> {
        Ok(self.lock().results.keys().cloned().collect())
    }

    fn writer(&self, name: &str) -> Result<MemoryBuffer> {
        Ok(MemoryBuffer { store: self.clone(), name: name.into(), buf: Vec::new() })
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.lock().results.remove(name).map(|_| ()).ok_or_else(|| not_found(name))
    }
}

/// A result being collected in memory
pub struct MemoryBuffer {
    store: MemoryStore,
    name: String,
    buf: Vec<u8>
}

impl ResultWriter for MemoryBuffer {
    fn write_table(&mut self, table: &FrequencyTable) -> Result<()> {
        table.write_sparse(&mut self.buf).map_err(|e| Error::io(&self.name, e))
    }

    fn finish(self) -> Result<()> {
        self.store.lock().results.insert(self.name, self.buf);
        Ok(())
    }
}
