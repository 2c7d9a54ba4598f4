//! Disk Store
//! ---
//! `DiskStore` reads datasets from an input directory and writes results to an output
//! directory, one file per dataset, named as described in `names`.
//!
//! Every result is first written to a hidden `.tmp-<uuid>` file inside the output directory and
//! renamed onto its final name once complete.  An interrupted run therefore never leaves a
//! truncated file under a result name, and the leftover temporary is ignored by the work queue.
//!

extern crate uuid;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use self::uuid::Uuid;

use ratio::dataset::Dataset;
use ratio::error::{Error, Result};
use ratio::table::FrequencyTable;

use crate::interfaces::{ResultWriter, Sink, Source};

/// Input and output directories of a run
#[derive(Debug, Clone)]
pub struct DiskStore {
    input: Arc<PathBuf>,
    output: Arc<PathBuf>
}

impl DiskStore {

    /// Uses `<data_dir>/in` and `<data_dir>/out`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let root = data_dir.as_ref();
        DiskStore::with_dirs(root.join("in"), root.join("out"))
    }

    /// Uses explicit input and output directories.
    pub fn with_dirs<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q) -> Self {
        DiskStore { input: Arc::new(input.into()), output: Arc::new(output.into()) }
    }

    /// Directory datasets are read from
    pub fn input_dir(&self) -> &Path {
        &self.input
    }

    /// Directory results are written to
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    /// Creates the output directory if it is missing.
    pub fn create_output(&self) -> Result<()> {
        fs::create_dir_all(&*self.output).map_err(|e| Error::io(&*self.output, e))
    }
}

fn list(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("unexpected file name: {}", dir.join(raw).display())
        }
    }
    Ok(names)
}

impl Source for DiskStore {
    fn dataset_names(&self) -> Result<Vec<String>> {
        list(&self.input)
    }

    fn load(&self, id: &str) -> Result<Dataset> {
        Dataset::read(self.input.join(id))
    }
}

impl Sink for DiskStore {
    type RW = DiskBuffer;

    fn result_names(&self) -> Result<Vec<String>> {
        list(&self.output)
    }

    fn writer(&self, name: &str) -> Result<DiskBuffer> {
        DiskBuffer::new(&self.output, name)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.output.join(name);
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))
    }
}

/// A result being written to a temporary file
pub struct DiskBuffer {
    tmp: PathBuf,
    target: PathBuf,
    out: Option<BufWriter<File>>,
    published: bool
}

impl DiskBuffer {
    fn new(dir: &Path, name: &str) -> Result<Self> {
        let tmp = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        let fd = File::create(&tmp).map_err(|e| Error::io(&tmp, e))?;
        Ok(DiskBuffer {
            tmp: tmp,
            target: dir.join(name),
            out: Some(BufWriter::new(fd)),
            published: false
        })
    }
}

impl ResultWriter for DiskBuffer {
    fn write_table(&mut self, table: &FrequencyTable) -> Result<()> {
        if let Some(out) = self.out.as_mut() {
            table.write_sparse(out).map_err(|e| Error::io(&self.target, e))?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        if let Some(out) = self.out.take() {
            let fd = out.into_inner().map_err(|e| Error::io(&self.target, e.into_error()))?;
            fd.sync_all().map_err(|e| Error::io(&self.target, e))?;
        }
        fs::rename(&self.tmp, &self.target).map_err(|e| Error::io(&self.target, e))?;
        self.published = true;
        trace!("Wrote {}", self.target.display());
        Ok(())
    }
}

impl Drop for DiskBuffer {
    fn drop(&mut self) {
        if !self.published {
            if let Err(e) = fs::remove_file(&self.tmp) {
                warn!("Error deleting {}: {}", self.tmp.display(), e);
            }
        }
    }
}
