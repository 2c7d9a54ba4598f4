use ratio::dataset::Dataset;
use ratio::error::Result;
use ratio::table::FrequencyTable;

/// Where datasets come from.
pub trait Source: Send + Sync {

    /// Every name present in the input location, valid or not
    fn dataset_names(&self) -> Result<Vec<String>>;

    /// Loads one dataset in full.
    fn load(&self, id: &str) -> Result<Dataset>;
}

/// Where results go.
pub trait Sink: Send + Sync {
    /// Writer returned by `writer`
    type RW: ResultWriter;

    /// Every name present in the output location, valid or not
    fn result_names(&self) -> Result<Vec<String>>;

    /// Opens a writer that publishes under `name` once finished.
    fn writer(&self, name: &str) -> Result<Self::RW>;

    /// Deletes a stored result.
    fn remove(&self, name: &str) -> Result<()>;

    /// Writes a whole table under `name`.
    fn store(&self, name: &str, table: &FrequencyTable) -> Result<()> {
        let mut out = self.writer(name)?;
        out.write_table(table)?;
        out.finish()
    }
}

/// A result being written.  Nothing is visible under the target name until `finish` succeeds.
pub trait ResultWriter: Sized {

    /// Appends a table in the sparse row format.
    fn write_table(&mut self, table: &FrequencyTable) -> Result<()>;

    /// Publishes the result.
    fn finish(self) -> Result<()>;
}
