use super::manifest::ManifestEntry;
use std::error::Error;
use std::path::PathBuf;

/// Destination for generated config documents and their manifest.
///
/// Documents are written as soon as they are produced; manifest rows are accumulated and
/// persisted in a single write once the whole batch has been generated.
pub trait RunSink {
    /// The error type for write operations.
    type Error: Error;

    /// Writes one document under `file_name`.
    ///
    /// Takes `&self` so that documents with disjoint names can be written concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be created or written completely.
    fn write_document(&self, file_name: &str, content: &str) -> Result<(), Self::Error>;

    /// Records one manifest row in memory.
    fn append_manifest_row(&mut self, entry: ManifestEntry);

    /// Writes the header and every accumulated row at once.
    ///
    /// # Return
    ///
    /// Returns the location the manifest was written to.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized or persisted.
    fn flush_manifest(&mut self) -> Result<PathBuf, Self::Error>;
}
