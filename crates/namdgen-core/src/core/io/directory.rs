use super::manifest::{MANIFEST_FILE_NAME, Manifest, ManifestEntry};
use super::traits::RunSink;
use crate::engine::error::EngineError;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// [`RunSink`] that writes every document into one output directory, next to a
/// `system_metadata.txt` manifest.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    manifest: Manifest,
}

impl DirectorySink {
    /// Opens `root` as an output directory, creating it (and its parents) when missing.
    /// An already existing directory is reused as-is.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| EngineError::Write {
            path: root.clone(),
            source,
        })?;
        debug!("Output directory ready at {:?}", &root);
        Ok(Self {
            root,
            manifest: Manifest::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl RunSink for DirectorySink {
    type Error = EngineError;

    fn write_document(&self, file_name: &str, content: &str) -> Result<(), Self::Error> {
        let path = self.root.join(file_name);
        trace!("Writing {:?}", &path);
        write_file(&path, content).map_err(|source| EngineError::Write { path, source })
    }

    fn append_manifest_row(&mut self, entry: ManifestEntry) {
        self.manifest.push(entry);
    }

    fn flush_manifest(&mut self) -> Result<PathBuf, Self::Error> {
        let path = self.manifest_path();
        let staging = path.with_extension("txt.partial");

        let bytes = self.manifest.to_tsv_string()?;
        fs::write(&staging, bytes).map_err(|source| EngineError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| EngineError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(
            "Manifest with {} rows written to {:?}",
            self.manifest.len(),
            &path
        );
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()
}

/// Outcome of checking an output directory against its manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    pub rows: usize,
    pub missing_files: Vec<String>,
    pub duplicate_rows: Vec<String>,
    /// `Some((expected, found))` when the row count differs from the expected count.
    pub count_mismatch: Option<(usize, usize)>,
}

impl VerificationReport {
    pub fn is_complete(&self) -> bool {
        self.missing_files.is_empty()
            && self.duplicate_rows.is_empty()
            && self.count_mismatch.is_none()
    }
}

/// Checks that the manifest in `dir` lists every generated file exactly once and that each
/// listed file exists. When `expected_rows` is given the row count must match it as well.
pub fn verify_output(
    dir: impl AsRef<Path>,
    expected_rows: Option<usize>,
) -> Result<VerificationReport, EngineError> {
    let dir = dir.as_ref();
    let manifest = Manifest::read_from_path(dir.join(MANIFEST_FILE_NAME))?;

    let mut report = VerificationReport {
        rows: manifest.len(),
        ..Default::default()
    };
    let mut seen = HashSet::with_capacity(manifest.len());
    for entry in manifest.entries() {
        if !seen.insert(entry.file_name.as_str()) {
            report.duplicate_rows.push(entry.file_name.clone());
        }
        if !dir.join(&entry.file_name).is_file() {
            report.missing_files.push(entry.file_name.clone());
        }
    }
    if let Some(expected) = expected_rows {
        if expected != manifest.len() {
            report.count_mismatch = Some((expected, manifest.len()));
        }
    }
    Ok(report)
}
