use crate::core::models::system::{ParseSizeClassError, SizeClass};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

pub const MANIFEST_FILE_NAME: &str = "system_metadata.txt";
pub const MANIFEST_HEADER: &str = "# config_file\tsystem_size\ttemperature";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),
    #[error("Malformed manifest row {row}: {reason}")]
    Malformed { row: usize, reason: String },
    #[error("Malformed manifest row {row}: {source}")]
    SizeClass {
        row: usize,
        #[source]
        source: ParseSizeClassError,
    },
}

/// Metadata row describing one generated config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub size_class: SizeClass,
    pub temperature_k: f64,
}

impl ManifestEntry {
    fn temperature_field(&self) -> String {
        if self.temperature_k.fract() == 0.0 && self.temperature_k.abs() < 1e15 {
            format!("{:.0}", self.temperature_k)
        } else {
            format!("{:?}", self.temperature_k)
        }
    }
}

/// Append-only table of [`ManifestEntry`] rows, serialized as a tab-separated file with a
/// commented header line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), ManifestError> {
        writeln!(writer, "{MANIFEST_HEADER}")?;
        let mut tsv = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        for entry in &self.entries {
            tsv.write_record([
                entry.file_name.as_str(),
                entry.size_class.as_str(),
                entry.temperature_field().as_str(),
            ])?;
        }
        tsv.flush()?;
        Ok(())
    }

    pub fn to_tsv_string(&self) -> Result<String, ManifestError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ManifestError::Malformed {
            row: 0,
            reason: e.to_string(),
        })
    }

    pub fn read_from(reader: impl Read) -> Result<Self, ManifestError> {
        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(reader);

        let mut manifest = Manifest::new();
        for (index, record) in tsv.records().enumerate() {
            let record = record?;
            let row = index + 1;
            if record.len() != 3 {
                return Err(ManifestError::Malformed {
                    row,
                    reason: format!("expected 3 fields, found {}", record.len()),
                });
            }
            let size_class = record[1]
                .parse()
                .map_err(|source| ManifestError::SizeClass { row, source })?;
            let temperature_k = record[2]
                .trim()
                .parse()
                .map_err(|_| ManifestError::Malformed {
                    row,
                    reason: format!("invalid temperature '{}'", &record[2]),
                })?;
            manifest.push(ManifestEntry {
                file_name: record[0].to_string(),
                size_class,
                temperature_k,
            });
        }
        Ok(manifest)
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let file = std::fs::File::open(path)?;
        Self::read_from(io::BufReader::new(file))
    }
}

impl Extend<ManifestEntry> for Manifest {
    fn extend<T: IntoIterator<Item = ManifestEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
