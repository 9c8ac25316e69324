use std::fmt;
use std::path::{Path, PathBuf};

/// A milestone is reported every this many written configs.
pub const MILESTONE_INTERVAL: u64 = 50;

/// Events emitted by the run driver while a batch is generated.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Generation of `total` configs is about to start.
    BatchStart { total: u64 },
    /// One config was written. `done` counts written configs, this one included; in parallel
    /// runs consecutive events may arrive with non-monotonic file names.
    ConfigWritten {
        file_name: String,
        done: u64,
        total: u64,
    },
    /// Every [`MILESTONE_INTERVAL`] configs.
    Milestone { done: u64, total: u64 },
    ManifestWritten { path: PathBuf },
    BatchFinish { written: u64 },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::BatchStart { total } => write!(f, "Generating {total} configs..."),
            Progress::ConfigWritten { file_name, .. } => write!(f, "Wrote {file_name}"),
            Progress::Milestone { done, total } => {
                write!(f, "Generated {done}/{total} configs...")
            }
            Progress::ManifestWritten { path } => {
                write!(f, "Metadata saved to {}", path.display())
            }
            Progress::BatchFinish { written } => write!(f, "Generated {written} configs"),
        }
    }
}

pub type ProgressCallback<'a> = Box<dyn Fn(&Progress) + Send + Sync + 'a>;

/// Forwards driver events to an optional callback.
///
/// Shared by reference across rayon workers, hence the `Send + Sync` callback bound.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// A reporter that drops every event.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn batch_started(&self, total: u64) {
        self.emit(|| Progress::BatchStart { total });
    }

    /// Reports one written config, followed by a [`Progress::Milestone`] whenever `done`
    /// reaches a multiple of [`MILESTONE_INTERVAL`].
    pub fn config_written(&self, file_name: &str, done: u64, total: u64) {
        self.emit(|| Progress::ConfigWritten {
            file_name: file_name.to_string(),
            done,
            total,
        });
        if is_milestone(done) {
            self.emit(|| Progress::Milestone { done, total });
        }
    }

    pub fn manifest_written(&self, path: &Path) {
        self.emit(|| Progress::ManifestWritten {
            path: path.to_path_buf(),
        });
    }

    pub fn batch_finished(&self, written: u64) {
        self.emit(|| Progress::BatchFinish { written });
    }

    // Events are only built when someone listens.
    fn emit(&self, event: impl FnOnce() -> Progress) {
        if let Some(cb) = &self.callback {
            cb(&event());
        }
    }
}

pub fn is_milestone(done: u64) -> bool {
    done > 0 && done % MILESTONE_INTERVAL == 0
}
