use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use namdgen::engine::progress::{Progress, ProgressCallback};
use std::sync::Arc;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} configs {msg}";

/// Shows generation progress as a bar on stderr; milestones and the manifest location are
/// printed above the bar so they stay in the scrollback.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<ProgressBar>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Tracks progress without drawing anything, used with `--quiet`.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(bar_style());
        Self { bar: Arc::new(bar) }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();

        // `ProgressBar` is internally synchronized, so rayon workers can update it directly.
        Box::new(move |progress: &Progress| match progress {
            Progress::BatchStart { total } => {
                bar.reset();
                bar.set_length(*total);
            }
            Progress::ConfigWritten { file_name, .. } => {
                bar.inc(1);
                bar.set_message(file_name.clone());
            }
            Progress::Milestone { .. } | Progress::ManifestWritten { .. } => {
                bar.println(format!("  {progress}"));
            }
            Progress::BatchFinish { written } => {
                bar.finish_with_message(format!("✓ {written} written"));
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
