use crate::cli::PreviewArgs;
use crate::config;
use crate::error::{CliError, Result};
use namdgen::engine::synthesizer::synthesize;
use tracing::info;

/// Renders the config of one system replica without touching the filesystem.
pub fn render(args: &PreviewArgs) -> Result<String> {
    let config = config::resolve(&args.overrides)?;

    let system = config.catalog.get(&args.system).ok_or_else(|| {
        CliError::Argument(format!(
            "Unknown system '{}'. Run `namdgen catalog` to list the available systems.",
            args.system
        ))
    })?;
    if args.replica >= config.params.replicas {
        return Err(CliError::Argument(format!(
            "Replica {} is out of range; the batch has {} replicas (0..{}).",
            args.replica, config.params.replicas, config.params.replicas
        )));
    }

    let record = synthesize(system, args.replica, &config.params);
    info!(
        "Rendered {} with seed {}.",
        record.entry.file_name, record.seed
    );
    Ok(record.document)
}

pub fn run(args: PreviewArgs) -> Result<()> {
    print!("{}", render(&args)?);
    Ok(())
}
