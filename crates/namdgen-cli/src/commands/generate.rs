use crate::cli::GenerateArgs;
use crate::config::{self, GenerationConfig};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use namdgen::{
    core::io::directory::DirectorySink,
    engine::progress::ProgressReporter,
    workflows::{self, generate::GenerationSummary},
};
use std::fmt::Write;
use tracing::info;

const RULE_WIDTH: usize = 80;

pub fn run(args: GenerateArgs, parallel: bool, quiet: bool) -> Result<GenerationSummary> {
    info!("Resolving generation parameters...");
    let config = config::resolve(&args.overrides)?;

    if !quiet {
        print!("{}", parameter_echo(&config));
    }

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Writing configs to {:?}", &args.output_dir);
    let mut sink = DirectorySink::create(&args.output_dir)?;

    let summary = if parallel {
        workflows::generate::run_parallel(&config.catalog, &config.params, &mut sink, &reporter)?
    } else {
        workflows::generate::run(&config.catalog, &config.params, &mut sink, &reporter)?
    };

    if !quiet {
        print!("{}", completion_summary(&summary));
    }
    Ok(summary)
}

pub(crate) fn parameter_echo(config: &GenerationConfig) -> String {
    let params = &config.params;
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "NAMD config generation");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Systems: {}", config.catalog.len());
    let _ = writeln!(out, "Replicas: {}", params.replicas);
    let _ = writeln!(out, "Production: {} ns", params.production_ns);
    let _ = writeln!(out, "Equilibration: {:.1} ns", params.equilibration_ns());
    let _ = writeln!(out, "Output frequency: {:.1} ps", params.output_freq_ps);
    let _ = writeln!(out, "Total trajectories: {}", config.expected_documents());
    let _ = writeln!(out, "{rule}");
    out
}

pub(crate) fn completion_summary(summary: &GenerationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "✓ Generated {} configs ({} systems × {} replicas)",
        summary.documents_written, summary.systems, summary.replicas
    );
    let _ = writeln!(out, "  Manifest: {}", summary.manifest_path.display());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParamOverrides;
    use namdgen::core::io::directory::verify_output;
    use namdgen::core::io::manifest::MANIFEST_FILE_NAME;
    use tempfile::tempdir;

    #[test]
    fn parameter_echo_reports_reference_batch() {
        let config = config::resolve(&ParamOverrides::default()).unwrap();
        let echo = parameter_echo(&config);
        assert!(echo.starts_with(&"=".repeat(80)));
        assert!(echo.contains("Systems: 25\n"));
        assert!(echo.contains("Replicas: 10\n"));
        assert!(echo.contains("Production: 20 ns\n"));
        assert!(echo.contains("Equilibration: 1.2 ns\n"));
        assert!(echo.contains("Output frequency: 10.0 ps\n"));
        assert!(echo.contains("Total trajectories: 250\n"));
    }

    #[test]
    fn generate_writes_a_complete_batch() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("namd_configs");
        let args = GenerateArgs {
            output_dir: output_dir.clone(),
            overrides: ParamOverrides {
                replicas: Some(2),
                ..Default::default()
            },
        };

        let summary = run(args, false, true).unwrap();

        assert_eq!(summary.documents_written, 50);
        assert_eq!(summary.manifest_path, output_dir.join(MANIFEST_FILE_NAME));
        let report = verify_output(&output_dir, Some(50)).unwrap();
        assert!(report.is_complete(), "{:?}", report);
        assert!(completion_summary(&summary).contains("Generated 50 configs"));
    }

    #[test]
    fn parallel_generate_writes_the_same_manifest() {
        let sequential = tempdir().unwrap();
        let parallel = tempdir().unwrap();
        let args = |dir: &std::path::Path| GenerateArgs {
            output_dir: dir.to_path_buf(),
            overrides: ParamOverrides {
                replicas: Some(3),
                ..Default::default()
            },
        };

        run(args(sequential.path()), false, true).unwrap();
        run(args(parallel.path()), true, true).unwrap();

        let manifest = |dir: &std::path::Path| {
            std::fs::read_to_string(dir.join(MANIFEST_FILE_NAME)).unwrap()
        };
        assert_eq!(manifest(sequential.path()), manifest(parallel.path()));
    }
}
