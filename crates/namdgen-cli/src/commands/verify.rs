use crate::cli::VerifyArgs;
use crate::config;
use crate::error::{CliError, Result};
use namdgen::core::io::directory::{VerificationReport, verify_output};
use tracing::{info, warn};

pub fn run(args: VerifyArgs) -> Result<VerificationReport> {
    let config = config::resolve(&args.overrides)?;
    let expected = config.expected_documents();

    info!(
        "Verifying {:?} against {} expected configs.",
        &args.output_dir, expected
    );
    let report = verify_output(&args.output_dir, Some(expected))?;

    if report.is_complete() {
        println!(
            "✓ {} lists {} configs, all present.",
            args.output_dir.display(),
            report.rows
        );
        return Ok(report);
    }

    for name in &report.missing_files {
        warn!("Missing config: {}", name);
    }
    for name in &report.duplicate_rows {
        warn!("Duplicate manifest row: {}", name);
    }
    Err(CliError::Verification(describe(&report)))
}

fn describe(report: &VerificationReport) -> String {
    let mut problems = Vec::new();
    if let Some((expected, found)) = report.count_mismatch {
        problems.push(format!("expected {expected} manifest rows, found {found}"));
    }
    if !report.missing_files.is_empty() {
        problems.push(format!("{} listed files missing", report.missing_files.len()));
    }
    if !report.duplicate_rows.is_empty() {
        problems.push(format!("{} duplicate rows", report.duplicate_rows.len()));
    }
    problems.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{GenerateArgs, ParamOverrides};
    use crate::commands::generate;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn overrides(replicas: u32) -> ParamOverrides {
        ParamOverrides {
            replicas: Some(replicas),
            ..Default::default()
        }
    }

    fn generate_into(dir: &Path, replicas: u32) {
        let args = GenerateArgs {
            output_dir: dir.to_path_buf(),
            overrides: overrides(replicas),
        };
        generate::run(args, false, true).unwrap();
    }

    #[test]
    fn freshly_generated_directory_verifies() {
        let dir = tempdir().unwrap();
        generate_into(dir.path(), 2);

        let report = run(VerifyArgs {
            output_dir: dir.path().to_path_buf(),
            overrides: overrides(2),
        })
        .unwrap();
        assert_eq!(report.rows, 50);
    }

    #[test]
    fn missing_config_fails_verification() {
        let dir = tempdir().unwrap();
        generate_into(dir.path(), 1);
        fs::remove_file(dir.path().join("regime0_1RC7_300K_rep00.namd")).unwrap();

        let result = run(VerifyArgs {
            output_dir: dir.path().to_path_buf(),
            overrides: overrides(1),
        });
        assert!(
            matches!(result, Err(CliError::Verification(msg)) if msg.contains("1 listed files missing"))
        );
    }

    #[test]
    fn replica_count_mismatch_fails_verification() {
        let dir = tempdir().unwrap();
        generate_into(dir.path(), 1);

        let result = run(VerifyArgs {
            output_dir: dir.path().to_path_buf(),
            overrides: overrides(2),
        });
        assert!(
            matches!(result, Err(CliError::Verification(msg)) if msg.contains("expected 50 manifest rows, found 25"))
        );
    }

    #[test]
    fn missing_manifest_is_a_core_error() {
        let dir = tempdir().unwrap();
        let result = run(VerifyArgs {
            output_dir: dir.path().to_path_buf(),
            overrides: ParamOverrides::default(),
        });
        assert!(matches!(result, Err(CliError::Core(_))));
    }
}
