use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

pub const DEFAULT_OUTPUT_DIR: &str = "namd_configs";

#[derive(Parser, Debug)]
#[command(
    name = "namdgen",
    version,
    about = "namdgen - Generate NAMD equilibration and production configs for replica batches of MD trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output and the progress display
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Generate configs on a thread pool of this size.
    /// Without it, configs are generated one after another.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one config per system replica plus the system_metadata.txt manifest.
    Generate(GenerateArgs),
    /// Print the config of a single system replica to standard output.
    Preview(PreviewArgs),
    /// Check a generated output directory against its manifest.
    Verify(VerifyArgs),
    /// List the systems of the active catalog with their size tier.
    Catalog(CatalogArgs),
}

/// Parameter overrides shared by the commands that render configs.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamOverrides {
    /// Path to a TOML file with `[params]` and `[[systems]]` tables.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of replicas per system.
    #[arg(short, long, value_name = "INT")]
    pub replicas: Option<u32>,

    /// Override the directory the configs reference topology and coordinate files from.
    #[arg(long, value_name = "DIR")]
    pub topology_dir: Option<PathBuf>,

    /// Write the heating ramp as explicit increments instead of a Tcl loop.
    #[arg(long)]
    pub expand_ramp: bool,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory the configs and the manifest are written to (created if missing).
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub overrides: ParamOverrides,
}

/// Arguments for the `preview` subcommand.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Name of the system to render, as listed by `namdgen catalog`.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub system: String,

    /// Replica index to render.
    #[arg(short = 'n', long, value_name = "INT", default_value_t = 0)]
    pub replica: u32,

    #[command(flatten)]
    pub overrides: ParamOverrides,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Directory holding the generated configs and manifest.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub overrides: ParamOverrides,
}

/// Arguments for the `catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Path to a TOML file whose `[[systems]]` replace the built-in catalog.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults_to_namd_configs_directory() {
        let cli = Cli::parse_from(["namdgen", "generate"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.output_dir, PathBuf::from("namd_configs"));
                assert!(args.overrides.config.is_none());
                assert!(!args.overrides.expand_ramp);
            }
            other => panic!("expected generate, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["namdgen", "generate", "-vv", "-j", "4", "--replicas", "3"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.overrides.replicas, Some(3)),
            other => panic!("expected generate, got {:?}", other),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["namdgen", "-q", "-v", "generate"]);
        assert!(result.is_err());
    }

    #[test]
    fn preview_requires_a_system_name() {
        assert!(Cli::try_parse_from(["namdgen", "preview"]).is_err());
        let cli = Cli::parse_from(["namdgen", "preview", "-s", "regime2_165D_300K", "-n", "4"]);
        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.system, "regime2_165D_300K");
                assert_eq!(args.replica, 4);
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }
}
