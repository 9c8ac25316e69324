use crate::cli::ParamOverrides;
use crate::error::{CliError, Result};
use namdgen::core::models::catalog::Catalog;
use namdgen::core::models::system::{SizeClass, SystemSpec};
use namdgen::engine::config::{GlobalParams, GlobalParamsBuilder, RampStyle};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialParams {
    replicas: Option<u32>,
    #[serde(rename = "production-ns")]
    production_ns: Option<u64>,
    #[serde(rename = "timestep-fs")]
    timestep_fs: Option<f64>,
    #[serde(rename = "output-freq-ps")]
    output_freq_ps: Option<f64>,
    #[serde(rename = "minimize-steps")]
    minimize_steps: Option<u64>,
    #[serde(rename = "heat-ns")]
    heat_ns: Option<f64>,
    #[serde(rename = "nvt-ns")]
    nvt_ns: Option<f64>,
    #[serde(rename = "npt-ns")]
    npt_ns: Option<f64>,
    #[serde(rename = "topology-dir")]
    topology_dir: Option<PathBuf>,
    #[serde(rename = "heating-ramp")]
    heating_ramp: Option<RampStyle>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileSystemEntry {
    name: String,
    temperature: f64,
    size: SizeClass,
}

impl From<FileSystemEntry> for SystemSpec {
    fn from(e: FileSystemEntry) -> Self {
        SystemSpec::new(e.name, e.temperature, e.size)
    }
}

/// Resolved inputs of one batch: the catalog and the global parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub catalog: Catalog,
    pub params: GlobalParams,
}

impl GenerationConfig {
    pub fn expected_documents(&self) -> usize {
        self.catalog.len() * self.params.replicas as usize
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGenerationConfig {
    params: Option<PartialParams>,
    systems: Option<Vec<FileSystemEntry>>,
}

impl PartialGenerationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given; otherwise starts from an empty configuration so that every
    /// value falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Merges file values with CLI overrides. Precedence: CLI flag, then file, then default.
    pub fn merge_with_cli(self, overrides: &ParamOverrides) -> Result<GenerationConfig> {
        let file = self.params.unwrap_or_default();

        let mut builder = GlobalParamsBuilder::new();
        if let Some(n) = overrides.replicas.or(file.replicas) {
            builder = builder.replicas(n);
        }
        if let Some(ns) = file.production_ns {
            builder = builder.production_ns(ns);
        }
        if let Some(fs) = file.timestep_fs {
            builder = builder.timestep_fs(fs);
        }
        if let Some(ps) = file.output_freq_ps {
            builder = builder.output_freq_ps(ps);
        }
        if let Some(steps) = file.minimize_steps {
            builder = builder.minimize_steps(steps);
        }
        if let Some(ns) = file.heat_ns {
            builder = builder.heat_ns(ns);
        }
        if let Some(ns) = file.nvt_ns {
            builder = builder.nvt_ns(ns);
        }
        if let Some(ns) = file.npt_ns {
            builder = builder.npt_ns(ns);
        }
        if let Some(dir) = overrides.topology_dir.clone().or(file.topology_dir) {
            builder = builder.topology_dir(dir);
        }
        let ramp = if overrides.expand_ramp {
            Some(RampStyle::Expanded)
        } else {
            file.heating_ramp
        };
        if let Some(style) = ramp {
            builder = builder.heating_ramp(style);
        }
        let params = builder.build()?;

        let catalog = match self.systems {
            Some(entries) => {
                debug!("Using {} systems declared in the config file.", entries.len());
                Catalog::new(entries.into_iter().map(Into::into).collect())?
            }
            None => Catalog::reference(),
        };

        Ok(GenerationConfig { catalog, params })
    }
}

/// Loads the optional config file named by `overrides` and merges it with the CLI values.
pub fn resolve(overrides: &ParamOverrides) -> Result<GenerationConfig> {
    PartialGenerationConfig::load(overrides.config.as_deref())?.merge_with_cli(overrides)
}
