use super::schedule::StepSchedule;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' must be a finite value greater than zero (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Parameter '{0}' must be at least 1")]
    Zero(&'static str),

    #[error("Parameter '{name}' leads to a step count that does not fit in 64 bits")]
    StepOverflow { name: &'static str },

    #[error("Parameter '{name}' is shorter than one timestep")]
    BelowTimestep { name: &'static str },
}

/// How the restrained-heating temperature ramp is written into a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampStyle {
    /// A Tcl `for` loop evaluated by NAMD at run time.
    #[default]
    Tcl,
    /// Ten explicit `langevinTemp`/`run` increments, for consumers without Tcl.
    Expanded,
}

/// Batch-wide simulation and equilibration parameters.
///
/// Built once, validated by [`GlobalParamsBuilder::build`], and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalParams {
    pub replicas: u32,
    pub production_ns: u64,
    pub timestep_fs: f64,
    pub output_freq_ps: f64,
    pub minimize_steps: u64,
    pub heat_ns: f64,
    pub nvt_ns: f64,
    pub npt_ns: f64,
    pub topology_dir: PathBuf,
    pub heating_ramp: RampStyle,
}

pub const DEFAULT_REPLICAS: u32 = 10;
pub const DEFAULT_PRODUCTION_NS: u64 = 20;
pub const DEFAULT_TIMESTEP_FS: f64 = 2.0;
pub const DEFAULT_OUTPUT_FREQ_PS: f64 = 10.0;
pub const DEFAULT_MINIMIZE_STEPS: u64 = 10_000;
pub const DEFAULT_HEAT_NS: f64 = 0.2;
pub const DEFAULT_NVT_NS: f64 = 0.5;
pub const DEFAULT_NPT_NS: f64 = 0.5;
pub const DEFAULT_TOPOLOGY_DIR: &str = "../topology_files";

impl GlobalParams {
    /// Combined length of the heating, NVT and NPT stages, in ns.
    pub fn equilibration_ns(&self) -> f64 {
        self.heat_ns + self.nvt_ns + self.npt_ns
    }
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            production_ns: DEFAULT_PRODUCTION_NS,
            timestep_fs: DEFAULT_TIMESTEP_FS,
            output_freq_ps: DEFAULT_OUTPUT_FREQ_PS,
            minimize_steps: DEFAULT_MINIMIZE_STEPS,
            heat_ns: DEFAULT_HEAT_NS,
            nvt_ns: DEFAULT_NVT_NS,
            npt_ns: DEFAULT_NPT_NS,
            topology_dir: PathBuf::from(DEFAULT_TOPOLOGY_DIR),
            heating_ramp: RampStyle::Tcl,
        }
    }
}

/// Builder for [`GlobalParams`]; any field left unset falls back to its reference default.
#[derive(Default)]
pub struct GlobalParamsBuilder {
    replicas: Option<u32>,
    production_ns: Option<u64>,
    timestep_fs: Option<f64>,
    output_freq_ps: Option<f64>,
    minimize_steps: Option<u64>,
    heat_ns: Option<f64>,
    nvt_ns: Option<f64>,
    npt_ns: Option<f64>,
    topology_dir: Option<PathBuf>,
    heating_ramp: Option<RampStyle>,
}

impl GlobalParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replicas(mut self, n: u32) -> Self {
        self.replicas = Some(n);
        self
    }
    pub fn production_ns(mut self, ns: u64) -> Self {
        self.production_ns = Some(ns);
        self
    }
    pub fn timestep_fs(mut self, fs: f64) -> Self {
        self.timestep_fs = Some(fs);
        self
    }
    pub fn output_freq_ps(mut self, ps: f64) -> Self {
        self.output_freq_ps = Some(ps);
        self
    }
    pub fn minimize_steps(mut self, steps: u64) -> Self {
        self.minimize_steps = Some(steps);
        self
    }
    pub fn heat_ns(mut self, ns: f64) -> Self {
        self.heat_ns = Some(ns);
        self
    }
    pub fn nvt_ns(mut self, ns: f64) -> Self {
        self.nvt_ns = Some(ns);
        self
    }
    pub fn npt_ns(mut self, ns: f64) -> Self {
        self.npt_ns = Some(ns);
        self
    }
    pub fn topology_dir(mut self, dir: PathBuf) -> Self {
        self.topology_dir = Some(dir);
        self
    }
    pub fn heating_ramp(mut self, style: RampStyle) -> Self {
        self.heating_ramp = Some(style);
        self
    }

    pub fn build(self) -> Result<GlobalParams, ConfigError> {
        let defaults = GlobalParams::default();

        let replicas = self.replicas.unwrap_or(defaults.replicas);
        if replicas == 0 {
            return Err(ConfigError::Zero("replicas"));
        }

        let params = GlobalParams {
            replicas,
            production_ns: self.production_ns.unwrap_or(defaults.production_ns),
            timestep_fs: positive("timestep_fs", self.timestep_fs, defaults.timestep_fs)?,
            output_freq_ps: positive(
                "output_freq_ps",
                self.output_freq_ps,
                defaults.output_freq_ps,
            )?,
            minimize_steps: self.minimize_steps.unwrap_or(defaults.minimize_steps),
            heat_ns: positive("heat_ns", self.heat_ns, defaults.heat_ns)?,
            nvt_ns: positive("nvt_ns", self.nvt_ns, defaults.nvt_ns)?,
            npt_ns: positive("npt_ns", self.npt_ns, defaults.npt_ns)?,
            topology_dir: self.topology_dir.unwrap_or(defaults.topology_dir),
            heating_ramp: self.heating_ramp.unwrap_or(defaults.heating_ramp),
        };

        if params.topology_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingParameter("topology_dir"));
        }
        StepSchedule::try_from_params(&params)?;

        Ok(params)
    }
}

fn positive(name: &'static str, value: Option<f64>, default: f64) -> Result<f64, ConfigError> {
    let value = value.unwrap_or(default);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
