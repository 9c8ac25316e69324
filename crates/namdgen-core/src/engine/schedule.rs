use super::config::{ConfigError, GlobalParams};

const FS_PER_NS: f64 = 1.0e6;
const FS_PER_PS: f64 = 1.0e3;

/// Energy output is written every this many output intervals during equilibration.
pub const ENERGY_OUTPUT_FACTOR: u64 = 5;
/// Timing output is written every this many output intervals during equilibration.
pub const TIMING_OUTPUT_FACTOR: u64 = 10;

/// Integration step counts derived from [`GlobalParams`].
///
/// Identical for every system and replica of a batch; only temperature, seed and size profile
/// vary between documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSchedule {
    pub steps_per_ns: u64,
    pub total_production_steps: u64,
    /// Shared cadence of restart, trajectory (DCD) and cell (XST) output.
    pub output_freq_steps: u64,
    pub energy_output_steps: u64,
    pub timing_output_steps: u64,
    pub minimize_steps: u64,
    pub heat_steps: u64,
    pub nvt_steps: u64,
    pub npt_steps: u64,
}

impl StepSchedule {
    /// Derives the schedule, rejecting parameters whose step counts do not fit in a `u64` or
    /// whose output interval rounds to zero steps.
    ///
    /// [`GlobalParamsBuilder::build`](super::config::GlobalParamsBuilder::build) runs this
    /// check, so every built [`GlobalParams`] has a representable schedule.
    pub fn try_from_params(params: &GlobalParams) -> Result<Self, ConfigError> {
        let dt = params.timestep_fs;
        let steps_per_ns = steps(FS_PER_NS, dt).ok_or(overflow("timestep_fs"))?;

        let output_freq_steps =
            steps(params.output_freq_ps * FS_PER_PS, dt).ok_or(overflow("output_freq_ps"))?;
        if output_freq_steps == 0 {
            return Err(ConfigError::BelowTimestep {
                name: "output_freq_ps",
            });
        }

        let schedule = Self {
            steps_per_ns,
            total_production_steps: params
                .production_ns
                .checked_mul(steps_per_ns)
                .ok_or(overflow("production_ns"))?,
            output_freq_steps,
            energy_output_steps: output_freq_steps
                .checked_mul(ENERGY_OUTPUT_FACTOR)
                .ok_or(overflow("output_freq_ps"))?,
            timing_output_steps: output_freq_steps
                .checked_mul(TIMING_OUTPUT_FACTOR)
                .ok_or(overflow("output_freq_ps"))?,
            minimize_steps: params.minimize_steps,
            heat_steps: steps(params.heat_ns * FS_PER_NS, dt).ok_or(overflow("heat_ns"))?,
            nvt_steps: steps(params.nvt_ns * FS_PER_NS, dt).ok_or(overflow("nvt_ns"))?,
            npt_steps: steps(params.npt_ns * FS_PER_NS, dt).ok_or(overflow("npt_ns"))?,
        };

        schedule
            .heat_steps
            .checked_add(schedule.nvt_steps)
            .and_then(|n| n.checked_add(schedule.npt_steps))
            .ok_or(overflow("npt_ns"))?;

        Ok(schedule)
    }

    /// Derives the schedule of already validated parameters.
    ///
    /// Never panics: for parameters that bypassed the builder, unrepresentable counts saturate
    /// at `u64::MAX`.
    pub fn from_params(params: &GlobalParams) -> Self {
        if let Ok(schedule) = Self::try_from_params(params) {
            return schedule;
        }

        let dt = params.timestep_fs;
        let saturating = |duration_fs: f64| steps(duration_fs, dt).unwrap_or(u64::MAX);
        let steps_per_ns = saturating(FS_PER_NS);
        let output_freq_steps = saturating(params.output_freq_ps * FS_PER_PS);
        Self {
            steps_per_ns,
            total_production_steps: params.production_ns.saturating_mul(steps_per_ns),
            output_freq_steps,
            energy_output_steps: output_freq_steps.saturating_mul(ENERGY_OUTPUT_FACTOR),
            timing_output_steps: output_freq_steps.saturating_mul(TIMING_OUTPUT_FACTOR),
            minimize_steps: params.minimize_steps,
            heat_steps: saturating(params.heat_ns * FS_PER_NS),
            nvt_steps: saturating(params.nvt_ns * FS_PER_NS),
            npt_steps: saturating(params.npt_ns * FS_PER_NS),
        }
    }

    /// Number of MD steps of the whole equilibration phase, minimization excluded.
    pub fn equilibration_steps(&self) -> u64 {
        self.heat_steps
            .saturating_add(self.nvt_steps)
            .saturating_add(self.npt_steps)
    }
}

/// Rounds `duration_fs / timestep_fs` to the nearest step; `None` when it does not fit a `u64`.
fn steps(duration_fs: f64, timestep_fs: f64) -> Option<u64> {
    let n = (duration_fs / timestep_fs).round();
    // `u64::MAX as f64` is exactly 2^64, the first value that no longer fits.
    (n.is_finite() && n >= 0.0 && n < u64::MAX as f64).then_some(n as u64)
}

fn overflow(name: &'static str) -> ConfigError {
    ConfigError::StepOverflow { name }
}
