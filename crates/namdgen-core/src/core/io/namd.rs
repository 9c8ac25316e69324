//! Rendering of NAMD control files.
//!
//! A [`NamdConfig`] carries every resolved value one document needs and renders it through
//! [`fmt::Display`]. The section order, the restraint schedule (5.0 → 2.0 → 1.0 → off) and the
//! heating ramp from 50% to 100% of the target temperature form the equilibration protocol and
//! are reproduced identically for every system.

use crate::core::models::profile::SizeProfile;
use crate::core::models::system::SystemSpec;
use crate::engine::config::RampStyle;
use crate::engine::schedule::StepSchedule;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

const RULE: &str = "#############################################################";

/// Number of equal temperature increments in the second half of restrained heating.
pub const HEATING_RAMP_INCREMENTS: u64 = 10;

/// Position-restraint scaling of the heating, NVT and NPT stages.
pub const RESTRAINT_SCALING: [f64; 3] = [5.0, 2.0, 1.0];

pub const TOPOLOGY_EXTENSION: &str = "prmtop";
pub const COORDINATE_EXTENSION: &str = "inpcrd";

/// A fully resolved NAMD control file for one `(system, replica)` pair.
#[derive(Debug, Clone)]
pub struct NamdConfig<'a> {
    pub system: &'a SystemSpec,
    pub replica: u32,
    pub seed: u64,
    pub production_ns: u64,
    pub timestep_fs: f64,
    pub heat_ns: f64,
    pub nvt_ns: f64,
    pub npt_ns: f64,
    pub schedule: StepSchedule,
    pub profile: SizeProfile,
    pub topology_dir: &'a Path,
    pub heating_ramp: RampStyle,
}

/// Temperature formatted the way NAMD scripts conventionally spell it: whole kelvins without
/// a fractional part, anything else in shortest round-trip form.
#[derive(Debug, Clone, Copy)]
struct Kelvin(f64);

impl Display for Kelvin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

/// Floating-point parameter, always with at least one fractional digit (`2.0`, `0.8`).
#[derive(Debug, Clone, Copy)]
struct Real(f64);

impl Display for Real {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl NamdConfig<'_> {
    pub fn output_name(&self) -> String {
        self.system.output_name(self.replica)
    }

    pub fn topology_path(&self) -> String {
        self.input_path(TOPOLOGY_EXTENSION)
    }

    pub fn coordinate_path(&self) -> String {
        self.input_path(COORDINATE_EXTENSION)
    }

    fn input_path(&self, extension: &str) -> String {
        let file = format!("{}.{}", self.system.name, extension);
        // Forward slashes regardless of host: the file is consumed on the cluster.
        format!(
            "{}/{}",
            self.topology_dir.to_string_lossy().trim_end_matches(['/', '\\']),
            file
        )
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_banner(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "## NAMD Config: {} Rep {}",
            self.system.name, self.replica
        )?;
        writeln!(f, "## RIGOROUS + PERFORMANCE OPTIMIZED")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)
    }

    fn write_input(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = Kelvin(self.system.temperature_k);
        section(f, "INPUT")?;
        writeln!(f, "amber yes")?;
        writeln!(f, "parmfile {}", self.topology_path())?;
        writeln!(f, "ambercoor {}", self.coordinate_path())?;
        writeln!(f, "temperature {t}")?;
        writeln!(f, "seed {}", self.seed)?;
        writeln!(f)
    }

    fn write_output(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let freq = self.schedule.output_freq_steps;
        section(f, "OUTPUT - I/O OPTIMIZED")?;
        writeln!(f, "outputName {}", self.output_name())?;
        writeln!(f, "binaryoutput yes")?;
        writeln!(f, "binaryrestart yes")?;
        writeln!(f, "restartfreq {freq}")?;
        writeln!(f, "dcdfreq {freq}")?;
        writeln!(f, "xstFreq {freq}")?;
        writeln!(f, "outputEnergies {}", self.schedule.energy_output_steps)?;
        writeln!(f, "outputTiming {}", self.schedule.timing_output_steps)?;
        writeln!(f, "flushOutput yes")?;
        writeln!(f)
    }

    fn write_integration(&self, f: &mut Formatter<'_>) -> fmt::Result {
        section(f, "INTEGRATION")?;
        writeln!(f, "timestep {}", Real(self.timestep_fs))?;
        writeln!(f, "rigidBonds all")?;
        writeln!(f, "nonbondedFreq 1")?;
        writeln!(f, "fullElectFrequency 2")?;
        writeln!(f, "stepspercycle 20")?;
        writeln!(f)
    }

    fn write_nonbonded(&self, f: &mut Formatter<'_>) -> fmt::Result {
        section(f, "FORCE FIELD")?;
        writeln!(f, "exclude scaled1-4")?;
        writeln!(f, "1-4scaling 0.833333")?;
        writeln!(f, "switching on")?;
        writeln!(f, "switchdist 10.0")?;
        writeln!(f, "cutoff 12.0")?;
        writeln!(f, "pairlistdist {}", Real(self.profile.pairlist_distance))?;
        writeln!(f)?;

        section(f, "PME - PERFORMANCE TUNED")?;
        writeln!(f, "PME yes")?;
        writeln!(f, "PMEGridSpacing {}", Real(self.profile.pme_grid_spacing))?;
        writeln!(f, "PMEInterpOrder 6")?;
        writeln!(f)
    }

    fn write_ensemble(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = Kelvin(self.system.temperature_k);

        section(f, "TEMPERATURE")?;
        writeln!(f, "langevin on")?;
        writeln!(f, "langevinDamping 1.0")?;
        writeln!(f, "langevinTemp {t}")?;
        writeln!(f, "langevinHydrogen off")?;
        writeln!(f)?;

        section(f, "PRESSURE")?;
        writeln!(f, "useGroupPressure yes")?;
        writeln!(f, "useFlexibleCell no")?;
        writeln!(f, "useConstantArea no")?;
        writeln!(f, "langevinPiston on")?;
        writeln!(f, "langevinPistonTarget 1.01325")?;
        writeln!(f, "langevinPistonPeriod 100.0")?;
        writeln!(f, "langevinPistonDecay 50.0")?;
        writeln!(f, "langevinPistonTemp {t}")?;
        writeln!(f)
    }

    fn write_performance(&self, f: &mut Formatter<'_>) -> fmt::Result {
        section(f, "PERFORMANCE OPTIMIZATIONS")?;
        writeln!(f, "CUDASOAintegrate on")?;
        writeln!(f, "margin 2.5")?;
        writeln!(f, "patchDimension {}", Real(self.profile.patch_dimension))?;
        writeln!(f)
    }

    fn write_equilibration(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = &self.schedule;
        let t = Kelvin(self.system.temperature_k);
        let [heat_scaling, nvt_scaling, npt_scaling] = RESTRAINT_SCALING;

        section(f, "RIGOROUS EQUILIBRATION")?;
        writeln!(f)?;

        writeln!(
            f,
            "print \"EQUILIBRATION STAGE 1: Minimization ({} steps)\"",
            s.minimize_steps
        )?;
        writeln!(f, "minimize {}", s.minimize_steps)?;
        writeln!(f)?;

        writeln!(
            f,
            "print \"EQUILIBRATION STAGE 2: Restrained heating to {t}K ({} ns)\"",
            Real(self.heat_ns)
        )?;
        let coordinates = self.coordinate_path();
        writeln!(f, "constraints on")?;
        writeln!(f, "consref {coordinates}")?;
        writeln!(f, "conskfile {coordinates}")?;
        writeln!(f, "conskcol B")?;
        writeln!(f, "constraintScaling {}", Real(heat_scaling))?;
        writeln!(f)?;
        writeln!(
            f,
            "velocity reassign {}",
            Real(self.system.temperature_k * 0.5)
        )?;
        writeln!(f, "run {}", s.heat_steps / 2)?;
        writeln!(f)?;
        self.write_heating_ramp(f)?;
        writeln!(f)?;

        writeln!(
            f,
            "print \"EQUILIBRATION STAGE 3: NVT equilibration ({} ns)\"",
            Real(self.nvt_ns)
        )?;
        writeln!(f, "langevinPiston off")?;
        writeln!(f, "constraintScaling {}", Real(nvt_scaling))?;
        writeln!(f, "run {}", s.nvt_steps)?;
        writeln!(f)?;

        writeln!(
            f,
            "print \"EQUILIBRATION STAGE 4: NPT equilibration ({} ns)\"",
            Real(self.npt_ns)
        )?;
        writeln!(f, "langevinPiston on")?;
        writeln!(f, "constraintScaling {}", Real(npt_scaling))?;
        writeln!(f, "run {}", s.npt_steps / 2)?;
        writeln!(f)?;
        writeln!(f, "constraints off")?;
        writeln!(f, "run {}", s.npt_steps / 2)?;
        writeln!(f)
    }

    fn write_heating_ramp(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = Kelvin(self.system.temperature_k);
        let divisor = HEATING_RAMP_INCREMENTS * 2;

        match self.heating_ramp {
            RampStyle::Tcl => {
                writeln!(
                    f,
                    "for {{set i 0}} {{$i < {HEATING_RAMP_INCREMENTS}}} {{incr i}} {{"
                )?;
                writeln!(
                    f,
                    "    set temp [expr {t} * 0.5 + ({t} * 0.5) * $i / {}]",
                    Real(HEATING_RAMP_INCREMENTS as f64)
                )?;
                writeln!(f, "    langevinTemp $temp")?;
                writeln!(f, "    langevinPistonTemp $temp")?;
                writeln!(f, "    run [expr {} / {divisor}]", self.schedule.heat_steps)?;
                writeln!(f, "}}")
            }
            RampStyle::Expanded => {
                let steps = self.schedule.heat_steps / divisor;
                for temp in heating_ramp_temperatures(self.system.temperature_k) {
                    writeln!(f, "langevinTemp {}", Real(temp))?;
                    writeln!(f, "langevinPistonTemp {}", Real(temp))?;
                    writeln!(f, "run {steps}")?;
                }
                Ok(())
            }
        }
    }

    fn write_production(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = &self.schedule;
        let freq = s.output_freq_steps;

        section(f, "PRODUCTION MD")?;
        writeln!(
            f,
            "print \"PRODUCTION: {} ns at {}K\"",
            self.production_ns,
            Kelvin(self.system.temperature_k)
        )?;
        writeln!(f)?;
        writeln!(f, "dcdfreq {freq}")?;
        writeln!(f, "xstFreq {freq}")?;
        writeln!(f, "restartfreq {freq}")?;
        writeln!(f, "outputEnergies {freq}")?;
        writeln!(f)?;
        writeln!(f, "run {}", s.total_production_steps)?;
        writeln!(f)?;
        writeln!(f, "print \"COMPLETE: {}\"", self.output_name())
    }
}

impl Display for NamdConfig<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_banner(f)?;
        self.write_input(f)?;
        self.write_output(f)?;
        self.write_integration(f)?;
        self.write_nonbonded(f)?;
        self.write_ensemble(f)?;
        self.write_performance(f)?;
        self.write_equilibration(f)?;
        self.write_production(f)
    }
}

/// Thermostat targets of the heating ramp: `T/2 + (T/2)·i/10` for `i` in `0..10`.
pub fn heating_ramp_temperatures(target_k: f64) -> impl Iterator<Item = f64> {
    let half = target_k * 0.5;
    (0..HEATING_RAMP_INCREMENTS)
        .map(move |i| half + half * i as f64 / HEATING_RAMP_INCREMENTS as f64)
}

fn section(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "## {title}")?;
    writeln!(f, "{RULE}")
}
