use super::config::GlobalParams;
use super::schedule::StepSchedule;
use crate::core::io::manifest::ManifestEntry;
use crate::core::io::namd::NamdConfig;
use crate::core::models::profile::SizeProfile;
use crate::core::models::system::SystemSpec;
use crate::core::utils::hash::stable_hash;

pub const SEED_BASE: u64 = 12_345;
pub const SEED_REPLICA_STRIDE: u64 = 1_000;
pub const SEED_NAME_MODULUS: u64 = 1_000;

/// One generated config: the document text plus the metadata row describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub document: String,
    pub entry: ManifestEntry,
    pub seed: u64,
}

/// Random seed of one replica: `12345 + replica·1000 + (fnv1a64(name) mod 1000)`.
///
/// Replica seeds of one system are spaced [`SEED_REPLICA_STRIDE`] apart and never collide; the
/// name term uses [`stable_hash`], so seeds are reproducible across processes.
pub fn replica_seed(system_name: &str, replica: u32) -> u64 {
    SEED_BASE
        + u64::from(replica) * SEED_REPLICA_STRIDE
        + stable_hash(system_name) % SEED_NAME_MODULUS
}

/// Resolves every parameter of one `(system, replica)` pair into a [`NamdConfig`].
pub fn resolve<'a>(
    system: &'a SystemSpec,
    replica: u32,
    params: &'a GlobalParams,
) -> NamdConfig<'a> {
    debug_assert!(
        replica < params.replicas,
        "replica index {replica} outside 0..{}",
        params.replicas
    );

    NamdConfig {
        system,
        replica,
        seed: replica_seed(&system.name, replica),
        production_ns: params.production_ns,
        timestep_fs: params.timestep_fs,
        heat_ns: params.heat_ns,
        nvt_ns: params.nvt_ns,
        npt_ns: params.npt_ns,
        schedule: StepSchedule::from_params(params),
        profile: SizeProfile::for_class(system.size_class),
        topology_dir: &params.topology_dir,
        heating_ramp: params.heating_ramp,
    }
}

/// Produces the config document and manifest entry for one replica of one system.
///
/// Pure and total: identical inputs always give a byte-identical document.
pub fn synthesize(system: &SystemSpec, replica: u32, params: &GlobalParams) -> RunRecord {
    let config = resolve(system, replica, params);
    RunRecord {
        document: config.render(),
        entry: ManifestEntry {
            file_name: system.config_file_name(replica),
            size_class: system.size_class,
            temperature_k: system.temperature_k,
        },
        seed: config.seed,
    }
}
