use crate::cli::CatalogArgs;
use crate::config::PartialGenerationConfig;
use crate::error::Result;
use namdgen::core::models::catalog::Catalog;
use namdgen::core::models::profile::SizeProfile;
use namdgen::engine::synthesizer::replica_seed;
use std::fmt::Write;

pub fn run(args: CatalogArgs) -> Result<()> {
    let partial = PartialGenerationConfig::load(args.config.as_deref())?;
    let config = partial.merge_with_cli(&Default::default())?;
    print!("{}", render_table(&config.catalog));
    Ok(())
}

/// One row per system: temperature, size class, its performance tier and the replica-0 seed.
pub(crate) fn render_table(catalog: &Catalog) -> String {
    let width = catalog
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("SYSTEM".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>6}  {:<6}  {:>4}  {:>8}  {:>5}  {:>6}",
        "SYSTEM", "TEMP", "SIZE", "PME", "PAIRLIST", "PATCH", "SEED"
    );
    for system in catalog {
        let profile = SizeProfile::from(system.size_class);
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:<6}  {:>4.1}  {:>8.1}  {:>5.1}  {:>6}",
            system.name,
            format!("{}K", system.temperature_k),
            system.size_class,
            profile.pme_grid_spacing,
            profile.pairlist_distance,
            profile.patch_dimension,
            replica_seed(&system.name, 0),
        );
    }
    let _ = writeln!(out, "{} systems", catalog.len());
    out
}
