use super::system::{SizeClass, SystemSpec};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CatalogError {
    #[error("Catalog contains no systems")]
    Empty,

    #[error("Duplicate system name in catalog: '{0}'")]
    DuplicateName(String),

    #[error("Invalid system name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("System '{name}' has a non-positive or non-finite temperature")]
    InvalidTemperature { name: String },
}

/// The validated, ordered set of systems a batch is generated for.
///
/// Declaration order is preserved and defines the order of generated files and manifest rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    systems: Vec<SystemSpec>,
}

impl Catalog {
    pub fn new(systems: Vec<SystemSpec>) -> Result<Self, CatalogError> {
        if systems.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(systems.len());
        for system in &systems {
            validate_name(&system.name)?;
            if !(system.temperature_k.is_finite() && system.temperature_k > 0.0) {
                return Err(CatalogError::InvalidTemperature {
                    name: system.name.clone(),
                });
            }
            if !seen.insert(system.name.as_str()) {
                return Err(CatalogError::DuplicateName(system.name.clone()));
            }
        }

        Ok(Self { systems })
    }

    /// The built-in 25-system catalog: thirteen structural regimes at 300 K and 350 K, with the
    /// large regime 8 domain at 300 K only.
    pub fn reference() -> Self {
        let systems = REFERENCE_SYSTEMS
            .iter()
            .map(|&(name, temperature, size)| SystemSpec::new(name, temperature, size))
            .collect();
        Self { systems }
    }

    pub fn systems(&self) -> &[SystemSpec] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SystemSpec> {
        self.systems.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SystemSpec> {
        self.systems.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SystemSpec;
    type IntoIter = std::slice::Iter<'a, SystemSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.systems.iter()
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name contains whitespace"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name is a relative path component"));
    }
    Ok(())
}

const REFERENCE_SYSTEMS: [(&str, f64, SizeClass); 25] = [
    ("regime0_1RC7_300K", 300.0, SizeClass::Small),
    ("regime0_1RC7_350K", 350.0, SizeClass::Small),
    ("regime1_1A60_300K", 300.0, SizeClass::Small),
    ("regime1_1A60_350K", 350.0, SizeClass::Small),
    ("regime2_165D_300K", 300.0, SizeClass::Tiny),
    ("regime2_165D_350K", 350.0, SizeClass::Tiny),
    ("regime3_1K8W_300K", 300.0, SizeClass::Tiny),
    ("regime3_1K8W_350K", 350.0, SizeClass::Tiny),
    ("regime4_1LNG_300K", 300.0, SizeClass::Medium),
    ("regime4_1LNG_350K", 350.0, SizeClass::Medium),
    ("regime5_1E7K_300K", 300.0, SizeClass::Small),
    ("regime5_1E7K_350K", 350.0, SizeClass::Small),
    ("regime6_1KXK_300K", 300.0, SizeClass::Medium),
    ("regime6_1KXK_350K", 350.0, SizeClass::Medium),
    ("regime7_1IDV_300K", 300.0, SizeClass::Tiny),
    ("regime7_1IDV_350K", 350.0, SizeClass::Tiny),
    ("regime8_regime8_domain_300K", 300.0, SizeClass::Xlarge),
    ("regime9_1DRZ_300K", 300.0, SizeClass::Medium),
    ("regime9_1DRZ_350K", 350.0, SizeClass::Medium),
    ("regime10_1MJI_300K", 300.0, SizeClass::Medium),
    ("regime10_1MJI_350K", 350.0, SizeClass::Medium),
    ("regime11_1HQ1_300K", 300.0, SizeClass::Medium),
    ("regime11_1HQ1_350K", 350.0, SizeClass::Medium),
    ("regime12_1KQ2_300K", 300.0, SizeClass::Tiny),
    ("regime12_1KQ2_350K", 350.0, SizeClass::Tiny),
];
