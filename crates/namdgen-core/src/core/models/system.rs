use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coarse size bucket of a molecular system.
///
/// The size class only drives performance tuning (PME grid, pair list, patch size); it has no
/// influence on temperature or on the equilibration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Tiny,
    Small,
    Medium,
    Xlarge,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Tiny,
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Xlarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Tiny => "tiny",
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Xlarge => "xlarge",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown size class '{0}' (expected one of: tiny, small, medium, xlarge)")]
pub struct ParseSizeClassError(pub String);

impl FromStr for SizeClass {
    type Err = ParseSizeClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(SizeClass::Tiny),
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "xlarge" => Ok(SizeClass::Xlarge),
            _ => Err(ParseSizeClassError(s.to_string())),
        }
    }
}

/// One prepared molecular system at one target temperature.
///
/// The `name` doubles as the stem of every file derived from the system (topology, coordinates,
/// generated configs) and as the input of the seed hash, so it must be unique within a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSpec {
    pub name: String,
    pub temperature_k: f64,
    pub size_class: SizeClass,
}

impl SystemSpec {
    pub fn new(name: impl Into<String>, temperature_k: f64, size_class: SizeClass) -> Self {
        Self {
            name: name.into(),
            temperature_k,
            size_class,
        }
    }

    /// File name of the generated config for one replica, e.g. `sys_rep03.namd`.
    pub fn config_file_name(&self, replica: u32) -> String {
        format!("{}.namd", self.output_name(replica))
    }

    /// NAMD `outputName` stem for one replica, e.g. `sys_rep03`.
    pub fn output_name(&self, replica: u32) -> String {
        format!("{}_rep{:02}", self.name, replica)
    }
}
