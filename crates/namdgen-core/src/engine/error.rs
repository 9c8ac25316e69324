use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::manifest::ManifestError;
use crate::core::models::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest error: {source}")]
    Manifest {
        #[from]
        source: ManifestError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
