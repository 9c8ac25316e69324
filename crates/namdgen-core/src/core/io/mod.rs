//! Provides output functionality for generated NAMD configurations.
//!
//! This module renders NAMD control files, serializes the tab-separated metadata manifest
//! that accompanies a batch, and defines the sink abstraction the run driver writes through,
//! along with its file-system implementation.

pub mod directory;
pub mod manifest;
pub mod namd;
pub mod traits;
