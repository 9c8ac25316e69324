//! Foundational data models, utilities, and I/O for config generation.

pub mod io;
pub mod models;
pub mod utils;
