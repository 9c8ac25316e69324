//! Immutable descriptions of the simulated systems.
//!
//! A [`system::SystemSpec`] names one prepared molecular system together with its target
//! temperature and coarse size class. The [`catalog::Catalog`] is the validated, ordered list of
//! systems that a batch is generated for, and [`profile::SizeProfile`] holds the performance
//! parameters selected by each size class.

pub mod catalog;
pub mod profile;
pub mod system;
