//! # namdgen Core Library
//!
//! A deterministic generator of NAMD control files for replica batches of molecular-dynamics
//! trajectories. Every generated file encodes the same staged equilibration protocol followed
//! by a production run, with performance parameters tuned to the declared size of the system.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the synthesis logic stays a pure,
//! easily testable function of its explicit inputs.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`SystemSpec`, `Catalog`,
//!   `SizeProfile`), the stable name hash, and I/O: the NAMD document renderer, the metadata
//!   manifest codec, and the sinks that receive generated files.
//!
//! - **[`engine`]: The Logic Core.** Global parameters and their validation, the step schedule
//!   derived from them, and the configuration synthesizer that maps one
//!   `(system, replica)` pair to a finished document and its manifest entry.
//!
//! - **[`workflows`]: The Public API.** The run driver that walks the catalog × replica space in
//!   a fixed order and hands every result to a sink.

pub mod core;
pub mod engine;
pub mod workflows;
