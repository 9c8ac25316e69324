//! # Engine Module
//!
//! The configuration synthesis engine: everything needed to turn one declared system and one
//! replica index into a finished NAMD control file.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Batch-wide parameters, their defaults and validation
//! - **Step Schedule** ([`schedule`]) - Step counts derived from durations and the timestep
//! - **Synthesis** ([`synthesizer`]) - Seed derivation and assembly of a [`synthesizer::RunRecord`]
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Synthesis is a pure function of its explicit inputs; all file-system effects live behind
//! the sinks in [`crate::core::io`].

pub mod config;
pub mod error;
pub mod progress;
pub mod schedule;
pub mod synthesizer;
