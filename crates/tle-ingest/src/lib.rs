//! Stage 1 — TLE Loading.
//!
//! Parses per-constellation TLE files, independently derives each
//! satellite's epoch, runs epoch-distribution analysis, and applies the
//! optional epoch filter and deterministic sampling (spec.md §4.2).

pub mod config;
pub mod constants;
pub mod epoch_analysis;
pub mod filter;
pub mod loader;
pub mod parse;
pub mod processor;
pub mod types;
pub mod validator;

pub use processor::{Stage1Core, Stage1Processor};
pub use types::{Constellation, SatelliteRecord, Stage1Output};
pub use validator::Stage1Validator;
