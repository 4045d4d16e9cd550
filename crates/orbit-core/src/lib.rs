//! Shared stage framework for the orbit-engine pipeline.
//!
//! Every stage crate (`tle-ingest`, `orbital-mechanics`,
//! `coordinate-transform`, `link-feasibility`, `signal-analysis`,
//! `event-detection`) depends on this crate for its `StageProcessor` /
//! `StageValidator` implementation, its error type, its validation-snapshot
//! schema, and its cited constants — rather than each reinventing these.

pub mod almanac;
pub mod config;
pub mod constants;
pub mod error;
pub mod snapshot;
pub mod stage;
pub mod workers;

pub use error::{PipelineError, Result};
