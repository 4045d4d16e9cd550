//! Stage 2 — Orbital Propagation.
//!
//! Generates a per-satellite TEME position/velocity time series over a
//! unified multi-constellation time window by SGP4 propagation (Vallado
//! 2013), consuming Stage 1's independently-parsed epoch as the time basis
//! and never re-parsing TLE text for it (spec §4.3).

pub mod config;
pub mod processor;
pub mod propagation;
pub mod time_window;
pub mod types;
pub mod validator;

pub use processor::{Stage2Core, Stage2Processor};
pub use types::{SatelliteTemeSeries, Stage2Metadata, Stage2Output, TemePoint};
pub use validator::Stage2Validator;
