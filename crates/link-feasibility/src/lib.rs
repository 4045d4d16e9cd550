//! Stage 4: Link Feasibility & Pool Optimization (spec §4.5).
//!
//! The largest, most algorithmically rich stage: per-timestep topocentric
//! visibility against a single configurable ground station, epoch
//! validation, candidate-pool identification, and greedy Set-Cover pool
//! optimization with an azimuth-diversity tie-break.

pub mod config;
pub mod diversity;
pub mod epoch_validation;
pub mod pool_optimization;
pub mod processor;
pub mod types;
pub mod validator;
pub mod visibility;

pub use processor::{Stage4Core, Stage4Processor};
pub use types::{ConstellationPool, FeasibilityPoint, SatelliteFeasibilitySeries, Stage4Metadata, Stage4Output};
pub use validator::Stage4Validator;
