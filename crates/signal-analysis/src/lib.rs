//! Stage 5: Signal Analysis (spec §4.6).
//!
//! Computes RSRP/RSRQ/RS-SINR, full-spectral-line ITU-R P.676-13
//! atmospheric loss, and line-of-sight Doppler for every satellite in each
//! constellation's already-optimized pool.

pub mod atmospheric;
pub mod config;
pub mod doppler;
pub mod link_budget;
pub mod processor;
pub mod scintillation;
pub mod types;
pub mod validator;

pub use processor::{Stage5Core, Stage5Processor};
pub use types::{AtmosphericLossBreakdown, SatelliteSignalSeries, SignalPoint, Stage5Metadata, Stage5Output};
pub use validator::Stage5Validator;
