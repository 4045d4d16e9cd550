//! Stage 3: Coordinate Transformation (spec §4.4).
//!
//! Converts Stage 2's TEME state series into WGS84 geodetic (latitude,
//! longitude, altitude) points via a cited GAST/polar-motion rotation into
//! ITRF followed by ANISE's own geodetic-ellipsoid accessors.

pub mod config;
pub mod frames;
pub mod geodetic;
pub mod processor;
pub mod types;
pub mod validator;

pub use processor::{Stage3Core, Stage3Processor};
pub use types::{GeodeticPoint, SatelliteGeodeticSeries, Stage3Metadata, Stage3Output};
pub use validator::Stage3Validator;
