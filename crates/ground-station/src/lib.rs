//! Single configurable ground-station site model and topocentric visibility
//! geometry, shared by `link-feasibility` and `signal-analysis` (spec §4.5.1,
//! §9 Non-goals: a single site, never a multi-site network).

pub mod constants;
pub mod geometry;
pub mod refraction;
pub mod site;

pub use geometry::{topocentric_visibility, Visibility};
pub use site::GroundStationSite;
