//! Single configurable ground-station site (spec §9 Non-goals: "support for
//! ground stations beyond a single configurable site").

use crate::constants::EARTH_ANGULAR_VELOCITY_RAD_S;
use anise::constants::frames::EARTH_ITRF93;
use anise::prelude::{Almanac, Orbit};
use hifitime::Epoch;
use orbit_core::{PipelineError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundStationSite {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl GroundStationSite {
    /// Construct this site's Earth-fixed `Orbit` at `epoch`, via ANISE's own
    /// geodetic-to-cartesian constructor (the inverse of the accessor used in
    /// `coordinate-transform::geodetic`) — never a hand-rolled ellipsoid
    /// conversion.
    pub fn to_orbit(&self, almanac: &Almanac, epoch: Epoch) -> Result<Orbit> {
        let frame = almanac
            .frame_from_uid(EARTH_ITRF93)
            .map_err(|e| PipelineError::CorruptInput(format!("EARTH_ITRF93 frame lookup: {e}")))?;
        Orbit::try_latlonalt(
            self.latitude_deg,
            self.longitude_deg,
            self.altitude_km,
            EARTH_ANGULAR_VELOCITY_RAD_S,
            epoch,
            frame,
        )
        .map_err(|e| PipelineError::CorruptInput(format!("ground station orbit: {e}")))
    }
}
