//! Topocentric elevation/azimuth/range (spec §4.5.1).

use crate::refraction::apparent_elevation_deg;
use crate::site::GroundStationSite;
use anise::prelude::{Almanac, Orbit};
use orbit_core::{PipelineError, Result};

#[derive(Debug, Clone, Copy)]
pub struct Visibility {
    /// Refraction-corrected (apparent) elevation, degrees above local
    /// horizon.
    pub elevation_deg: f64,
    /// 0-360 deg, north = 0, clockwise.
    pub azimuth_deg: f64,
    /// Slant range, km.
    pub distance_km: f64,
}

/// Compute topocentric elevation/azimuth/range of `satellite_orbit` as seen
/// from `site`, at the orbit's own epoch. Delegates the SEZ (south-east-
/// zenith) topocentric transform to ANISE rather than a hand-rolled
/// rotation, per spec §4.4/§4.5.1, then applies the one correction ANISE's
/// routine does not itself model: tropospheric refraction.
pub fn topocentric_visibility(
    almanac: &Almanac,
    site: &GroundStationSite,
    satellite_orbit: Orbit,
) -> Result<Visibility> {
    let site_orbit = site.to_orbit(almanac, satellite_orbit.epoch)?;
    let az_el_range = almanac
        .azimuth_elevation_range_sez(site_orbit, satellite_orbit, None, None)
        .map_err(|e| PipelineError::CorruptInput(format!("azimuth_elevation_range_sez: {e}")))?;

    Ok(Visibility {
        elevation_deg: apparent_elevation_deg(az_el_range.elevation_deg),
        azimuth_deg: az_el_range.azimuth_deg,
        distance_km: az_el_range.range_km,
    })
}
