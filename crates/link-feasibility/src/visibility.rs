//! Per-timestep visibility (spec §4.5.1).

use crate::config::{LinkBudgetConfig, LinkQualityBins, Stage4Config};
use crate::types::{FeasibilityPoint, LinkQuality};
use anise::prelude::{Almanac, Orbit};
use coordinate_transform::GeodeticPoint;
use ground_station::topocentric_visibility;
use orbit_core::almanac::chrono_to_hifitime;
use orbit_core::constants::WGS84_SEMI_MAJOR_AXIS_KM;
use orbit_core::Result;
use tle_ingest::Constellation;

/// An ITRF-frame satellite orbit is needed for the topocentric transform;
/// Stage 3 only kept geodetic coordinates (lat/lon/alt), so this
/// reconstructs an Earth-fixed cartesian position from them using the same
/// ANISE ellipsoid constructor as `ground_station::GroundStationSite`,
/// rather than re-deriving ECEF with hand-rolled trigonometry.
fn satellite_orbit(almanac: &Almanac, point: &GeodeticPoint) -> Result<Orbit> {
    let epoch = chrono_to_hifitime(point.timestamp);
    let frame = almanac
        .frame_from_uid(anise::constants::frames::EARTH_ITRF93)
        .map_err(|e| {
            orbit_core::PipelineError::CorruptInput(format!("EARTH_ITRF93 frame lookup: {e}"))
        })?;
    Orbit::try_latlonalt(
        point.latitude_deg,
        point.longitude_deg,
        point.altitude_km,
        0.0,
        epoch,
        frame,
    )
    .map_err(|e| orbit_core::PipelineError::CorruptInput(format!("satellite orbit: {e}")))
}

fn classify_link_quality(
    elevation_deg: f64,
    distance_km: f64,
    is_connectable: bool,
    bins: &LinkQualityBins,
) -> LinkQuality {
    if !is_connectable {
        return LinkQuality::Unavailable;
    }
    if elevation_deg >= bins.excellent_min_elevation_deg
        && distance_km <= bins.excellent_max_distance_km
    {
        LinkQuality::Excellent
    } else if elevation_deg >= bins.good_min_elevation_deg && distance_km <= bins.good_max_distance_km
    {
        LinkQuality::Good
    } else if elevation_deg >= bins.fair_min_elevation_deg {
        LinkQuality::Fair
    } else {
        LinkQuality::Poor
    }
}

fn is_connectable(
    elevation_deg: f64,
    distance_km: f64,
    threshold_deg: f64,
    link_budget: &LinkBudgetConfig,
) -> bool {
    elevation_deg >= threshold_deg
        && distance_km >= link_budget.min_distance_km
        && distance_km <= link_budget.max_distance_km
}

/// Compute one `FeasibilityPoint` for a single Stage-3 geodetic point.
pub fn feasibility_point(
    almanac: &Almanac,
    config: &Stage4Config,
    constellation: Constellation,
    point: &GeodeticPoint,
) -> Result<FeasibilityPoint> {
    let orbit = satellite_orbit(almanac, point)?;
    let visibility = topocentric_visibility(almanac, &config.ground_station, orbit)?;

    let threshold = config.threshold_for(constellation);
    let connectable = is_connectable(
        visibility.elevation_deg,
        visibility.distance_km,
        threshold,
        &config.link_budget,
    );
    let link_quality = classify_link_quality(
        visibility.elevation_deg,
        visibility.distance_km,
        connectable,
        &config.link_quality_bins,
    );

    Ok(FeasibilityPoint {
        timestamp: point.timestamp,
        latitude_deg: point.latitude_deg,
        longitude_deg: point.longitude_deg,
        altitude_km: point.altitude_km,
        elevation_deg: visibility.elevation_deg,
        azimuth_deg: visibility.azimuth_deg,
        distance_km: visibility.distance_km,
        is_connectable: connectable,
        elevation_threshold: threshold,
        link_quality,
    })
}

/// Sanity bound used by the validator: Earth-fixed cartesian magnitude
/// should never collapse to less than the WGS84 semi-major axis itself
/// (would indicate a degenerate/zero altitude bug upstream).
pub fn plausible_orbit(position_km: [f64; 3]) -> bool {
    let r = (position_km[0].powi(2) + position_km[1].powi(2) + position_km[2].powi(2)).sqrt();
    r > WGS84_SEMI_MAJOR_AXIS_KM
}
