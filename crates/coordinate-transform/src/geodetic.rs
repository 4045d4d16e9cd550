//! ITRF cartesian -> WGS84 geodetic, delegated to ANISE (spec §4.4: "the
//! IAU-standard astronomy library's TEME->ITRF->WGS84 path, not ad-hoc
//! rotation matrices"). Everything upstream of this module (`frames.rs`)
//! produces an Earth-fixed cartesian position; this module's only job is to
//! hand that position to ANISE tagged as the ITRF93 frame and read back its
//! own geodetic-ellipsoid accessors — no manual oblate-spheroid iteration.

use anise::constants::frames::EARTH_ITRF93;
use anise::math::Vector6;
use anise::prelude::{Almanac, Orbit};
use hifitime::Epoch;
use orbit_core::{PipelineError, Result};

/// Build an ANISE `Orbit` for an Earth-fixed (ITRF) cartesian position and
/// read its WGS84 geodetic latitude/longitude/height.
///
/// Velocity is not known at this point in the chain (only position is
/// rotated through `frames::teme_to_itrf`) and is not needed for a
/// geodetic-position query, so it is passed as zero; ANISE's geodetic
/// accessors only consult position and the frame's ellipsoid shape.
pub fn itrf_to_geodetic(
    almanac: &Almanac,
    position_km: [f64; 3],
    epoch: Epoch,
) -> Result<(f64, f64, f64)> {
    let pos_vel = Vector6::new(
        position_km[0],
        position_km[1],
        position_km[2],
        0.0,
        0.0,
        0.0,
    );
    let frame = almanac
        .frame_from_uid(EARTH_ITRF93)
        .map_err(|e| PipelineError::CorruptInput(format!("EARTH_ITRF93 frame lookup: {e}")))?;
    let orbit = Orbit::from_cartesian_pos_vel(pos_vel, epoch, frame);

    let latitude_deg = orbit
        .latitude_deg()
        .map_err(|e| PipelineError::CorruptInput(format!("geodetic latitude: {e}")))?;
    let longitude_deg = orbit.longitude_deg();
    let height_km = orbit
        .height_km()
        .map_err(|e| PipelineError::CorruptInput(format!("geodetic height: {e}")))?;

    Ok((latitude_deg, longitude_deg, height_km))
}

#[cfg(test)]
mod tests {
    // Exercised indirectly by `processor` integration tests, which need a
    // loaded `Almanac`; a unit test here would require shipping ephemeris
    // kernel fixtures this crate does not otherwise depend on.
}
