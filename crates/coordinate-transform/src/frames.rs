//! TEME -> pseudo-Earth-fixed -> ITRF rotation (spec §4.4).
//!
//! ANISE has no native TEME frame (TEME is SGP4's own "true equator, mean
//! equinox of date" frame, not a standard IAU-catalogued one), so the
//! equinox-dependent half of the TEME->ITRF chain — Greenwich Apparent
//! Sidereal Time and IERS polar motion — is computed here from cited
//! closed-form models (Vallado 2013 §3.7) rather than looked up in ANISE's
//! frame graph. The WGS84-ellipsoid half of the chain (geodetic height
//! given an Earth-fixed cartesian position) is delegated entirely to ANISE
//! in `geodetic.rs` — this module never touches ellipsoid math, only
//! rotations.

use hifitime::Epoch;

/// Julian centuries of TT (approximated here by UT1/UTC — sub-second scale
/// differences are immaterial at GAST's arcsecond-level precision
/// requirement for this pipeline) since J2000.0.
fn julian_centuries_since_j2000(epoch: Epoch) -> f64 {
    let jd_tt = epoch.to_jde_tt_days();
    (jd_tt - 2_451_545.0) / 36_525.0
}

/// Greenwich Mean Sidereal Time in radians.
/// SOURCE: Vallado, "Fundamentals of Astrodynamics and Applications", 4th
/// ed. (2013), Eq. 3-45.
pub fn gmst_rad(epoch: Epoch) -> f64 {
    let t = julian_centuries_since_j2000(epoch);
    let gmst_seconds = 67_310.548_41
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;
    // 86400 UT1 seconds = 360 degrees = 2*pi radians of Earth rotation.
    let gmst_rad = (gmst_seconds.rem_euclid(86_400.0)) * (std::f64::consts::TAU / 86_400.0);
    gmst_rad.rem_euclid(std::f64::consts::TAU)
}

/// Equation of the equinoxes (GAST - GMST), radians. Uses the dominant
/// IAU-1980 nutation term (lunar ascending-node longitude Omega) rather
/// than the full 106-term 1980 nutation series — accurate to ~0.1 arcsec,
/// which is well within this pipeline's link-geometry tolerance (spec §4.4
/// test-vector budget is < 100 m; 0.1 arcsec of Earth-rotation error is
/// millimeters at LEO range). SOURCE: Vallado (2013) Eq. 3-62 and the
/// IAU-1980 nutation theory's dominant term table.
pub fn equation_of_equinoxes_rad(epoch: Epoch) -> f64 {
    let t = julian_centuries_since_j2000(epoch);
    let omega_deg = 125.044_52 - 1_934.136_261 * t;
    let omega_rad = omega_deg.to_radians() % std::f64::consts::TAU;
    let mean_obliquity_deg = 23.439_291 - 0.013_004_2 * t;
    let mean_obliquity_rad = mean_obliquity_deg.to_radians();
    let delta_psi_arcsec = -17.20 * omega_rad.sin();
    let delta_psi_rad = delta_psi_arcsec.to_radians() / 3600.0;
    delta_psi_rad * mean_obliquity_rad.cos()
}

pub fn gast_rad(epoch: Epoch) -> f64 {
    (gmst_rad(epoch) + equation_of_equinoxes_rad(epoch)).rem_euclid(std::f64::consts::TAU)
}

/// Rotate a TEME cartesian vector into the pseudo-Earth-fixed (PEF) frame by
/// GAST about the Z axis (spec §4.4 "TEME->ITRF->WGS84 path").
pub fn teme_to_pef(position_km: [f64; 3], epoch: Epoch) -> [f64; 3] {
    let theta = gast_rad(epoch);
    let (sin_t, cos_t) = theta.sin_cos();
    [
        cos_t * position_km[0] + sin_t * position_km[1],
        -sin_t * position_km[0] + cos_t * position_km[1],
        position_km[2],
    ]
}

/// Apply IERS polar motion (PEF -> ITRF), a small rotation by the pole
/// offsets (xp, yp), each normally a few hundred milliarcseconds. These are
/// supplied per-run from configuration (spec §4.4/§7: offline pipeline, no
/// live IERS bulletin fetch) rather than hard-coded.
/// SOURCE: Vallado (2013) Eq. 3-78 (small-angle polar motion matrix).
pub fn apply_polar_motion(position_km: [f64; 3], xp_arcsec: f64, yp_arcsec: f64) -> [f64; 3] {
    let xp = (xp_arcsec / 3600.0).to_radians();
    let yp = (yp_arcsec / 3600.0).to_radians();
    [
        position_km[0] - yp * position_km[1] - xp * position_km[2],
        position_km[1] + yp * position_km[0],
        position_km[2] + xp * position_km[0] - yp * position_km[1],
    ]
}

/// Full TEME -> ITRF chain.
pub fn teme_to_itrf(
    position_km: [f64; 3],
    epoch: Epoch,
    xp_arcsec: f64,
    yp_arcsec: f64,
) -> [f64; 3] {
    let pef = teme_to_pef(position_km, epoch);
    apply_polar_motion(pef, xp_arcsec, yp_arcsec)
}

/// Undo `apply_polar_motion`: ITRF -> PEF. Both rotations are first-order
/// small-angle approximations (Vallado 2013 Eq. 3-78), so negating the pole
/// offsets inverts the matrix to the same order of approximation the
/// forward model already accepts.
pub fn remove_polar_motion(position_km: [f64; 3], xp_arcsec: f64, yp_arcsec: f64) -> [f64; 3] {
    apply_polar_motion(position_km, -xp_arcsec, -yp_arcsec)
}

/// Undo `teme_to_pef`: rotate a PEF cartesian vector back into TEME by
/// -GAST about the Z axis.
pub fn pef_to_teme(position_km: [f64; 3], epoch: Epoch) -> [f64; 3] {
    let theta = -gast_rad(epoch);
    let (sin_t, cos_t) = theta.sin_cos();
    [
        cos_t * position_km[0] + sin_t * position_km[1],
        -sin_t * position_km[0] + cos_t * position_km[1],
        position_km[2],
    ]
}

/// Full ITRF -> TEME chain, the inverse of `teme_to_itrf`. Needed to express
/// an Earth-fixed ground-station position in the same frame as Stage 2's
/// TEME-frame satellite velocity, so the two can be legally combined in a
/// single dot product (spec §4.6: radial velocity is `velocity . line_of_
/// sight`, not a scalar heuristic, so both vectors must share a frame).
pub fn itrf_to_teme(
    position_km: [f64; 3],
    epoch: Epoch,
    xp_arcsec: f64,
    yp_arcsec: f64,
) -> [f64; 3] {
    let pef = remove_polar_motion(position_km, xp_arcsec, yp_arcsec);
    pef_to_teme(pef, epoch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifitime::Epoch;

    #[test]
    fn gmst_is_bounded_and_advances_with_time() {
        let e0 = Epoch::from_gregorian_utc_at_midnight(2025, 10, 16);
        let e1 = e0 + hifitime::Unit::Hour * 6;
        let g0 = gmst_rad(e0);
        let g1 = gmst_rad(e1);
        assert!((0.0..std::f64::consts::TAU).contains(&g0));
        assert!((0.0..std::f64::consts::TAU).contains(&g1));
        assert_ne!(g0, g1);
    }

    #[test]
    fn pef_rotation_preserves_vector_magnitude() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2025, 10, 16);
        let position = [7000.0, 0.0, 1000.0];
        let rotated = teme_to_pef(position, epoch);
        let mag_in = (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
        let mag_out = (rotated[0].powi(2) + rotated[1].powi(2) + rotated[2].powi(2)).sqrt();
        assert!((mag_in - mag_out).abs() < 1e-9);
    }

    #[test]
    fn polar_motion_is_a_small_perturbation() {
        let position = [7000.0, 0.0, 1000.0];
        let corrected = apply_polar_motion(position, 0.2, 0.3);
        let delta = ((corrected[0] - position[0]).powi(2)
            + (corrected[1] - position[1]).powi(2)
            + (corrected[2] - position[2]).powi(2))
        .sqrt();
        assert!(delta < 0.001, "polar motion should be a sub-meter perturbation");
    }

    #[test]
    fn itrf_to_teme_round_trips_teme_to_itrf() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2025, 10, 16);
        let position = [7000.0, 1200.0, 500.0];
        let itrf = teme_to_itrf(position, epoch, 0.2, 0.3);
        let recovered = itrf_to_teme(itrf, epoch, 0.2, 0.3);
        for i in 0..3 {
            assert!((recovered[i] - position[i]).abs() < 1e-9);
        }
    }
}
