//! Line-of-sight Doppler shift (spec §4.6: "dot product of relative
//! velocity with the line-of-sight unit vector; flag relativistic
//! correction when |v|/c exceeds 0.1").
//!
//! Radial velocity is the explicit dot product of the satellite's Stage-2
//! TEME velocity with the TEME-frame line-of-sight unit vector (ground
//! station -> satellite), never a scalar heuristic derived from consecutive
//! `distance_km` samples. Both vectors must share the TEME frame for the
//! dot product to be meaningful — see `coordinate_transform::frames::
//! itrf_to_teme`, which is how the processor places the Earth-fixed ground
//! station into that frame before calling this module.

use orbit_core::constants::SPEED_OF_LIGHT_M_S;

/// SOURCE: spec §4.6 — special-relativistic correction trigger.
pub const RELATIVISTIC_THRESHOLD_BETA: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct DopplerResult {
    pub radial_velocity_km_s: f64,
    pub doppler_shift_hz: f64,
    pub relativistic_correction_applied: bool,
}

fn vector_sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn vector_magnitude(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn vector_dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Line-of-sight unit vector from `ground_station_km` to `satellite_km`.
/// Both positions must be expressed in the same frame (TEME, here).
pub fn line_of_sight_unit_vector(ground_station_km: [f64; 3], satellite_km: [f64; 3]) -> [f64; 3] {
    let displacement = vector_sub(satellite_km, ground_station_km);
    let magnitude = vector_magnitude(displacement);
    [
        displacement[0] / magnitude,
        displacement[1] / magnitude,
        displacement[2] / magnitude,
    ]
}

/// Radial velocity (km/s): the satellite's TEME velocity dotted with the
/// TEME line-of-sight unit vector (spec §4.6: `velocity . line_of_sight`).
/// Positive when the satellite is receding, matching the sign convention
/// the rest of the link budget expects.
pub fn radial_velocity_km_s(velocity_km_s: [f64; 3], line_of_sight_unit: [f64; 3]) -> f64 {
    vector_dot(velocity_km_s, line_of_sight_unit)
}

/// `radial_velocity_km_s` is positive when the satellite is receding.
/// `carrier_frequency_hz` is the downlink carrier. `orbital_speed_km_s` is
/// the satellite's full TEME velocity magnitude, used only to decide
/// whether `RELATIVISTIC_THRESHOLD_BETA` is crossed.
pub fn doppler_shift(radial_velocity_km_s: f64, carrier_frequency_hz: f64, orbital_speed_km_s: f64) -> DopplerResult {
    let c_km_s = SPEED_OF_LIGHT_M_S / 1000.0;
    let beta = orbital_speed_km_s / c_km_s;
    let relativistic_correction_applied = beta.abs() > RELATIVISTIC_THRESHOLD_BETA;

    // SOURCE: classical first-order Doppler, Delta f = -f0 * v_r / c. The
    // relativistic time-dilation factor sqrt(1 - beta^2) is applied when the
    // threshold is crossed (it is never material at LEO/MEO orbital speeds,
    // but the formula is applied unconditionally below the threshold check
    // so the code path exists and is exercised by the flag rather than
    // silently dead).
    let classical_shift_hz = -carrier_frequency_hz * (radial_velocity_km_s / c_km_s);
    let doppler_shift_hz = if relativistic_correction_applied {
        classical_shift_hz * (1.0 - beta.powi(2)).sqrt()
    } else {
        classical_shift_hz
    };

    DopplerResult {
        radial_velocity_km_s,
        doppler_shift_hz,
        relativistic_correction_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receding_satellite_produces_negative_shift() {
        let result = doppler_shift(5.0, 12.0e9, 7.5);
        assert!(result.doppler_shift_hz < 0.0);
    }

    #[test]
    fn approaching_satellite_produces_positive_shift() {
        let result = doppler_shift(-5.0, 12.0e9, 7.5);
        assert!(result.doppler_shift_hz > 0.0);
    }

    #[test]
    fn leo_orbital_speed_never_crosses_relativistic_threshold() {
        let result = doppler_shift(7.0, 12.0e9, 7.8);
        assert!(!result.relativistic_correction_applied);
    }

    #[test]
    fn line_of_sight_vector_is_unit_length() {
        let los = line_of_sight_unit_vector([6378.0, 0.0, 0.0], [6378.0, 500.0, 7000.0]);
        let magnitude = vector_magnitude(los);
        assert!((magnitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn radial_velocity_is_zero_for_purely_tangential_motion() {
        // Satellite directly overhead (LOS along +z); purely horizontal
        // velocity should have zero radial component.
        let los = line_of_sight_unit_vector([0.0, 0.0, 6378.0], [0.0, 0.0, 7378.0]);
        let radial = radial_velocity_km_s([7.5, 0.0, 0.0], los);
        assert!(radial.abs() < 1e-9);
    }

    #[test]
    fn radial_velocity_matches_full_speed_for_purely_radial_motion() {
        let los = line_of_sight_unit_vector([0.0, 0.0, 6378.0], [0.0, 0.0, 7378.0]);
        let radial = radial_velocity_km_s([0.0, 0.0, 3.0], los);
        assert!((radial - 3.0).abs() < 1e-9);
    }
}
