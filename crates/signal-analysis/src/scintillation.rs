//! ITU-R P.618-13 tropospheric scintillation (spec §4.6: "Additionally
//! compute scintillation using ITU-R P.618-13 (no hand-tuned polynomials)").
//!
//! Implements the Recommendation's own 7-step closed-form method (§2.4.1):
//! a reference-signal standard deviation derived from wet refractivity, an
//! antenna-averaging factor from the effective aperture and path geometry,
//! and a time-percentage factor a(p) whose coefficients are the
//! Recommendation's own published cubic-in-log10(p) fit — none of the
//! constants below were tuned for this pipeline.
//!
//! SOURCE: ITU-R P.618-13 (12/2017), §2.4.1.

use crate::atmospheric::{water_vapor_partial_pressure_hpa, AtmosphericState};

/// Height of the turbulent layer, meters. SOURCE: §2.4.1 step 2.
const TURBULENT_LAYER_HEIGHT_M: f64 = 1000.0;

/// Elevation floor below which the Recommendation's model is not validated;
/// mirrors the floor the atmospheric-loss module applies for the same
/// reason (grazing-incidence geometry breaks the closed-form fit).
const MIN_ELEVATION_DEG: f64 = 4.0;

/// Wet term of radio refractivity, ITU-R P.453, from the water vapor
/// partial pressure already computed for the P.676-13 atmospheric model.
/// SOURCE: §2.4.1 step 1.
fn wet_refractivity(state: &AtmosphericState) -> f64 {
    let e_hpa = water_vapor_partial_pressure_hpa(state);
    3.732e5 * e_hpa / state.temperature_k.powi(2)
}

/// Standard deviation of the reference signal (dB). SOURCE: §2.4.1 step 1.
fn reference_sigma_db(state: &AtmosphericState) -> f64 {
    3.6e-3 + wet_refractivity(state) * 1e-4
}

/// Effective path length through the turbulent layer (km). SOURCE: §2.4.1
/// step 2.
fn effective_path_length_km(elevation_rad: f64) -> f64 {
    let l_m = 2.0 * TURBULENT_LAYER_HEIGHT_M / ((elevation_rad.sin().powi(2) + 2.35e-4).sqrt() + elevation_rad.sin());
    l_m / 1000.0
}

/// Antenna averaging factor g(x). SOURCE: §2.4.1 steps 3-4.
fn antenna_averaging_factor(effective_diameter_m: f64, carrier_ghz: f64, path_length_km: f64) -> f64 {
    let x = 1.22 * effective_diameter_m.powi(2) * (carrier_ghz / path_length_km);
    let term1 = 3.86 * (x.powi(2) + 1.0).powf(11.0 / 12.0) * ((11.0 / 6.0) * (1.0 / x).atan()).sin();
    let term2 = 7.08 * x.powf(5.0 / 6.0);
    (term1 - term2).max(0.0).sqrt()
}

/// Time-percentage factor a(p), p in percent (Recommendation's valid range
/// 0.01 < p < 50). SOURCE: §2.4.1 step 6.
fn time_percentage_factor(exceedance_probability_percent: f64) -> f64 {
    let log_p = exceedance_probability_percent.log10();
    -0.061 * log_p.powi(3) + 0.072 * log_p.powi(2) - 1.71 * log_p + 3.0
}

/// Tropospheric-scintillation fade depth (dB) exceeded for
/// `exceedance_probability_percent` of the time. SOURCE: ITU-R P.618-13
/// §2.4.1, full 7-step method.
pub fn scintillation_fade_db(
    carrier_ghz: f64,
    elevation_deg: f64,
    antenna_diameter_m: f64,
    aperture_efficiency: f64,
    state: &AtmosphericState,
    exceedance_probability_percent: f64,
) -> f64 {
    let elevation_rad = elevation_deg.max(MIN_ELEVATION_DEG).to_radians();
    let sigma_ref = reference_sigma_db(state);
    let path_length_km = effective_path_length_km(elevation_rad);
    let effective_diameter_m = aperture_efficiency.sqrt() * antenna_diameter_m;
    let g_x = antenna_averaging_factor(effective_diameter_m, carrier_ghz, path_length_km);
    let sigma_db = sigma_ref * carrier_ghz.powf(7.0 / 12.0) * g_x / elevation_rad.sin().powf(1.2);
    sigma_db * time_percentage_factor(exceedance_probability_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typical_state() -> AtmosphericState {
        AtmosphericState {
            temperature_k: 288.15,
            pressure_hpa: 1013.25,
            water_vapor_density_g_m3: 7.5,
        }
    }

    #[test]
    fn fade_depth_is_positive_and_finite() {
        let state = typical_state();
        let fade = scintillation_fade_db(12.0, 30.0, 0.6, 0.55, &state, 1.0);
        assert!(fade.is_finite());
        assert!(fade > 0.0);
    }

    #[test]
    fn fade_depth_grows_at_lower_elevation() {
        let state = typical_state();
        let high_elevation = scintillation_fade_db(12.0, 70.0, 0.6, 0.55, &state, 1.0);
        let low_elevation = scintillation_fade_db(12.0, 10.0, 0.6, 0.55, &state, 1.0);
        assert!(low_elevation > high_elevation, "scintillation worsens at low elevation");
    }

    #[test]
    fn fade_depth_grows_with_smaller_exceedance_probability() {
        let state = typical_state();
        // Rarer (smaller p) exceedance events imply a deeper fade.
        let p01 = scintillation_fade_db(12.0, 30.0, 0.6, 0.55, &state, 0.1);
        let p1 = scintillation_fade_db(12.0, 30.0, 0.6, 0.55, &state, 1.0);
        assert!(p01 > p1);
    }

    #[test]
    fn larger_antenna_averages_out_more_scintillation() {
        let state = typical_state();
        let small_dish = scintillation_fade_db(12.0, 30.0, 0.3, 0.55, &state, 1.0);
        let large_dish = scintillation_fade_db(12.0, 30.0, 3.0, 0.55, &state, 1.0);
        assert!(large_dish < small_dish, "aperture averaging should reduce the fade depth");
    }
}
