//! Free-space path loss, receiver noise floor, and the 3GPP NR signal
//! quality metrics (spec §4.6: "RSRP/RSRQ/RS-SINR per 3GPP TS 38.214/38.215,
//! no clipping — physical values are preserved for research use").

use orbit_core::constants::BOLTZMANN_CONSTANT_J_K;

/// SOURCE: ITU-R P.525-4 free-space basic transmission loss,
/// Lbf = 20*log10(d_km) + 20*log10(f_GHz) + 92.45.
pub fn free_space_path_loss_db(distance_km: f64, frequency_ghz: f64) -> f64 {
    20.0 * distance_km.log10() + 20.0 * frequency_ghz.log10() + 92.45
}

/// Receiver antenna gain for a parabolic dish. SOURCE: standard antenna-gain
/// relation G = eta * (pi*D*f/c)^2, expressed in dB.
pub fn parabolic_antenna_gain_db(diameter_m: f64, frequency_hz: f64, aperture_efficiency: f64) -> f64 {
    let c = orbit_core::constants::SPEED_OF_LIGHT_M_S;
    let wavelength_m = c / frequency_hz;
    let gain_linear = aperture_efficiency * (std::f64::consts::PI * diameter_m / wavelength_m).powi(2);
    10.0 * gain_linear.log10()
}

/// Johnson-Nyquist thermal noise power, N = k*T*B, in dBm.
/// SOURCE: CODATA 2018 Boltzmann constant (`orbit_core::constants`).
pub fn thermal_noise_dbm(system_temperature_k: f64, bandwidth_hz: f64, noise_figure_db: f64) -> f64 {
    let noise_watts = BOLTZMANN_CONSTANT_J_K * system_temperature_k * bandwidth_hz;
    let noise_dbm = 10.0 * (noise_watts * 1000.0).log10();
    noise_dbm + noise_figure_db
}

/// RSRP (dBm), 3GPP TS 38.215 §5.1.1: received power of a single reference
/// signal resource element. Modeled here as EIRP minus path losses
/// (free-space, gaseous-atmospheric, and tropospheric-scintillation) plus
/// receive gain, with no floor/ceiling clipping — a weak or saturated link
/// is reported at its true physical value, not clamped to a "valid" range.
pub fn rsrp_dbm(
    eirp_dbw: f64,
    free_space_loss_db: f64,
    atmospheric_loss_db: f64,
    scintillation_loss_db: f64,
    receive_gain_db: f64,
) -> f64 {
    (eirp_dbw + 30.0) - free_space_loss_db - atmospheric_loss_db - scintillation_loss_db + receive_gain_db
}

/// RSRQ (dB), 3GPP TS 38.215 §5.1.3: N * RSRP / RSSI, expressed here as
/// `rsrp_dbm - rssi_dbm + 10*log10(n_resource_blocks)` in the log domain.
/// RSSI is modeled as the sum (linear-domain) of the serving signal and the
/// configured interference/noise floor — no clipping.
pub fn rsrq_db(rsrp_dbm: f64, rssi_dbm: f64, n_resource_blocks: u32) -> f64 {
    rsrp_dbm - rssi_dbm + 10.0 * (n_resource_blocks as f64).log10()
}

/// RSSI (dBm): total received wideband power, serving signal plus
/// interference plus thermal noise, summed in the linear domain.
/// SOURCE: 3GPP TS 38.215 §5.1.4.
pub fn rssi_dbm(rsrp_dbm: f64, interference_dbm: f64, noise_dbm: f64) -> f64 {
    let to_watts = |dbm: f64| 10f64.powf(dbm / 10.0) / 1000.0;
    let total_watts = to_watts(rsrp_dbm) + to_watts(interference_dbm) + to_watts(noise_dbm);
    10.0 * (total_watts * 1000.0).log10()
}

/// RS-SINR (dB), 3GPP TS 38.214: signal over (interference + noise), summed
/// in the linear domain — no clipping.
pub fn sinr_db(rsrp_dbm: f64, interference_dbm: f64, noise_dbm: f64) -> f64 {
    let to_watts = |dbm: f64| 10f64.powf(dbm / 10.0) / 1000.0;
    let signal = to_watts(rsrp_dbm);
    let noise_plus_interference = to_watts(interference_dbm) + to_watts(noise_dbm);
    10.0 * (signal / noise_plus_interference).log10()
}

/// Sum a set of dBm powers in the linear domain, as a true interference
/// aggregate requires (dB values cannot simply be added). SOURCE: 3GPP TS
/// 38.214 interference-power combining convention.
pub fn sum_dbm_linear(values_dbm: impl Iterator<Item = f64>) -> f64 {
    let total_watts: f64 = values_dbm.map(|dbm| 10f64.powf(dbm / 10.0) / 1000.0).sum();
    if total_watts <= 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * (total_watts * 1000.0).log10()
    }
}

/// Propagation delay (seconds), one-way slant range over the speed of
/// light.
pub fn propagation_delay_seconds(distance_km: f64) -> f64 {
    distance_km * 1000.0 / orbit_core::constants::SPEED_OF_LIGHT_M_S
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fspl_matches_itu_r_p525_reference_point() {
        // 1000 km, 12 GHz: 20*log10(1000) + 20*log10(12) + 92.45
        let fspl = free_space_path_loss_db(1000.0, 12.0);
        let expected = 60.0 + 20.0 * 12f64.log10() + 92.45;
        assert_relative_eq!(fspl, expected, epsilon = 1e-9);
    }

    #[test]
    fn rsrp_decreases_with_distance() {
        let near = rsrp_dbm(50.0, free_space_path_loss_db(500.0, 12.0), 0.5, 0.1, 35.0);
        let far = rsrp_dbm(50.0, free_space_path_loss_db(2000.0, 12.0), 0.5, 0.1, 35.0);
        assert!(near > far);
    }

    #[test]
    fn rsrp_decreases_with_scintillation_fade() {
        let fspl = free_space_path_loss_db(1000.0, 12.0);
        let calm = rsrp_dbm(50.0, fspl, 0.5, 0.1, 35.0);
        let scintillating = rsrp_dbm(50.0, fspl, 0.5, 2.0, 35.0);
        assert!(scintillating < calm);
    }

    #[test]
    fn thermal_noise_increases_with_bandwidth() {
        let narrow = thermal_noise_dbm(290.0, 1e6, 2.0);
        let wide = thermal_noise_dbm(290.0, 100e6, 2.0);
        assert!(wide > narrow);
    }

    #[test]
    fn sinr_degrades_as_interference_grows() {
        let low_interference = sinr_db(-90.0, -130.0, -100.0);
        let high_interference = sinr_db(-90.0, -95.0, -100.0);
        assert!(low_interference > high_interference);
    }

    #[test]
    fn rsrp_is_not_clipped_outside_a_nominal_range() {
        // A very distant, heavily attenuated link should still report its
        // true (very low) value rather than being clamped.
        let value = rsrp_dbm(50.0, free_space_path_loss_db(40000.0, 30.0), 20.0, 1.0, 35.0);
        assert!(value < -150.0);
    }
}
