//! Stage 5 validator (spec §4.6): RSRP spread sanity, no sentinel
//! placeholder values, and per-point physical plausibility.

use crate::types::Stage5Output;
use orbit_core::snapshot::{CheckDetail, ValidationSnapshot};
use orbit_core::stage::StageValidator;

/// Sentinel the processor must never emit in place of a failed atmospheric
/// computation — a failure should drop the satellite entirely
/// (`metadata.failed_satellite_ids`), never substitute a placeholder.
const ATMOSPHERIC_LOSS_SENTINEL_DB: f64 = 999.0;

pub fn build_check_details(output: &Stage5Output) -> Vec<CheckDetail> {
    let all_points: Vec<&crate::types::SignalPoint> = output
        .constellations
        .values()
        .flatten()
        .flat_map(|s| s.time_series.iter())
        .collect();

    let rsrp_values: Vec<f64> = all_points.iter().map(|p| p.rsrp_dbm).collect();
    let mean = if rsrp_values.is_empty() {
        0.0
    } else {
        rsrp_values.iter().sum::<f64>() / rsrp_values.len() as f64
    };
    let variance = if rsrp_values.is_empty() {
        0.0
    } else {
        rsrp_values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / rsrp_values.len() as f64
    };
    let std_dev = variance.sqrt();
    let range = rsrp_values.iter().cloned().fold(f64::MIN, f64::max)
        - rsrp_values.iter().cloned().fold(f64::MAX, f64::min);

    let rsrp_variation = CheckDetail {
        name: "rsrp_std_dev_and_range".to_string(),
        passed: !rsrp_values.is_empty() && std_dev >= 2.0 && range >= 5.0,
        message: format!("RSRP std_dev={std_dev:.2} dB, range={range:.2} dB"),
    };

    let no_sentinel = CheckDetail {
        name: "no_atmospheric_sentinel_values".to_string(),
        passed: all_points
            .iter()
            .all(|p| (p.atmospheric_loss.total_db - ATMOSPHERIC_LOSS_SENTINEL_DB).abs() > 1e-6),
        message: "no point reports the 999.0 dB atmospheric-loss sentinel".to_string(),
    };

    let rsrp_plausibility = CheckDetail {
        name: "rsrp_physically_plausible".to_string(),
        passed: all_points.iter().all(|p| (-150.0..=-20.0).contains(&p.rsrp_dbm)),
        message: "every RSRP value lies within (-150, -20) dBm".to_string(),
    };

    let distance_plausibility = CheckDetail {
        name: "distance_physically_plausible".to_string(),
        passed: all_points.iter().all(|p| (500.0..=3000.0).contains(&p.distance_km)),
        message: "every distance lies within (500, 3000) km".to_string(),
    };

    let doppler_finite = CheckDetail {
        name: "doppler_values_finite".to_string(),
        passed: all_points
            .iter()
            .all(|p| p.doppler_shift_hz.is_finite() && p.radial_velocity_km_s.is_finite()),
        message: "every Doppler shift and radial velocity value is finite".to_string(),
    };

    let scintillation_finite = CheckDetail {
        name: "scintillation_values_finite".to_string(),
        passed: all_points.iter().all(|p| p.scintillation_loss_db.is_finite() && p.scintillation_loss_db >= 0.0),
        message: "every scintillation fade depth is finite and non-negative".to_string(),
    };

    vec![
        rsrp_variation,
        no_sentinel,
        rsrp_plausibility,
        distance_plausibility,
        doppler_finite,
        scintillation_finite,
    ]
}

pub struct Stage5Validator;

impl StageValidator for Stage5Validator {
    fn stage_specific_check(&self, snapshot: &ValidationSnapshot) -> CheckDetail {
        let plausibility_passed = snapshot
            .validation_checks
            .check_details
            .iter()
            .find(|c| c.name == "rsrp_physically_plausible")
            .map(|c| c.passed)
            .unwrap_or(false);
        CheckDetail {
            name: "stage5_rsrp_plausibility_critical".to_string(),
            passed: plausibility_passed,
            message: "Stage 5 requires every RSRP value within the physically plausible band".to_string(),
        }
    }
}
