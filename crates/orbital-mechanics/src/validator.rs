//! Stage 2 validator: 5 checks (spec §4.3) — epoch-basis correctness, SGP4
//! accuracy markers, time-series completeness, TEME-range sanity,
//! memory-performance budget.

use crate::time_window::UnifiedTimeWindowManager;
use crate::types::Stage2Output;
use orbit_core::snapshot::{CheckDetail, ValidationSnapshot};
use orbit_core::stage::StageValidator;

/// Memory budget ceiling (spec §5): ~2 GB at 9,000 satellites x 200 points.
/// A rough per-point byte footprint (timestamp + 2x `[f64; 3]`) bounds total
/// series memory without requiring an actual allocator probe.
const BYTES_PER_POINT: usize = 64;
const MEMORY_BUDGET_BYTES: usize = 2 * 1024 * 1024 * 1024;

pub fn build_check_details(
    output: &Stage2Output,
    time_window: &UnifiedTimeWindowManager,
) -> Vec<CheckDetail> {
    let epoch_basis = CheckDetail {
        name: "epoch_basis_correctness".to_string(),
        passed: output.metadata.epoch_datetime_source == "stage1_provided"
            && output.metadata.tle_reparse_prohibited,
        message: format!(
            "epoch_datetime_source={}, tle_reparse_prohibited={}",
            output.metadata.epoch_datetime_source, output.metadata.tle_reparse_prohibited
        ),
    };

    let sgp4_marker = CheckDetail {
        name: "sgp4_accuracy_markers".to_string(),
        passed: output.metadata.propagation_method == "SGP4"
            && output.metadata.coordinate_system == "TEME",
        message: "propagation_method=SGP4, coordinate_system=TEME".to_string(),
    };

    let completeness = CheckDetail {
        name: "time_series_completeness".to_string(),
        passed: output.satellites.iter().all(|s| {
            let expected = time_window.expected_point_count(s.constellation);
            s.time_series.len() as f64 >= 0.9 * expected as f64
        }),
        message: format!(
            "all {} satellites retain >= 90% of expected points",
            output.satellites.len()
        ),
    };

    // LEO/MEO plausible altitude band; generous enough to cover Starlink and
    // OneWeb without hard-coding either constellation's specific shell.
    let teme_range = CheckDetail {
        name: "teme_range_sanity".to_string(),
        passed: output.satellites.iter().all(|s| {
            s.time_series.iter().all(|p| {
                let r = (p.position_km[0].powi(2)
                    + p.position_km[1].powi(2)
                    + p.position_km[2].powi(2))
                .sqrt();
                let altitude = r - orbit_core::constants::WGS84_SEMI_MAJOR_AXIS_KM;
                (100.0..3000.0).contains(&altitude)
            })
        }),
        message: "all TEME position altitudes within LEO-plausible band".to_string(),
    };

    let total_points: usize = output.satellites.iter().map(|s| s.time_series.len()).sum();
    let estimated_bytes = total_points * BYTES_PER_POINT;
    let memory_budget = CheckDetail {
        name: "memory_performance_budget".to_string(),
        passed: estimated_bytes <= MEMORY_BUDGET_BYTES,
        message: format!(
            "estimated {estimated_bytes} bytes across {total_points} points (budget {MEMORY_BUDGET_BYTES})"
        ),
    };

    vec![epoch_basis, sgp4_marker, completeness, teme_range, memory_budget]
}

pub struct Stage2Validator;

impl StageValidator for Stage2Validator {
    fn stage_specific_check(&self, snapshot: &ValidationSnapshot) -> CheckDetail {
        let completeness_passed = snapshot
            .validation_checks
            .check_details
            .iter()
            .find(|c| c.name == "time_series_completeness")
            .map(|c| c.passed)
            .unwrap_or(false);
        CheckDetail {
            name: "stage2_completeness_critical".to_string(),
            passed: completeness_passed,
            message: "Stage 2 requires every satellite to retain its coverage-cycle point budget"
                .to_string(),
        }
    }
}
