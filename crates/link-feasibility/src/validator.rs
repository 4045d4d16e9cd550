//! Stage 4 validator: 6 checks (spec §4.5.2) — constellation-threshold
//! consistency, visibility-accuracy vs. IAU library, link-budget respected,
//! NTPU-coverage continuous >= orbital period, service-window sanity,
//! pool-optimization targets (critical).

use crate::types::Stage4Output;
use orbit_core::snapshot::{CheckDetail, ValidationSnapshot};
use orbit_core::stage::StageValidator;
use std::collections::BTreeMap;

/// `orbital_period_minutes` is read from Stage 1's `epoch_analysis.json`
/// (spec §4.5.2: "dynamic per-constellation minutes"), keyed the same way
/// as `Stage4Output::pools`.
pub fn build_check_details(
    output: &Stage4Output,
    orbital_period_minutes: &BTreeMap<String, f64>,
    interval_seconds: u32,
) -> Vec<CheckDetail> {
    let threshold_consistency = CheckDetail {
        name: "constellation_threshold_consistency".to_string(),
        passed: output.pools.values().all(|pool| {
            pool.connectable_satellites
                .iter()
                .all(|s| s.time_series.iter().all(|p| {
                    !p.is_connectable || p.elevation_deg >= p.elevation_threshold
                }))
        }),
        message: "every is_connectable point meets its own recorded elevation_threshold".to_string(),
    };

    let visibility_accuracy = CheckDetail {
        name: "visibility_accuracy_vs_iau_library".to_string(),
        passed: output.pools.values().all(|pool| {
            pool.connectable_satellites.iter().all(|s| {
                s.time_series
                    .iter()
                    .all(|p| (0.0..=360.0).contains(&p.azimuth_deg) && p.elevation_deg <= 90.0)
            })
        }),
        message: "azimuth within [0, 360) and elevation <= 90 deg for every point".to_string(),
    };

    let link_budget = CheckDetail {
        name: "link_budget_respected".to_string(),
        passed: output.pools.values().all(|pool| {
            pool.connectable_satellites.iter().all(|s| {
                s.time_series.iter().all(|p| {
                    !p.is_connectable || (200.0..=2000.0).contains(&p.distance_km)
                })
            })
        }),
        message: "every is_connectable point respects the 200-2000 km link budget".to_string(),
    };

    let ntpu_coverage = CheckDetail {
        name: "ntpu_coverage_continuous".to_string(),
        passed: output.pools.iter().all(|(name, pool)| {
            let period_minutes = orbital_period_minutes.get(name).copied().unwrap_or(0.0);
            let required_points = ((period_minutes * 60.0) / interval_seconds as f64).ceil() as usize;
            pool.optimized_pool
                .iter()
                .any(|s| s.time_series.len() >= required_points)
        }),
        message: "optimized pool spans at least one orbital period continuously".to_string(),
    };

    let service_window_sanity = CheckDetail {
        name: "service_window_sanity".to_string(),
        passed: output.pools.values().all(|pool| {
            pool.connectable_satellites
                .iter()
                .all(|s| match &s.service_window {
                    Some(w) => w.end_time >= w.start_time && w.max_elevation_deg > 0.0,
                    None => false,
                })
        }),
        message: "every candidate satellite has a well-formed service window".to_string(),
    };

    let pool_optimization_targets = CheckDetail {
        name: "pool_optimization_targets".to_string(),
        passed: output
            .pools
            .values()
            .all(|pool| pool.optimization_report.achieved_coverage_rate >= 0.95),
        message: format!(
            "achieved coverage rates: {}",
            output
                .pools
                .iter()
                .map(|(name, pool)| format!(
                    "{name}={:.3}",
                    pool.optimization_report.achieved_coverage_rate
                ))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    vec![
        threshold_consistency,
        visibility_accuracy,
        link_budget,
        ntpu_coverage,
        service_window_sanity,
        pool_optimization_targets,
    ]
}

pub struct Stage4Validator;

impl StageValidator for Stage4Validator {
    fn stage_specific_check(&self, snapshot: &ValidationSnapshot) -> CheckDetail {
        let pool_targets_passed = snapshot
            .validation_checks
            .check_details
            .iter()
            .find(|c| c.name == "pool_optimization_targets")
            .map(|c| c.passed)
            .unwrap_or(false);
        CheckDetail {
            name: "stage4_pool_optimization_critical".to_string(),
            passed: pool_targets_passed,
            message: "Stage 4 requires >= 95% coverage rate in every constellation's optimized pool"
                .to_string(),
        }
    }
}
