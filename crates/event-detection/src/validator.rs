//! Stage 6 validator (spec §4.7): 5 checks — event-count sanity,
//! pool-verification coverage, episode-completeness, GPP-standard
//! compliance tags, event-timestamp range.

use crate::types::Stage6Output;
use orbit_core::snapshot::{CheckDetail, ValidationSnapshot};
use orbit_core::stage::StageValidator;

pub fn build_check_details(output: &Stage6Output, total_optimized_satellites: usize) -> Vec<CheckDetail> {
    let event_count_sanity = CheckDetail {
        name: "event_count_sanity".to_string(),
        passed: if total_optimized_satellites >= 10 {
            output.metadata.event_counts.a3_count > 0
        } else {
            true
        },
        message: format!(
            "A3={} A4={} (>= 10 satellites ({total_optimized_satellites}) requires A3 > 0, guards the median-serving rule)",
            output.metadata.event_counts.a3_count, output.metadata.event_counts.a4_count
        ),
    };

    let pool_coverage = CheckDetail {
        name: "pool_verification_coverage".to_string(),
        passed: output.pool_verification.values().all(|v| v.coverage_rate >= 0.95),
        message: format!(
            "coverage rates: {}",
            output
                .pool_verification
                .iter()
                .map(|(name, v)| format!("{name}={:.3}", v.coverage_rate))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    let episode_completeness = CheckDetail {
        name: "episode_completeness".to_string(),
        passed: output.episodes.iter().all(|e| !e.steps.is_empty()),
        message: "every episode has at least one connectable-point step".to_string(),
    };

    let compliance_tags_present = CheckDetail {
        name: "gpp_standard_compliance_tags_present".to_string(),
        passed: output.episodes.iter().all(|e| !e.calculation_standard.is_empty()),
        message: "every episode carries a non-empty calculation_standard tag".to_string(),
    };

    let timestamps_in_range = CheckDetail {
        name: "event_timestamps_within_dataset_range".to_string(),
        passed: match (output.metadata.dataset_start_time, output.metadata.dataset_end_time) {
            (Some(start), Some(end)) => output
                .events
                .iter()
                .all(|e| e.time_instant >= start && e.time_instant <= end),
            _ => output.events.is_empty(),
        },
        message: "every event's time_instant falls within [dataset_start_time, dataset_end_time]".to_string(),
    };

    vec![
        event_count_sanity,
        pool_coverage,
        episode_completeness,
        compliance_tags_present,
        timestamps_in_range,
    ]
}

pub struct Stage6Validator;

impl StageValidator for Stage6Validator {
    fn stage_specific_check(&self, snapshot: &ValidationSnapshot) -> CheckDetail {
        let event_sanity_passed = snapshot
            .validation_checks
            .check_details
            .iter()
            .find(|c| c.name == "event_count_sanity")
            .map(|c| c.passed)
            .unwrap_or(false);
        CheckDetail {
            name: "stage6_median_serving_rule_critical".to_string(),
            passed: event_sanity_passed,
            message: "Stage 6 requires A3 > 0 whenever the optimized pool has >= 10 satellites".to_string(),
        }
    }
}
