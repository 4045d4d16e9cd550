//! Greedy Set Cover with diversity tie-break (spec §4.5.2).
//!
//! Grounded in the teacher's own iterative greedy-with-constraint selection
//! pattern (`candidate-selector::selector::select_with_spacing`): sort/score
//! candidates, pick the best each round, track what has been satisfied so
//! far, relax or stop once the target is unreachable or already met.

use crate::config::ConstellationPoolTarget;
use crate::diversity::{self, marginal_diversity_score};
use crate::types::{CoverageGap, DiversityReport, PoolOptimizationReport, SatelliteFeasibilitySeries};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

struct CandidateCoverage {
    /// timestamp -> azimuth, for every connectable point.
    connectable: HashMap<DateTime<Utc>, f64>,
}

fn build_coverage(candidates: &[SatelliteFeasibilitySeries]) -> Vec<CandidateCoverage> {
    candidates
        .iter()
        .map(|series| {
            let connectable = series
                .time_series
                .iter()
                .filter(|p| p.is_connectable)
                .map(|p| (p.timestamp, p.azimuth_deg))
                .collect();
            CandidateCoverage { connectable }
        })
        .collect()
}

fn all_instants(candidates: &[SatelliteFeasibilitySeries]) -> BTreeSet<DateTime<Utc>> {
    candidates
        .iter()
        .flat_map(|s| s.time_series.iter().filter(|p| p.is_connectable).map(|p| p.timestamp))
        .collect()
}

fn visible_count_at(
    selected: &[usize],
    coverage: &[CandidateCoverage],
    instant: &DateTime<Utc>,
) -> usize {
    selected
        .iter()
        .filter(|&&idx| coverage[idx].connectable.contains_key(instant))
        .count()
}

fn coverage_rate(
    selected: &[usize],
    coverage: &[CandidateCoverage],
    instants: &BTreeSet<DateTime<Utc>>,
    minimum_visible: usize,
) -> f64 {
    if instants.is_empty() {
        return 0.0;
    }
    let satisfied = instants
        .iter()
        .filter(|instant| visible_count_at(selected, coverage, instant) >= minimum_visible)
        .count();
    satisfied as f64 / instants.len() as f64
}

/// Result of running the greedy optimizer over one constellation's candidate
/// pool.
pub struct OptimizationResult {
    pub selected_indices: Vec<usize>,
    pub report: PoolOptimizationReport,
}

pub fn optimize(
    candidates: &[SatelliteFeasibilitySeries],
    target: &ConstellationPoolTarget,
    target_coverage_rate: f64,
    marginal_gain_epsilon: f64,
    max_pool_size: usize,
) -> OptimizationResult {
    let instants = all_instants(candidates);
    let coverage = build_coverage(candidates);
    let target_multiplicity = target.average_visible_target.min.ceil().max(1.0) as usize;

    let mut residual: HashMap<DateTime<Utc>, usize> =
        instants.iter().map(|t| (*t, target_multiplicity)).collect();

    let mut selected: Vec<usize> = Vec::new();
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut sector_counts = [0usize; 8];
    let mut previous_rate = 0.0;

    loop {
        if selected.len() >= max_pool_size || remaining.is_empty() {
            break;
        }
        if previous_rate >= target_coverage_rate && !selected.is_empty() {
            break;
        }

        let marginals: Vec<(usize, usize)> = remaining
            .iter()
            .map(|&idx| {
                let marginal = coverage[idx]
                    .connectable
                    .keys()
                    .filter(|t| residual.get(t).copied().unwrap_or(0) > 0)
                    .count();
                (idx, marginal)
            })
            .collect();

        let best_marginal = marginals.iter().map(|(_, m)| *m).max().unwrap_or(0);
        if best_marginal == 0 {
            tracing::debug!("pool optimization: no remaining candidate has undercovered instants");
            break;
        }

        let tied: Vec<usize> = marginals
            .iter()
            .filter(|(_, m)| *m == best_marginal)
            .map(|(idx, _)| *idx)
            .collect();

        let chosen = if tied.len() == 1 {
            tied[0]
        } else {
            tied.into_iter()
                .max_by(|&a, &b| {
                    let azimuths_a: Vec<f64> = coverage[a].connectable.values().copied().collect();
                    let azimuths_b: Vec<f64> = coverage[b].connectable.values().copied().collect();
                    let score_a = marginal_diversity_score(&sector_counts, &azimuths_a);
                    let score_b = marginal_diversity_score(&sector_counts, &azimuths_b);
                    score_a.partial_cmp(&score_b).unwrap_or(std::cmp::Ordering::Equal)
                })
                .expect("tied is non-empty")
        };

        let mut candidate_selection = selected.clone();
        candidate_selection.push(chosen);
        let minimum_visible = target.minimum_visible;
        let new_rate = coverage_rate(&candidate_selection, &coverage, &instants, minimum_visible);

        if !selected.is_empty() && (new_rate - previous_rate) < marginal_gain_epsilon {
            tracing::debug!(
                "pool optimization: marginal coverage gain {:.5} below epsilon {:.5}, stopping",
                new_rate - previous_rate,
                marginal_gain_epsilon
            );
            break;
        }

        for (t, az) in &coverage[chosen].connectable {
            if let Some(r) = residual.get_mut(t) {
                *r = r.saturating_sub(1);
            }
            sector_counts[((az.rem_euclid(360.0) / 45.0).floor() as usize).min(7)] += 1;
        }

        selected.push(chosen);
        remaining.retain(|&idx| idx != chosen);
        previous_rate = new_rate;
    }

    let achieved_coverage_rate = coverage_rate(&selected, &coverage, &instants, target.minimum_visible);
    let average_visible_count = if instants.is_empty() {
        0.0
    } else {
        instants
            .iter()
            .map(|t| visible_count_at(&selected, &coverage, t) as f64)
            .sum::<f64>()
            / instants.len() as f64
    };

    let coverage_gaps = enumerate_gaps(&selected, &coverage, &instants, target.minimum_visible);

    let selected_azimuths: Vec<f64> = selected
        .iter()
        .flat_map(|&idx| coverage[idx].connectable.values().copied())
        .collect();
    let diversity: DiversityReport = diversity::analyze(selected_azimuths.into_iter());

    OptimizationResult {
        selected_indices: selected,
        report: PoolOptimizationReport {
            achieved_coverage_rate,
            average_visible_count,
            coverage_gaps,
            diversity,
        },
    }
}

fn enumerate_gaps(
    selected: &[usize],
    coverage: &[CandidateCoverage],
    instants: &BTreeSet<DateTime<Utc>>,
    minimum_visible: usize,
) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();
    let mut run_start: Option<DateTime<Utc>> = None;
    let mut run_end: Option<DateTime<Utc>> = None;
    let mut run_min = usize::MAX;
    let mut run_len = 0usize;

    for instant in instants {
        let count = visible_count_at(selected, coverage, instant);
        if count < minimum_visible {
            if run_start.is_none() {
                run_start = Some(*instant);
            }
            run_end = Some(*instant);
            run_min = run_min.min(count);
            run_len += 1;
        } else if let (Some(start), Some(end)) = (run_start.take(), run_end.take()) {
            gaps.push(CoverageGap {
                start_time: start,
                end_time: end,
                duration_points: run_len,
                min_visible: run_min,
            });
            run_min = usize::MAX;
            run_len = 0;
        }
    }
    if let (Some(start), Some(end)) = (run_start, run_end) {
        gaps.push(CoverageGap {
            start_time: start,
            end_time: end,
            duration_points: run_len,
            min_visible: run_min,
        });
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AverageVisibleTarget;
    use crate::types::{FeasibilityPoint, LinkQuality};
    use chrono::{TimeZone, Utc};
    use tle_ingest::Constellation;

    fn point(t: DateTime<Utc>, connectable: bool, azimuth: f64) -> FeasibilityPoint {
        FeasibilityPoint {
            timestamp: t,
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_km: 550.0,
            elevation_deg: if connectable { 30.0 } else { 0.0 },
            azimuth_deg: azimuth,
            distance_km: 1000.0,
            is_connectable: connectable,
            elevation_threshold: 5.0,
            link_quality: if connectable { LinkQuality::Good } else { LinkQuality::Unavailable },
        }
    }

    fn series(id: u32, points: Vec<FeasibilityPoint>) -> SatelliteFeasibilitySeries {
        SatelliteFeasibilitySeries {
            satellite_id: id,
            name: format!("SAT-{id}"),
            constellation: Constellation::Starlink,
            time_series: points,
            service_window: None,
        }
    }

    #[test]
    fn selects_enough_satellites_to_cover_every_instant() {
        let base = Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap();
        let t0 = base;
        let t1 = base + chrono::Duration::minutes(1);

        let candidates = vec![
            series(1, vec![point(t0, true, 0.0), point(t1, false, 0.0)]),
            series(2, vec![point(t0, false, 90.0), point(t1, true, 90.0)]),
            series(3, vec![point(t0, true, 180.0), point(t1, true, 180.0)]),
        ];

        let target = ConstellationPoolTarget {
            average_visible_target: AverageVisibleTarget { min: 1.0, max: 2.0 },
            minimum_visible: 1,
        };

        let result = optimize(&candidates, &target, 0.95, 0.001, 10);
        assert!(result.report.achieved_coverage_rate >= 0.95);
        assert!(!result.selected_indices.is_empty());
    }
}
