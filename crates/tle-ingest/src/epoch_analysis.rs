//! Epoch-distribution analysis (spec §4.2) — produces the
//! `epoch_analysis.json` payload Stage 2/4 read downstream.

use crate::types::{Constellation, EpochAnalysis, OrbitalPeriodEstimate, SatelliteRecord};
use std::collections::{BTreeMap, HashSet};

/// Orbital period in minutes from mean motion (rev/day). SOURCE: Kepler's
/// third law applied to the mean-motion convention used by NORAD TLEs —
/// period_minutes = 1440 / mean_motion_rev_per_day.
pub fn orbital_period_minutes(mean_motion_rev_per_day: f64) -> f64 {
    1440.0 / mean_motion_rev_per_day
}

pub fn analyze(satellites: &[SatelliteRecord]) -> EpochAnalysis {
    let unique_epochs: HashSet<_> = satellites.iter().map(|s| s.epoch_datetime).collect();
    let total_unique_epochs = unique_epochs.len();
    let diversity_ratio = if satellites.is_empty() {
        0.0
    } else {
        total_unique_epochs as f64 / satellites.len() as f64
    };

    let mut per_constellation: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sat in satellites {
        per_constellation
            .entry(sat.constellation.to_string())
            .or_default()
            .push(orbital_period_minutes(sat.mean_motion_rev_per_day));
    }

    let per_constellation_period = per_constellation
        .into_iter()
        .map(|(name, mut periods)| {
            periods.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let min_minutes = *periods.first().unwrap_or(&0.0);
            let max_minutes = *periods.last().unwrap_or(&0.0);
            let recommended_minutes = periods[periods.len() / 2];
            (
                name,
                OrbitalPeriodEstimate {
                    min_minutes,
                    max_minutes,
                    recommended_minutes,
                },
            )
        })
        .collect();

    // The most recently observed epoch is adopted as the reference instant
    // candidate for Stage 2's unified time window (spec §4.3).
    let recommended_reference_epoch = satellites
        .iter()
        .map(|s| s.epoch_datetime)
        .max()
        .unwrap_or_else(chrono::Utc::now);

    EpochAnalysis {
        total_unique_epochs,
        diversity_ratio,
        per_constellation_period,
        recommended_reference_epoch,
        latest_observed_date: recommended_reference_epoch.date_naive(),
    }
}

/// Used by Stage 4's epoch-independence check (spec §4.5.1): at least 50%
/// distinct epochs, or at least 3 distinct when fewer satellites than that
/// would require.
pub fn epoch_independence_ok(satellites: &[SatelliteRecord]) -> bool {
    let unique: HashSet<_> = satellites.iter().map(|s| s.epoch_datetime).collect();
    let required = (satellites.len() as f64 * 0.5).ceil().max(3.0) as usize;
    unique.len() >= required.min(satellites.len())
}

#[allow(dead_code)]
fn _unused(_c: Constellation) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChecksumConvention;
    use chrono::{TimeZone, Utc};

    fn sat(id: u32, mm: f64, epoch_offset_hours: i64) -> SatelliteRecord {
        SatelliteRecord {
            satellite_id: id,
            name: format!("SAT-{id}"),
            constellation: Constellation::Starlink,
            tle_line1: String::new(),
            tle_line2: String::new(),
            epoch_datetime: Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap()
                + chrono::Duration::hours(epoch_offset_hours),
            mean_motion_rev_per_day: mm,
            checksum_convention: ChecksumConvention::StrictDigitsAndMinus,
        }
    }

    #[test]
    fn period_matches_known_starlink_mean_motion() {
        // Starlink orbits ~15.05 rev/day -> ~95.7 min period.
        let period = orbital_period_minutes(15.05);
        assert!((period - 95.68).abs() < 0.1);
    }

    #[test]
    fn diversity_ratio_reflects_unique_epochs() {
        let sats = vec![sat(1, 15.0, 0), sat(2, 15.0, 1), sat(3, 15.0, 1)];
        let analysis = analyze(&sats);
        assert_eq!(analysis.total_unique_epochs, 2);
        assert!((analysis.diversity_ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn independence_requires_half_or_three_distinct() {
        let all_same = vec![sat(1, 15.0, 0), sat(2, 15.0, 0), sat(3, 15.0, 0)];
        assert!(!epoch_independence_ok(&all_same));

        let diverse = vec![sat(1, 15.0, 0), sat(2, 15.0, 1), sat(3, 15.0, 2)];
        assert!(epoch_independence_ok(&diverse));
    }
}
