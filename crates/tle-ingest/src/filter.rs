//! Optional epoch filter (spec §4.2) and deterministic sampling.

use crate::types::SatelliteRecord;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// spec §4.2: "latest_date keeps only records whose epoch falls within the
/// latest-observed calendar day ± tolerance; date_range keeps epochs within
/// an explicit window; all disables."
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum EpochFilter {
    LatestDate { tolerance_hours: i64 },
    DateRange { start: NaiveDate, end: NaiveDate },
    All,
}

pub fn apply_epoch_filter(
    satellites: Vec<SatelliteRecord>,
    filter: &EpochFilter,
) -> (Vec<SatelliteRecord>, usize) {
    match filter {
        EpochFilter::All => {
            let count = satellites.len();
            (satellites, count - count)
        }
        EpochFilter::LatestDate { tolerance_hours } => {
            let latest = satellites
                .iter()
                .map(|s| s.epoch_datetime)
                .max()
                .unwrap_or_else(Utc::now);
            let tolerance = Duration::hours(*tolerance_hours);
            let before = satellites.len();
            let kept: Vec<_> = satellites
                .into_iter()
                .filter(|s| {
                    let delta = (latest - s.epoch_datetime).num_seconds().abs();
                    delta <= tolerance.num_seconds()
                })
                .collect();
            let filtered_out = before - kept.len();
            (kept, filtered_out)
        }
        EpochFilter::DateRange { start, end } => {
            let before = satellites.len();
            let kept: Vec<_> = satellites
                .into_iter()
                .filter(|s| {
                    let date = s.epoch_datetime.date_naive();
                    date >= *start && date <= *end
                })
                .collect();
            let filtered_out = before - kept.len();
            (kept, filtered_out)
        }
    }
}

/// spec §4.2: "Sampling is deterministic (first-N or seeded), not random."
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum SamplingConfig {
    Disabled,
    Enabled { count: usize },
    Auto { threshold: usize, count: usize },
}

pub fn apply_sampling(
    satellites: Vec<SatelliteRecord>,
    sampling: &SamplingConfig,
) -> (Vec<SatelliteRecord>, usize) {
    let before = satellites.len();
    let sampled = match sampling {
        SamplingConfig::Disabled => satellites,
        SamplingConfig::Enabled { count } => {
            satellites.into_iter().take(*count).collect()
        }
        SamplingConfig::Auto { threshold, count } => {
            if before > *threshold {
                satellites.into_iter().take(*count).collect()
            } else {
                satellites
            }
        }
    };
    let sampled_out = before - sampled.len();
    (sampled, sampled_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChecksumConvention, Constellation};
    use chrono::TimeZone;

    fn sat(id: u32, day_offset: i64) -> SatelliteRecord {
        SatelliteRecord {
            satellite_id: id,
            name: format!("SAT-{id}"),
            constellation: Constellation::Starlink,
            tle_line1: String::new(),
            tle_line2: String::new(),
            epoch_datetime: Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap()
                + Duration::days(day_offset),
            mean_motion_rev_per_day: 15.0,
            checksum_convention: ChecksumConvention::StrictDigitsAndMinus,
        }
    }

    #[test]
    fn latest_date_filter_keeps_only_recent_epochs() {
        let sats = vec![sat(1, 0), sat(2, -3), sat(3, 0)];
        let (kept, filtered) = apply_epoch_filter(
            sats,
            &EpochFilter::LatestDate { tolerance_hours: 12 },
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(filtered, 1);
    }

    #[test]
    fn sampling_auto_only_kicks_in_above_threshold() {
        let sats: Vec<_> = (0..10).map(|i| sat(i, 0)).collect();
        let (kept, _) = apply_sampling(
            sats,
            &SamplingConfig::Auto { threshold: 20, count: 3 },
        );
        assert_eq!(kept.len(), 10, "below threshold should keep all");
    }

    #[test]
    fn sampling_deterministic_first_n() {
        let sats: Vec<_> = (0..10).map(|i| sat(i, 0)).collect();
        let (kept, sampled_out) =
            apply_sampling(sats, &SamplingConfig::Enabled { count: 4 });
        assert_eq!(kept.len(), 4);
        assert_eq!(sampled_out, 6);
        assert_eq!(kept[0].satellite_id, 0);
        assert_eq!(kept[3].satellite_id, 3);
    }
}
