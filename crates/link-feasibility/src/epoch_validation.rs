//! Epoch validation (spec §4.5.1, per Vallado 2013): independence,
//! consistency, distribution. Run before visibility processing begins;
//! independence failure rejects the whole stage run, the other two only
//! warn.

use crate::types::EpochValidationReport;
use chrono::{DateTime, Utc};
use orbit_core::constants::EPOCH_CONSISTENCY_WINDOW_DAYS;
use std::collections::HashSet;
use tle_ingest::SatelliteRecord;

/// `timestamps_by_satellite[i]` is satellite `satellites[i]`'s Stage-2/3
/// time series (shares index order with `satellites`).
pub fn validate(
    satellites: &[SatelliteRecord],
    timestamps_by_satellite: &[Vec<DateTime<Utc>>],
) -> EpochValidationReport {
    let independence_ok = tle_ingest::epoch_analysis::epoch_independence_ok(satellites);

    let mut consistency_ok = true;
    for (satellite, timestamps) in satellites.iter().zip(timestamps_by_satellite) {
        for ts in timestamps {
            let delta_days = (*ts - satellite.epoch_datetime).num_seconds().abs() as f64 / 86_400.0;
            if delta_days > EPOCH_CONSISTENCY_WINDOW_DAYS as f64 {
                consistency_ok = false;
            }
        }
    }

    let unique_epochs: HashSet<DateTime<Utc>> =
        satellites.iter().map(|s| s.epoch_datetime).collect();
    let distribution_ok = match (unique_epochs.iter().min(), unique_epochs.iter().max()) {
        (Some(min), Some(max)) => (*max - *min).num_hours() >= 24,
        _ => false,
    };

    EpochValidationReport {
        independence_ok,
        consistency_ok,
        distribution_ok,
        consistency_warning: if consistency_ok {
            None
        } else {
            Some("one or more time points fall outside the 7-day epoch-consistency window".to_string())
        },
        distribution_warning: if distribution_ok {
            None
        } else {
            Some("unique-epoch spread is under 24 hours".to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tle_ingest::types::ChecksumConvention;
    use tle_ingest::Constellation;

    fn sat(id: u32, epoch: DateTime<Utc>) -> SatelliteRecord {
        SatelliteRecord {
            satellite_id: id,
            name: format!("SAT-{id}"),
            constellation: Constellation::Starlink,
            tle_line1: String::new(),
            tle_line2: String::new(),
            epoch_datetime: epoch,
            mean_motion_rev_per_day: 15.0,
            checksum_convention: ChecksumConvention::StrictDigitsAndMinus,
        }
    }

    #[test]
    fn distribution_requires_24_hour_spread() {
        let base = Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap();
        let satellites = vec![sat(1, base), sat(2, base + Duration::hours(1))];
        let series = vec![vec![base], vec![base + Duration::hours(1)]];
        let report = validate(&satellites, &series);
        assert!(!report.distribution_ok);
    }

    #[test]
    fn consistency_flags_points_outside_seven_days() {
        let base = Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap();
        let satellites = vec![sat(1, base)];
        let series = vec![vec![base + Duration::days(10)]];
        let report = validate(&satellites, &series);
        assert!(!report.consistency_ok);
    }
}
