//! Unified time-window generation (spec §4.3 "Unified time window").
//!
//! Both `mode` and `interval_seconds` must come from configuration — there
//! is no default, per spec §4.3 "missing values fail immediately".

use chrono::{DateTime, Duration, Utc};
use orbit_core::Result;
use serde::{Deserialize, Serialize};
use tle_ingest::{Constellation, SatelliteRecord};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindowMode {
    /// Every satellite's series starts from one shared reference instant
    /// (Stage 1's recommended epoch). Required for cross-satellite pool
    /// optimization in Stage 4 to compare time instants directly.
    UnifiedWindow,
    /// Each satellite's series starts from its own epoch.
    IndependentEpoch,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstellationOrbitalPeriods {
    pub starlink_minutes: f64,
    pub oneweb_minutes: f64,
}

impl ConstellationOrbitalPeriods {
    pub fn minutes_for(&self, constellation: Constellation) -> f64 {
        match constellation {
            Constellation::Starlink => self.starlink_minutes,
            Constellation::Oneweb => self.oneweb_minutes,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesConfig {
    pub mode: TimeWindowMode,
    pub interval_seconds: u32,
}

/// Per-satellite generated timestamp sequence, monotonic and evenly spaced
/// (spec §5 "Ordering guarantees": "time points within a satellite are
/// produced in increasing timestamp order").
pub struct UnifiedTimeWindowManager<'a> {
    config: &'a TimeSeriesConfig,
    periods: &'a ConstellationOrbitalPeriods,
    coverage_cycles: f64,
    reference_instant: DateTime<Utc>,
}

impl<'a> UnifiedTimeWindowManager<'a> {
    pub fn new(
        config: &'a TimeSeriesConfig,
        periods: &'a ConstellationOrbitalPeriods,
        coverage_cycles: f64,
        recommended_reference_epoch: DateTime<Utc>,
    ) -> Result<Self> {
        if coverage_cycles < orbit_core::constants::MIN_COVERAGE_CYCLES {
            tracing::warn!(
                "coverage_cycles {coverage_cycles} below the {} minimum required for continuous \
                 pool coverage (spec §8 scenario 6)",
                orbit_core::constants::MIN_COVERAGE_CYCLES
            );
        }
        Ok(UnifiedTimeWindowManager {
            config,
            periods,
            coverage_cycles,
            reference_instant: recommended_reference_epoch,
        })
    }

    /// Reference instant for a satellite's series: the shared instant in
    /// `UnifiedWindow` mode, its own epoch in `IndependentEpoch` mode.
    fn start_instant(&self, satellite: &SatelliteRecord) -> DateTime<Utc> {
        match self.config.mode {
            TimeWindowMode::UnifiedWindow => self.reference_instant,
            TimeWindowMode::IndependentEpoch => satellite.epoch_datetime,
        }
    }

    /// Expected point count: `ceil(period_s * coverage_cycles / interval_s)`
    /// (spec §3 Stage-2 invariant).
    pub fn expected_point_count(&self, constellation: Constellation) -> usize {
        let period_s = self.periods.minutes_for(constellation) * 60.0;
        ((period_s * self.coverage_cycles) / self.config.interval_seconds as f64).ceil() as usize
    }

    pub fn generate(&self, satellite: &SatelliteRecord) -> Vec<DateTime<Utc>> {
        let start = self.start_instant(satellite);
        let count = self.expected_point_count(satellite.constellation);
        let step = Duration::seconds(self.config.interval_seconds as i64);
        (0..count).map(|i| start + step * i as i32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tle_ingest::ChecksumConvention;

    fn sat(constellation: Constellation) -> SatelliteRecord {
        SatelliteRecord {
            satellite_id: 1,
            name: "TEST".to_string(),
            constellation,
            tle_line1: String::new(),
            tle_line2: String::new(),
            epoch_datetime: Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap(),
            mean_motion_rev_per_day: 15.05,
            checksum_convention: ChecksumConvention::StrictDigitsAndMinus,
        }
    }

    #[test]
    fn expected_point_count_matches_coverage_cycles() {
        let config = TimeSeriesConfig {
            mode: TimeWindowMode::UnifiedWindow,
            interval_seconds: 30,
        };
        let periods = ConstellationOrbitalPeriods {
            starlink_minutes: 95.68,
            oneweb_minutes: 109.4,
        };
        let manager = UnifiedTimeWindowManager::new(&config, &periods, 1.2, Utc::now()).unwrap();
        let expected = manager.expected_point_count(Constellation::Starlink);
        // 95.68 min * 60 s/min * 1.2 / 30 s ~= 229.6 -> ceil 230
        assert_eq!(expected, 230);
    }

    #[test]
    fn generated_series_is_monotonic_and_evenly_spaced() {
        let config = TimeSeriesConfig {
            mode: TimeWindowMode::IndependentEpoch,
            interval_seconds: 60,
        };
        let periods = ConstellationOrbitalPeriods {
            starlink_minutes: 95.68,
            oneweb_minutes: 109.4,
        };
        let manager = UnifiedTimeWindowManager::new(&config, &periods, 1.2, Utc::now()).unwrap();
        let satellite = sat(Constellation::Starlink);
        let series = manager.generate(&satellite);
        assert_eq!(series[0], satellite.epoch_datetime);
        for pair in series.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_seconds(), 60);
        }
    }
}
