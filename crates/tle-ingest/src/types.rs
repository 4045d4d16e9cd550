//! Stage 1 data model (spec §3 "Satellite record").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constellation {
    Starlink,
    Oneweb,
}

impl std::fmt::Display for Constellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constellation::Starlink => write!(f, "starlink"),
            Constellation::Oneweb => write!(f, "oneweb"),
        }
    }
}

/// Which checksum rule a TLE record actually satisfied. spec §4.2: the
/// strict NORAD rule counts only digits and `-`; many real-world producers
/// add `+` counts by mistake. Both are accepted; this is recorded, not
/// silently normalized away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumConvention {
    StrictDigitsAndMinus,
    LenientDigitsMinusPlus,
}

/// Stage 1 output record. Invariant (spec §3): each record retains *its
/// own* epoch — there is no shared reference epoch across satellites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteRecord {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub tle_line1: String,
    pub tle_line2: String,
    pub epoch_datetime: DateTime<Utc>,
    pub mean_motion_rev_per_day: f64,
    pub checksum_convention: ChecksumConvention,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IngestStats {
    pub total_records_seen: usize,
    pub parsed_records: usize,
    pub failed_records: usize,
    pub strict_checksum_count: usize,
    pub lenient_checksum_count: usize,
    pub filtered_by_epoch: usize,
    pub sampled_out: usize,
    pub constellation_counts: std::collections::BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalPeriodEstimate {
    pub min_minutes: f64,
    pub max_minutes: f64,
    pub recommended_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochAnalysis {
    pub total_unique_epochs: usize,
    pub diversity_ratio: f64,
    pub per_constellation_period: std::collections::BTreeMap<String, OrbitalPeriodEstimate>,
    pub recommended_reference_epoch: DateTime<Utc>,
    pub latest_observed_date: chrono::NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage1Output {
    pub satellites: Vec<SatelliteRecord>,
    pub stats: IngestStats,
    pub epoch_analysis: EpochAnalysis,
}
