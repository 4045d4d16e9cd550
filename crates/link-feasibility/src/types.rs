//! Stage 4 data model (spec §3 "Candidate and optimized pools").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tle_ingest::Constellation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unavailable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeasibilityPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub distance_km: f64,
    pub is_connectable: bool,
    pub elevation_threshold: f64,
    pub link_quality: LinkQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub max_elevation_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteFeasibilitySeries {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub time_series: Vec<FeasibilityPoint>,
    /// `None` if this satellite never had a single connectable point — such
    /// satellites do not belong in a candidate list at all, so in practice
    /// this is always `Some` for entries that reach `ConstellationPool`.
    pub service_window: Option<ServiceWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageGap {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_points: usize,
    pub min_visible: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiversityReport {
    /// 8 compass-sector bucket counts (N, NE, E, SE, S, SW, W, NW).
    pub sector_counts: [usize; 8],
    /// Shannon-entropy-normalized diversity score in [0, 1].
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PoolOptimizationReport {
    pub achieved_coverage_rate: f64,
    pub average_visible_count: f64,
    pub coverage_gaps: Vec<CoverageGap>,
    pub diversity: DiversityReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstellationPool {
    pub connectable_satellites: Vec<SatelliteFeasibilitySeries>,
    pub optimized_pool: Vec<SatelliteFeasibilitySeries>,
    pub optimization_report: PoolOptimizationReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EpochValidationReport {
    pub independence_ok: bool,
    pub consistency_ok: bool,
    pub distribution_ok: bool,
    pub consistency_warning: Option<String>,
    pub distribution_warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stage4Metadata {
    pub epoch_validation: EpochValidationReport,
    pub failed_satellite_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage4Output {
    /// Keyed by constellation display name (`"starlink"`, `"oneweb"`).
    pub pools: BTreeMap<String, ConstellationPool>,
    pub metadata: Stage4Metadata,
}
