//! Stage 2 data model (spec §3 "TEME state series").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tle_ingest::Constellation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemePoint {
    pub timestamp: DateTime<Utc>,
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
    /// spec §3: "data-source tag stage1_provided" — every point's time
    /// basis traces back to Stage 1's parsed epoch, never a re-parse.
    pub data_source: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteTemeSeries {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub orbital_period_minutes: f64,
    pub time_series: Vec<TemePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stage2Metadata {
    pub coordinate_system: String,
    pub propagation_method: String,
    pub tle_reparse_prohibited: bool,
    pub epoch_datetime_source: String,
    pub coverage_cycles: f64,
    pub interval_seconds: u32,
    pub worker_count: usize,
    pub failed_propagations: usize,
    pub failed_satellite_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage2Output {
    pub satellites: Vec<SatelliteTemeSeries>,
    pub metadata: Stage2Metadata,
}
