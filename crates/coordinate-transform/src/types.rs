//! Stage 3 data model (spec §3 "Geodetic series").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tle_ingest::Constellation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteGeodeticSeries {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub time_series: Vec<GeodeticPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stage3Metadata {
    /// spec §4.4: "conversion uses the IAU-standard astronomy library's
    /// TEME->ITRF->WGS84 path, not ad-hoc rotation matrices."
    pub reference_frame_chain: String,
    pub iau_model: String,
    pub failed_satellite_ids: Vec<u32>,
    pub total_points_converted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage3Output {
    pub satellites: Vec<SatelliteGeodeticSeries>,
    pub metadata: Stage3Metadata,
}
