//! Stage 5 data model (spec §3 "Signal series").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tle_ingest::Constellation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtmosphericLossBreakdown {
    pub oxygen_db: f64,
    pub water_vapor_db: f64,
    pub dry_continuum_db: f64,
    pub total_db: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalPoint {
    pub timestamp: DateTime<Utc>,
    pub distance_km: f64,
    pub elevation_deg: f64,
    pub free_space_path_loss_db: f64,
    pub atmospheric_loss: AtmosphericLossBreakdown,
    /// ITU-R P.618-13 §2.4.1 tropospheric-scintillation fade depth (dB),
    /// distinct from `atmospheric_loss` (gaseous absorption, ITU-R
    /// P.676-13): scintillation is amplitude fading from tropospheric
    /// turbulence, not absorption, and the two are additive loss terms.
    pub scintillation_loss_db: f64,
    pub rsrp_dbm: f64,
    pub rsrq_db: f64,
    pub sinr_db: f64,
    pub radial_velocity_km_s: f64,
    pub doppler_shift_hz: f64,
    pub relativistic_correction_applied: bool,
    pub propagation_delay_seconds: f64,
    /// 3GPP TS 38.331 §5.5.4.4 A3 event cell-specific offset (dB). Defaults
    /// to 0 absent per-satellite configuration — see spec §4.7 Open
    /// Question on A3 offset provenance.
    pub cell_individual_offset_db: f64,
    /// 3GPP TS 38.331 §5.5.4.4 A3 event frequency-specific offset (dB).
    pub offset_mo_db: f64,
    /// Standard tag recorded per-point so a downstream reader never has to
    /// assume which Recommendation/TS version produced a value.
    pub calculation_standard: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteSignalSeries {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub time_series: Vec<SignalPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stage5Metadata {
    pub carrier_frequency_hz: f64,
    pub bandwidth_hz: f64,
    pub atmospheric_model: String,
    pub path_loss_model: String,
    pub scintillation_model: String,
    pub failed_satellite_ids: Vec<u32>,
    pub total_points_computed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage5Output {
    /// Keyed by constellation display name, mirroring `Stage4Output::pools`
    /// — Stage 5 only computes signal quality for a constellation's
    /// already-optimized pool, never the full candidate list.
    pub constellations: std::collections::BTreeMap<String, Vec<SatelliteSignalSeries>>,
    pub metadata: Stage5Metadata,
}
