//! Stage 6 data model (spec §3 "Events and dataset", §9 "Event
//! enumeration").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tle_ingest::Constellation;

/// The measurement tuple that triggered an event, common to every event
/// type (spec §9: "a common `trigger_context` record holding the
/// measurement tuple").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TriggerContext {
    pub serving_rsrp_dbm: f64,
    pub serving_cell_individual_offset_db: f64,
    pub serving_frequency_offset_db: f64,
    pub neighbor_rsrp_dbm: f64,
    pub neighbor_cell_individual_offset_db: f64,
    pub neighbor_frequency_offset_db: f64,
    pub serving_ground_distance_km: f64,
    pub neighbor_ground_distance_km: f64,
}

/// 3GPP TS 38.331 handover measurement-report events, as a sum type rather
/// than a runtime-compared string tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum Event {
    A3 { offset_db: f64, hysteresis_db: f64, neighbor_id: u32 },
    A4 { threshold_dbm: f64, neighbor_id: u32 },
    A5 { threshold_1_dbm: f64, threshold_2_dbm: f64, neighbor_id: u32 },
    D2 { threshold1_km: f64, threshold2_km: f64, neighbor_id: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    pub time_instant: DateTime<Utc>,
    pub serving_satellite_id: u32,
    pub candidate_neighbor_satellite_id: u32,
    pub trigger_context: TriggerContext,
    pub handover_recommended: bool,
}

/// Per-instant, per-constellation visible-count snapshot (spec §4.7
/// "dynamic-pool verification").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolStatusPoint {
    pub timestamp: DateTime<Utc>,
    pub connectable_count: usize,
    pub meets_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DynamicPoolVerification {
    pub time_series: Vec<PoolStatusPoint>,
    pub coverage_rate: f64,
    pub minimum_visible: usize,
    pub maximum_visible: usize,
}

/// One per-time-point record inside a training episode (spec §4.7:
/// "timestamp, constellation, elevation, azimuth, distance, RSRP/RSRQ/SINR,
/// atmospheric loss, Doppler, radial velocity, propagation delay, A3
/// offsets").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpisodeStep {
    pub timestamp: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub distance_km: f64,
    pub rsrp_dbm: f64,
    pub rsrq_db: f64,
    pub sinr_db: f64,
    pub atmospheric_loss_db: f64,
    pub doppler_shift_hz: f64,
    pub radial_velocity_km_s: f64,
    pub propagation_delay_seconds: f64,
    pub cell_individual_offset_db: f64,
    pub offset_mo_db: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingEpisode {
    pub satellite_id: u32,
    pub name: String,
    pub constellation: Constellation,
    pub orbital_period_minutes: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub steps: Vec<EpisodeStep>,
    pub split: DatasetSplit,
    /// Carried through from the Stage 5 points this episode summarizes —
    /// spec §4.7 validator check "GPP-standard compliance tags present".
    pub calculation_standard: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventCountSummary {
    pub a3_count: usize,
    pub a4_count: usize,
    pub a5_count: usize,
    pub d2_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stage6Metadata {
    pub event_counts: EventCountSummary,
    pub total_satellites_considered: usize,
    pub dataset_start_time: Option<DateTime<Utc>>,
    pub dataset_end_time: Option<DateTime<Utc>>,
    pub train_episode_count: usize,
    pub validation_episode_count: usize,
    pub test_episode_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage6Output {
    pub events: Vec<EventRecord>,
    /// Keyed by constellation display name.
    pub pool_verification: BTreeMap<String, DynamicPoolVerification>,
    pub episodes: Vec<TrainingEpisode>,
    pub metadata: Stage6Metadata,
}
