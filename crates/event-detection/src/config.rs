//! Stage 6 configuration (`config/stage6_event_detection_config.yaml`).
//!
//! spec §6: "Stage 6: A3 `offset_db`, `hysteresis_db`; A4 `threshold_dbm`;
//! A5 `threshold_1_dbm`, `threshold_2_dbm`; D2 per-constellation
//! `{threshold1_km, threshold2_km}`."

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct A3Config {
    pub offset_db: f64,
    pub hysteresis_db: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct A4Config {
    pub threshold_dbm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct A5Config {
    pub threshold_1_dbm: f64,
    pub threshold_2_dbm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct D2Thresholds {
    pub threshold1_km: f64,
    pub threshold2_km: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct D2Config {
    pub starlink: D2Thresholds,
    pub oneweb: D2Thresholds,
}

/// Dynamic-pool visible-count target for one constellation (spec §4.7:
/// "Starlink 10-15, OneWeb 3-6").
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolTarget {
    pub minimum_visible: usize,
    pub maximum_visible: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolTargets {
    pub starlink: PoolTarget,
    pub oneweb: PoolTarget,
    pub coverage_rate_floor: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSplitConfig {
    pub train_fraction: f64,
    pub validation_fraction: f64,
    pub test_fraction: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage6Config {
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub ground_station: ground_station::GroundStationSite,
    pub a3: A3Config,
    pub a4: A4Config,
    pub a5: A5Config,
    pub d2: D2Config,
    pub pool_targets: PoolTargets,
    pub dataset_split: DatasetSplitConfig,
}

impl Stage6Config {
    pub fn d2_thresholds_for(&self, constellation: tle_ingest::Constellation) -> &D2Thresholds {
        match constellation {
            tle_ingest::Constellation::Starlink => &self.d2.starlink,
            tle_ingest::Constellation::Oneweb => &self.d2.oneweb,
        }
    }

    pub fn pool_target_for(&self, constellation: tle_ingest::Constellation) -> &PoolTarget {
        match constellation {
            tle_ingest::Constellation::Starlink => &self.pool_targets.starlink,
            tle_ingest::Constellation::Oneweb => &self.pool_targets.oneweb,
        }
    }
}
