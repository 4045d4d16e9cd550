//! Stage 4 configuration (`config/stage4_link_feasibility_config.yaml`).
//!
//! Every threshold here is required — spec §4.5.1/§4.5.2: "the exact values
//! must come from configuration, not be hard-coded" / "these values come
//! from research requirements, not defaults."

use ground_station::GroundStationSite;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstellationThreshold {
    pub elevation_deg: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstellationThresholds {
    pub starlink: ConstellationThreshold,
    pub oneweb: ConstellationThreshold,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkBudgetConfig {
    pub min_distance_km: f64,
    pub max_distance_km: f64,
}

/// Elevation-degree / distance-km bin boundaries for `link_quality` (spec
/// §4.5.1: "exact bin boundaries configurable").
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkQualityBins {
    pub excellent_min_elevation_deg: f64,
    pub good_min_elevation_deg: f64,
    pub fair_min_elevation_deg: f64,
    pub excellent_max_distance_km: f64,
    pub good_max_distance_km: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AverageVisibleTarget {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstellationPoolTarget {
    pub average_visible_target: AverageVisibleTarget,
    pub minimum_visible: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolOptimizationConfig {
    pub target_coverage_rate: f64,
    pub starlink: ConstellationPoolTarget,
    pub oneweb: ConstellationPoolTarget,
    /// Stop-condition epsilon (spec §4.5.2 step 4b): minimum coverage-rate
    /// gain a further satellite must contribute to keep being added.
    pub marginal_gain_epsilon: f64,
    /// Hard ceiling on optimized-pool size, independent of coverage rate.
    pub max_pool_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage4Config {
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub kernel_dir: PathBuf,
    pub ground_station: GroundStationSite,
    pub use_iau_standards: bool,
    pub validate_epochs: bool,
    pub link_budget: LinkBudgetConfig,
    pub constellation_thresholds: ConstellationThresholds,
    pub link_quality_bins: LinkQualityBins,
    pub pool_optimization: PoolOptimizationConfig,
}

impl Stage4Config {
    pub fn threshold_for(&self, constellation: tle_ingest::Constellation) -> f64 {
        match constellation {
            tle_ingest::Constellation::Starlink => self.constellation_thresholds.starlink.elevation_deg,
            tle_ingest::Constellation::Oneweb => self.constellation_thresholds.oneweb.elevation_deg,
        }
    }

    pub fn pool_target_for(&self, constellation: tle_ingest::Constellation) -> &ConstellationPoolTarget {
        match constellation {
            tle_ingest::Constellation::Starlink => &self.pool_optimization.starlink,
            tle_ingest::Constellation::Oneweb => &self.pool_optimization.oneweb,
        }
    }
}
