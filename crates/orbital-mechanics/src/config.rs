//! Stage 2 configuration (`config/stage2_orbital_propagation_config.yaml`).

use crate::time_window::{ConstellationOrbitalPeriods, TimeSeriesConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage2Config {
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub time_series: TimeSeriesConfig,
    /// SOURCE: spec.md §3/§8 — must be >= 1.2 for Stage 4 continuous-coverage
    /// optimization to be achievable; no default is substituted.
    pub coverage_cycles: f64,
    pub constellation_orbital_periods: ConstellationOrbitalPeriods,
}
