//! Stage 1 configuration (`config/stage1_tle_loading_config.yaml`).

use crate::filter::{EpochFilter, SamplingConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage1Config {
    pub tle_input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub epoch_filter: EpochFilter,
    pub sampling: SamplingConfig,
}
