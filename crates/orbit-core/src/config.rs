//! Per-stage YAML configuration loading discipline (spec §6/§9).
//!
//! Every stage config type should `#[derive(Deserialize)]` with
//! `#[serde(deny_unknown_fields)]` so a typo or stale key fails loudly
//! instead of silently falling back to a default. There are no defaults
//! here: a missing required field is a `PipelineError::MissingConfigField`,
//! not a `serde(default)`.

use crate::error::{PipelineError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load and deserialize a stage's YAML configuration file.
///
/// Fails fast (per spec §7) if the file is missing, unreadable, or fails to
/// parse — callers should not catch this and substitute a default.
pub fn load_yaml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::CorruptInput(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    let config: T = serde_yaml::from_str(&raw).map_err(|e| {
        PipelineError::CorruptInput(format!(
            "failed to parse config file {}: {e}",
            path.display()
        ))
    })?;
    Ok(config)
}

/// Sampling mode as detected from environment or dataset-size heuristics
/// (spec §4.1 "Sampling mode is detected from an environment flag or from
/// dataset-size heuristics defined by each stage").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// `ORBIT_ENGINE_TEST_MODE=1`: sampling plus relaxed validation
    /// thresholds (spec §6).
    TestMode,
    /// `ORBIT_ENGINE_SAMPLING_MODE=1`: sampling without relaxed thresholds.
    SamplingOnly,
    Disabled,
}

impl SamplingMode {
    pub fn from_env() -> Self {
        if std::env::var("ORBIT_ENGINE_TEST_MODE").as_deref() == Ok("1") {
            SamplingMode::TestMode
        } else if std::env::var("ORBIT_ENGINE_SAMPLING_MODE").as_deref() == Ok("1") {
            SamplingMode::SamplingOnly
        } else {
            SamplingMode::Disabled
        }
    }

    pub fn is_sampling(self) -> bool {
        !matches!(self, SamplingMode::Disabled)
    }

    pub fn relaxed_thresholds(self) -> bool {
        matches!(self, SamplingMode::TestMode)
    }
}

pub fn progress_suppressed() -> bool {
    std::env::var("ORBIT_ENGINE_NO_PROGRESS").as_deref() == Ok("1")
}
