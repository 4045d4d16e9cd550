//! Template-method stage framework (spec §4.1).
//!
//! `StageProcessor` fixes the run sequence — print header, clean stale
//! output, load the previous stage's output, load configuration,
//! instantiate the core processor, invoke it, check the result, save a
//! validation snapshot, report a summary — while leaving `load_config` and
//! `create_processor` to each concrete stage. `execute` is a default trait
//! method precisely so stages cannot reorder or skip a step.

use crate::config::progress_suppressed;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub trait StageProcessor {
    type Config;
    type CoreProcessor;
    type Output: Serialize;

    const STAGE_ID: u8;
    const STAGE_NAME: &'static str;

    fn config_path(&self) -> PathBuf;
    fn output_dir(&self) -> PathBuf;

    fn load_config(&self, path: &Path) -> Result<Self::Config>;
    fn create_processor(&self, config: Self::Config) -> Result<Self::CoreProcessor>;

    /// Run the core processor against the previous stage's parsed output
    /// (`None` for Stage 1). This is the one piece of real stage logic;
    /// everything else in `execute` is orchestration.
    fn run_core(
        &self,
        processor: &Self::CoreProcessor,
        previous_output: Option<Value>,
    ) -> Result<Self::Output>;

    fn execute(&self, previous_output: Option<Value>) -> Result<Self::Output> {
        print_header(Self::STAGE_ID, Self::STAGE_NAME);

        clean_stale_output(&self.output_dir(), Self::STAGE_ID)?;

        let config = self.load_config(&self.config_path())?;
        let processor = self.create_processor(config)?;

        let started = std::time::Instant::now();
        let output = self.run_core(&processor, previous_output)?;
        let elapsed = started.elapsed();

        save_stage_output(&self.output_dir(), Self::STAGE_ID, &output)?;

        if !progress_suppressed() {
            tracing::info!(
                "stage {} ({}) completed in {:.2}s",
                Self::STAGE_ID,
                Self::STAGE_NAME,
                elapsed.as_secs_f64()
            );
        }

        Ok(output)
    }
}

/// Symmetric to `StageProcessor`: `validate` is composed of a
/// basic-structure check, the optional 5-check validation framework, and a
/// stage-specific check (spec §4.1).
pub trait StageValidator {
    fn stage_specific_check(
        &self,
        snapshot: &crate::snapshot::ValidationSnapshot,
    ) -> crate::snapshot::CheckDetail;

    fn validate(&self, snapshot: &crate::snapshot::ValidationSnapshot) -> (bool, String) {
        if !snapshot.has_basic_structure() {
            return (
                false,
                "basic structure check failed: missing metadata or data_summary".to_string(),
            );
        }

        let specific = self.stage_specific_check(snapshot);
        let overall = snapshot.validation_checks.overall_status && specific.passed;
        let message = format!(
            "{}/{} checks passed; stage-specific `{}`: {}",
            snapshot.validation_checks.checks_passed,
            snapshot.validation_checks.checks_performed,
            specific.name,
            specific.message
        );
        (overall, message)
    }
}

pub fn print_header(stage_id: u8, stage_name: &str) {
    let bar = "=".repeat(60);
    tracing::info!("{bar}");
    tracing::info!("STAGE {stage_id}: {stage_name}");
    tracing::info!("{bar}");
}

/// Remove any existing `stage{N}_output_*.json` files before a run (spec §5
/// "stale files are cleaned at the start of the owning stage").
pub fn clean_stale_output(dir: &Path, stage_id: u8) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    let prefix = format!("stage{stage_id}_output_");
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix) && name.ends_with(".json") {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Locate the most recently written `stage{N}_output_*.json` file.
pub fn latest_stage_output(dir: &Path, stage_id: u8) -> Result<PathBuf> {
    let prefix = format!("stage{stage_id}_output_");
    let mut candidates: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
    if dir.exists() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy().to_string();
            if name.starts_with(&prefix) && name.ends_with(".json") {
                let modified = entry.metadata()?.modified()?;
                candidates.push((modified, entry.path()));
            }
        }
    }
    candidates.sort_by_key(|(t, _)| *t);
    candidates
        .pop()
        .map(|(_, p)| p)
        .ok_or_else(|| PipelineError::NoPreviousOutput(dir.display().to_string()))
}

pub fn save_stage_output<T: Serialize>(dir: &Path, stage_id: u8, output: &T) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    let path = dir.join(format!("stage{stage_id}_output_{timestamp}.json"));
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, output)?;
    Ok(())
}
