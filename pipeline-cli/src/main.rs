//! orbit-engine: the pipeline's single entry point (spec §6).
//!
//! Accepts `--stage N` (run one stage), `--stages a-b` or `--stages a,c,e`
//! (run a subset), or no flag at all (run every stage 1 through 6). Each
//! stage's configuration lives at `<config-dir>/stageN_<name>_config.yaml`;
//! every stage reads and writes `<data-dir>/stageN_output_<timestamp>.json`
//! and `<data-dir>/stageN_validation.json` per spec §6 "one file per stage".
//!
//! Stages 4, 5, and 6 need more than one predecessor's output. Rather than
//! re-deriving that from disk structure, the orchestrator keeps every
//! stage's output in memory for the run and assembles the keyed merge
//! object (`{"stage1": ..., "stage3": ...}`, etc.) each of those stages'
//! `run_core` expects. A stage run independently of its predecessors (e.g.
//! `--stage 4` on its own) falls back to the most recent on-disk output.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use coordinate_transform::{Stage3Processor, Stage3Validator};
use event_detection::{Stage6Processor, Stage6Validator};
use link_feasibility::{Stage4Processor, Stage4Validator};
use orbit_core::config::SamplingMode;
use orbit_core::snapshot::{save_snapshot, ValidationChecks, ValidationSnapshot};
use orbit_core::stage::{latest_stage_output, StageProcessor, StageValidator};
use orbital_mechanics::{Stage2Processor, Stage2Validator};
use serde_json::Value;
use signal_analysis::{Stage5Processor, Stage5Validator};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tle_ingest::{Stage1Processor, Stage1Validator};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "orbit-engine",
    about = "LEO-handover research pipeline: TLE loading through event-detection dataset generation"
)]
struct Args {
    /// Directory holding each stage's `stageN_*_config.yaml` file.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Directory every stage reads/writes `stageN_output_*.json` and
    /// `stageN_validation.json` in.
    #[arg(long, default_value = "data/pipeline_output")]
    data_dir: PathBuf,

    /// Run exactly one stage (1-6).
    #[arg(long, conflicts_with = "stages")]
    stage: Option<u8>,

    /// Run a subset of stages, e.g. `2-4` or `1,3,5`. Omit to run 1-6.
    #[arg(long)]
    stages: Option<String>,

    /// Verbose (DEBUG-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_stage_selection(args: &Args) -> Result<Vec<u8>> {
    if let Some(stage) = args.stage {
        if !(1..=6).contains(&stage) {
            bail!("--stage must be between 1 and 6, got {stage}");
        }
        return Ok(vec![stage]);
    }

    if let Some(spec) = &args.stages {
        let mut stages = Vec::new();
        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start: u8 = start.trim().parse().context("invalid stage range start")?;
                let end: u8 = end.trim().parse().context("invalid stage range end")?;
                if start > end {
                    bail!("invalid stage range `{part}`: start after end");
                }
                stages.extend(start..=end);
            } else {
                stages.push(part.parse().context("invalid stage number")?);
            }
        }
        if stages.is_empty() || stages.iter().any(|s| !(1..=6).contains(s)) {
            bail!("--stages must name only stages 1-6, got `{spec}`");
        }
        stages.sort_unstable();
        stages.dedup();
        return Ok(stages);
    }

    Ok((1..=6).collect())
}

/// Fetch a prior stage's output as JSON, preferring the value produced
/// earlier in this same run (`cache`) and falling back to the latest file
/// on disk (spec §6: a single stage can be re-run against on-disk state).
fn stage_value(cache: &HashMap<u8, Value>, data_dir: &Path, stage_id: u8) -> Result<Value> {
    if let Some(v) = cache.get(&stage_id) {
        return Ok(v.clone());
    }
    let path = latest_stage_output(data_dir, stage_id)
        .with_context(|| format!("stage {stage_id} has not produced output yet"))?;
    let file = std::fs::File::open(&path)?;
    Ok(serde_json::from_reader(file)?)
}

fn merged(pairs: &[(&str, Value)]) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    Value::Object(map)
}

fn run_stage1(config_dir: &Path, data_dir: &Path) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage1_tle_loading_config.yaml");
    let config: tle_ingest::config::Stage1Config = orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage1Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let output = processor.execute(None)?;

    let details = tle_ingest::validator::build_check_details(&output);
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 1,
        stage_name: "TLE Loading".to_string(),
        metadata: serde_json::to_value(&output.stats)?,
        data_summary: serde_json::json!({
            "satellite_count": output.satellites.len(),
            "constellations": output.stats.constellation_counts,
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage1Validator.validate(&snapshot);
    info!("stage 1 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn run_stage2(config_dir: &Path, data_dir: &Path, cache: &HashMap<u8, Value>) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage2_orbital_propagation_config.yaml");
    let config: orbital_mechanics::config::Stage2Config =
        orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage2Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let stage1_value = stage_value(cache, data_dir, 1)?;
    let stage1: tle_ingest::Stage1Output = serde_json::from_value(stage1_value.clone())?;
    let output = processor.execute(Some(stage1_value))?;

    let manager = orbital_mechanics::time_window::UnifiedTimeWindowManager::new(
        &config.time_series,
        &config.constellation_orbital_periods,
        config.coverage_cycles,
        stage1.epoch_analysis.recommended_reference_epoch,
    )?;
    let details = orbital_mechanics::validator::build_check_details(&output, &manager);
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 2,
        stage_name: "Orbital Propagation".to_string(),
        metadata: serde_json::to_value(&output.metadata)?,
        data_summary: serde_json::json!({
            "satellite_count": output.satellites.len(),
            "total_points": output.satellites.iter().map(|s| s.time_series.len()).sum::<usize>(),
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage2Validator.validate(&snapshot);
    info!("stage 2 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn run_stage3(config_dir: &Path, data_dir: &Path, cache: &HashMap<u8, Value>) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage3_coordinate_transform_config.yaml");
    let config: coordinate_transform::config::Stage3Config =
        orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage3Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let stage2_value = stage_value(cache, data_dir, 2)?;
    let stage2: orbital_mechanics::Stage2Output = serde_json::from_value(stage2_value.clone())?;
    let output = processor.execute(Some(stage2_value))?;

    let details = coordinate_transform::validator::build_check_details(&output, &stage2);
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 3,
        stage_name: "Coordinate Transformation".to_string(),
        metadata: serde_json::to_value(&output.metadata)?,
        data_summary: serde_json::json!({
            "satellite_count": output.satellites.len(),
            "total_points_converted": output.metadata.total_points_converted,
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage3Validator.validate(&snapshot);
    info!("stage 3 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn run_stage4(config_dir: &Path, data_dir: &Path, cache: &HashMap<u8, Value>) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage4_link_feasibility_config.yaml");
    let config: link_feasibility::config::Stage4Config =
        orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage4Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let stage1_value = stage_value(cache, data_dir, 1)?;
    let stage3_value = stage_value(cache, data_dir, 3)?;
    let stage2_value = stage_value(cache, data_dir, 2)?;
    let stage2: orbital_mechanics::Stage2Output = serde_json::from_value(stage2_value)?;
    let previous = merged(&[("stage1", stage1_value), ("stage3", stage3_value)]);
    let output = processor.execute(Some(previous))?;

    let orbital_period_minutes: BTreeMap<String, f64> = stage2
        .satellites
        .iter()
        .map(|s| (s.constellation.to_string(), s.orbital_period_minutes))
        .collect();
    let details = link_feasibility::validator::build_check_details(
        &output,
        &orbital_period_minutes,
        stage2.metadata.interval_seconds,
    );
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 4,
        stage_name: "Link Feasibility & Pool Optimization".to_string(),
        metadata: serde_json::to_value(&output.metadata)?,
        data_summary: serde_json::json!({
            "constellations": output.pools.keys().collect::<Vec<_>>(),
            "optimized_pool_sizes": output.pools.iter()
                .map(|(name, pool)| (name.clone(), pool.optimized_pool.len()))
                .collect::<BTreeMap<_, _>>(),
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage4Validator.validate(&snapshot);
    info!("stage 4 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn run_stage5(config_dir: &Path, data_dir: &Path, cache: &HashMap<u8, Value>) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage5_signal_analysis_config.yaml");
    let config: signal_analysis::config::Stage5Config = orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage5Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let stage2_value = stage_value(cache, data_dir, 2)?;
    let stage4_value = stage_value(cache, data_dir, 4)?;
    let previous = merged(&[("stage2", stage2_value), ("stage4", stage4_value)]);
    let output = processor.execute(Some(previous))?;

    let details = signal_analysis::validator::build_check_details(&output);
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 5,
        stage_name: "Signal Analysis".to_string(),
        metadata: serde_json::to_value(&output.metadata)?,
        data_summary: serde_json::json!({
            "constellations": output.constellations.keys().collect::<Vec<_>>(),
            "total_points_computed": output.metadata.total_points_computed,
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage5Validator.validate(&snapshot);
    info!("stage 5 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn run_stage6(config_dir: &Path, data_dir: &Path, cache: &HashMap<u8, Value>) -> Result<(Value, bool)> {
    let config_path = config_dir.join("stage6_event_detection_config.yaml");
    let config: event_detection::config::Stage6Config = orbit_core::config::load_yaml_config(&config_path)?;
    let processor = Stage6Processor {
        config_path,
        output_dir: data_dir.to_path_buf(),
    };
    let stage2_value = stage_value(cache, data_dir, 2)?;
    let stage3_value = stage_value(cache, data_dir, 3)?;
    let stage4_value = stage_value(cache, data_dir, 4)?;
    let stage4: link_feasibility::Stage4Output = serde_json::from_value(stage4_value.clone())?;
    let stage5_value = stage_value(cache, data_dir, 5)?;
    let previous = merged(&[
        ("stage2", stage2_value),
        ("stage3", stage3_value),
        ("stage4", stage4_value),
        ("stage5", stage5_value),
    ]);
    let output = processor.execute(Some(previous))?;

    let total_optimized_satellites: usize =
        stage4.pools.values().map(|p| p.optimized_pool.len()).sum();
    let details = event_detection::validator::build_check_details(&output, total_optimized_satellites);
    let sampling = SamplingMode::from_env();
    let checks = ValidationChecks::from_details(details, sampling.relaxed_thresholds());
    let snapshot = ValidationSnapshot {
        stage: 6,
        stage_name: "Event Detection & Dataset".to_string(),
        metadata: serde_json::to_value(&output.metadata)?,
        data_summary: serde_json::json!({
            "event_count": output.events.len(),
            "episode_count": output.episodes.len(),
            "train_episode_count": output.metadata.train_episode_count,
            "validation_episode_count": output.metadata.validation_episode_count,
            "test_episode_count": output.metadata.test_episode_count,
        }),
        validation_checks: checks,
        generated_at: Utc::now(),
    };
    save_snapshot(&config.snapshot_dir, &snapshot)?;
    let (passed, message) = Stage6Validator.validate(&snapshot);
    info!("stage 6 validation: {message}");

    Ok((serde_json::to_value(&output)?, passed))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stages = parse_stage_selection(&args)?;

    info!("{}", "=".repeat(60));
    info!("ORBIT ENGINE: running stage(s) {:?}", stages);
    info!("{}", "=".repeat(60));

    std::fs::create_dir_all(&args.data_dir)?;

    let mut cache: HashMap<u8, Value> = HashMap::new();
    let mut all_passed = true;

    for stage_id in stages {
        let (value, passed) = match stage_id {
            1 => run_stage1(&args.config_dir, &args.data_dir)?,
            2 => run_stage2(&args.config_dir, &args.data_dir, &cache)?,
            3 => run_stage3(&args.config_dir, &args.data_dir, &cache)?,
            4 => run_stage4(&args.config_dir, &args.data_dir, &cache)?,
            5 => run_stage5(&args.config_dir, &args.data_dir, &cache)?,
            6 => run_stage6(&args.config_dir, &args.data_dir, &cache)?,
            _ => unreachable!("parse_stage_selection only yields 1-6"),
        };
        cache.insert(stage_id, value);
        all_passed &= passed;
        if !passed {
            tracing::error!("stage {stage_id} failed validation");
        }
    }

    info!("{}", "=".repeat(60));
    info!("ORBIT ENGINE: {}", if all_passed { "all stages passed validation" } else { "one or more stages failed validation" });
    info!("{}", "=".repeat(60));

    if !all_passed {
        std::process::exit(1);
    }
    Ok(())
}
