//! Stage 4 core processor (spec §4.5): per-timestep visibility, epoch
//! validation, candidate-pool identification, greedy Set-Cover optimization.
//!
//! Unlike Stage 2/3 (each consuming exactly one predecessor), Stage 4 needs
//! both Stage 1 (satellite epochs, for epoch validation) and Stage 3
//! (geodetic positions). The orchestrator therefore passes `previous_output`
//! as a JSON object `{"stage1": <Stage1Output>, "stage3": <Stage3Output>}`
//! rather than a single stage's raw output — every stage from here on
//! follows this keyed-merge convention.

use crate::config::Stage4Config;
use crate::epoch_validation;
use crate::pool_optimization;
use crate::types::{
    ConstellationPool, FeasibilityPoint, SatelliteFeasibilitySeries, ServiceWindow, Stage4Metadata,
    Stage4Output,
};
use crate::visibility::feasibility_point;
use anise::prelude::Almanac;
use coordinate_transform::Stage3Output;
use orbit_core::almanac::load_almanac;
use orbit_core::stage::StageProcessor;
use orbit_core::workers::{choose_worker_count, CpuThresholds};
use orbit_core::{PipelineError, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tle_ingest::{SatelliteRecord, Stage1Output};

pub struct Stage4Core {
    config: Stage4Config,
    almanac: Almanac,
}

fn build_service_window(time_series: &[FeasibilityPoint]) -> Option<ServiceWindow> {
    let connectable: Vec<&FeasibilityPoint> = time_series.iter().filter(|p| p.is_connectable).collect();
    let start = connectable.iter().map(|p| p.timestamp).min()?;
    let end = connectable.iter().map(|p| p.timestamp).max()?;
    let max_elevation_deg = connectable
        .iter()
        .map(|p| p.elevation_deg)
        .fold(f64::MIN, f64::max);
    Some(ServiceWindow {
        start_time: start,
        end_time: end,
        duration_seconds: (end - start).num_seconds(),
        max_elevation_deg,
    })
}

impl Stage4Core {
    pub fn run(&self, stage1: &Stage1Output, stage3: &Stage3Output) -> Result<Stage4Output> {
        let records_by_id: HashMap<u32, &SatelliteRecord> =
            stage1.satellites.iter().map(|s| (s.satellite_id, s)).collect();

        let worker_count = choose_worker_count(CpuThresholds::default());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .map_err(|e| PipelineError::StageFailed(format!("thread pool build failed: {e}")))?;

        let failed: Mutex<Vec<u32>> = Mutex::new(Vec::new());

        let series: Vec<SatelliteFeasibilitySeries> = pool.install(|| {
            stage3
                .satellites
                .par_iter()
                .filter_map(|geo_series| {
                    let record = match records_by_id.get(&geo_series.satellite_id) {
                        Some(r) => r,
                        None => {
                            failed.lock().unwrap().push(geo_series.satellite_id);
                            return None;
                        }
                    };
                    let mut time_series = Vec::with_capacity(geo_series.time_series.len());
                    for point in &geo_series.time_series {
                        match feasibility_point(&self.almanac, &self.config, record.constellation, point) {
                            Ok(fp) => time_series.push(fp),
                            Err(e) => {
                                tracing::warn!(
                                    "visibility computation failed for satellite {}: {e}",
                                    geo_series.satellite_id
                                );
                            }
                        }
                    }
                    if time_series.is_empty() {
                        failed.lock().unwrap().push(geo_series.satellite_id);
                        return None;
                    }
                    let service_window = build_service_window(&time_series);
                    Some(SatelliteFeasibilitySeries {
                        satellite_id: geo_series.satellite_id,
                        name: geo_series.name.clone(),
                        constellation: geo_series.constellation,
                        time_series,
                        service_window,
                    })
                })
                .collect()
        });

        if series.is_empty() {
            return Err(PipelineError::StageFailed(
                "no satellite produced any visibility points".to_string(),
            ));
        }

        let epoch_validation = if self.config.validate_epochs {
            let satellites: Vec<SatelliteRecord> = series
                .iter()
                .filter_map(|s| records_by_id.get(&s.satellite_id).map(|r| (*r).clone()))
                .collect();
            let timestamps: Vec<Vec<chrono::DateTime<chrono::Utc>>> = series
                .iter()
                .map(|s| s.time_series.iter().map(|p| p.timestamp).collect())
                .collect();
            let report = epoch_validation::validate(&satellites, &timestamps);
            if !report.independence_ok {
                return Err(PipelineError::EpochIndependence(
                    "fewer than 50% distinct epochs (or 3 when satellite count is small)".to_string(),
                ));
            }
            if let Some(w) = &report.consistency_warning {
                tracing::warn!("epoch consistency warning: {w}");
            }
            if let Some(w) = &report.distribution_warning {
                tracing::warn!("epoch distribution warning: {w}");
            }
            report
        } else {
            Default::default()
        };

        let mut by_constellation: BTreeMap<String, Vec<SatelliteFeasibilitySeries>> = BTreeMap::new();
        for s in series {
            by_constellation.entry(s.constellation.to_string()).or_default().push(s);
        }

        let mut pools = BTreeMap::new();
        for (name, candidates) in by_constellation {
            let constellation = candidates[0].constellation;
            let target = self.config.pool_target_for(constellation);
            let result = pool_optimization::optimize(
                &candidates,
                target,
                self.config.pool_optimization.target_coverage_rate,
                self.config.pool_optimization.marginal_gain_epsilon,
                self.config.pool_optimization.max_pool_size,
            );
            let optimized_pool: Vec<SatelliteFeasibilitySeries> = result
                .selected_indices
                .iter()
                .map(|&idx| candidates[idx].clone())
                .collect();
            pools.insert(
                name,
                ConstellationPool {
                    connectable_satellites: candidates,
                    optimized_pool,
                    optimization_report: result.report,
                },
            );
        }

        let failed_satellite_ids = failed.into_inner().unwrap();
        Ok(Stage4Output {
            pools,
            metadata: Stage4Metadata {
                epoch_validation,
                failed_satellite_ids,
            },
        })
    }
}

pub struct Stage4Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage4Processor {
    type Config = Stage4Config;
    type CoreProcessor = Stage4Core;
    type Output = Stage4Output;

    const STAGE_ID: u8 = 4;
    const STAGE_NAME: &'static str = "Link Feasibility & Pool Optimization";

    fn config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn output_dir(&self) -> PathBuf {
        self.output_dir.clone()
    }

    fn load_config(&self, path: &Path) -> Result<Self::Config> {
        orbit_core::config::load_yaml_config(path)
    }

    fn create_processor(&self, config: Self::Config) -> Result<Self::CoreProcessor> {
        let almanac = load_almanac(&config.kernel_dir)?;
        Ok(Stage4Core { config, almanac })
    }

    fn run_core(
        &self,
        processor: &Self::CoreProcessor,
        previous_output: Option<Value>,
    ) -> Result<Self::Output> {
        let previous = previous_output
            .ok_or_else(|| PipelineError::NoPreviousOutput("stage1+stage3".to_string()))?;
        let stage1: Stage1Output = serde_json::from_value(
            previous
                .get("stage1")
                .cloned()
                .ok_or_else(|| PipelineError::NoPreviousOutput("stage1".to_string()))?,
        )?;
        let stage3: Stage3Output = serde_json::from_value(
            previous
                .get("stage3")
                .cloned()
                .ok_or_else(|| PipelineError::NoPreviousOutput("stage3".to_string()))?,
        )?;
        processor.run(&stage1, &stage3)
    }
}
