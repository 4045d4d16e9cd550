//! Stage 2 core processor: parallel SGP4 propagation over the unified time
//! window (spec §4.3, §5 "data-parallel worker pool keyed by satellite").

use crate::config::Stage2Config;
use crate::propagation::propagate_series;
use crate::time_window::UnifiedTimeWindowManager;
use crate::types::{SatelliteTemeSeries, Stage2Metadata, Stage2Output};
use orbit_core::stage::StageProcessor;
use orbit_core::workers::{choose_worker_count, CpuThresholds};
use orbit_core::{PipelineError, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tle_ingest::Stage1Output;

pub struct Stage2Core {
    config: Stage2Config,
}

impl Stage2Core {
    pub fn run(&self, stage1: &Stage1Output) -> Result<Stage2Output> {
        let manager = UnifiedTimeWindowManager::new(
            &self.config.time_series,
            &self.config.constellation_orbital_periods,
            self.config.coverage_cycles,
            stage1.epoch_analysis.recommended_reference_epoch,
        )?;

        let worker_count = choose_worker_count(CpuThresholds::default());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .map_err(|e| PipelineError::StageFailed(format!("thread pool build failed: {e}")))?;

        let failed: Mutex<Vec<u32>> = Mutex::new(Vec::new());

        let satellites: Vec<SatelliteTemeSeries> = pool.install(|| {
            stage1
                .satellites
                .par_iter()
                .filter_map(|record| {
                    let timestamps = manager.generate(record);
                    match propagate_series(record, &timestamps) {
                        Ok(time_series) => Some(SatelliteTemeSeries {
                            satellite_id: record.satellite_id,
                            name: record.name.clone(),
                            constellation: record.constellation,
                            orbital_period_minutes: self
                                .config
                                .constellation_orbital_periods
                                .minutes_for(record.constellation),
                            time_series,
                        }),
                        Err(e) => {
                            tracing::warn!(
                                "propagation failed for satellite {}: {e}",
                                record.satellite_id
                            );
                            failed.lock().unwrap().push(record.satellite_id);
                            None
                        }
                    }
                })
                .collect()
        });

        if satellites.is_empty() {
            return Err(PipelineError::StageFailed(
                "all satellites failed propagation".to_string(),
            ));
        }

        let failed_satellite_ids = failed.into_inner().unwrap();
        let metadata = Stage2Metadata {
            coordinate_system: orbit_core::constants::COORDINATE_SYSTEM_TEME.to_string(),
            propagation_method: orbit_core::constants::PROPAGATION_METHOD_SGP4.to_string(),
            tle_reparse_prohibited: orbit_core::constants::TLE_REPARSE_PROHIBITED,
            epoch_datetime_source: orbit_core::constants::EPOCH_DATETIME_SOURCE_STAGE1.to_string(),
            coverage_cycles: self.config.coverage_cycles,
            interval_seconds: self.config.time_series.interval_seconds,
            worker_count,
            failed_propagations: failed_satellite_ids.len(),
            failed_satellite_ids,
        };

        Ok(Stage2Output {
            satellites,
            metadata,
        })
    }
}

pub struct Stage2Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage2Processor {
    type Config = Stage2Config;
    type CoreProcessor = Stage2Core;
    type Output = Stage2Output;

    const STAGE_ID: u8 = 2;
    const STAGE_NAME: &'static str = "Orbital Propagation";

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
        Ok(Stage2Core { config })
    }

    fn run_core(
        &self,
        processor: &Self::CoreProcessor,
        previous_output: Option<Value>,
    ) -> Result<Self::Output> {
        let previous = previous_output
            .ok_or_else(|| PipelineError::NoPreviousOutput("stage1".to_string()))?;
        let stage1: Stage1Output = serde_json::from_value(previous)?;
        processor.run(&stage1)
    }
}
