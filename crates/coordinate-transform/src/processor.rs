//! Stage 3 core processor: parallel TEME->ITRF->WGS84 conversion (spec
//! §4.4, §5 "data-parallel worker pool keyed by satellite").

use crate::config::Stage3Config;
use crate::frames::teme_to_itrf;
use crate::geodetic::itrf_to_geodetic;
use crate::types::{GeodeticPoint, SatelliteGeodeticSeries, Stage3Metadata, Stage3Output};
use anise::prelude::Almanac;
use orbit_core::almanac::{chrono_to_hifitime, load_almanac};
use orbit_core::stage::StageProcessor;
use orbit_core::workers::{choose_worker_count, CpuThresholds};
use orbit_core::{PipelineError, Result};
use orbital_mechanics::Stage2Output;
use rayon::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct Stage3Core {
    config: Stage3Config,
    almanac: Almanac,
}

impl Stage3Core {
    pub fn run(&self, stage2: &Stage2Output) -> Result<Stage3Output> {
        let worker_count = choose_worker_count(CpuThresholds::default());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .map_err(|e| PipelineError::StageFailed(format!("thread pool build failed: {e}")))?;

        let failed: Mutex<Vec<u32>> = Mutex::new(Vec::new());
        let total_points: Mutex<usize> = Mutex::new(0);

        let satellites: Vec<SatelliteGeodeticSeries> = pool.install(|| {
            stage2
                .satellites
                .par_iter()
                .filter_map(|series| {
                    let mut time_series = Vec::with_capacity(series.time_series.len());
                    for point in &series.time_series {
                        let epoch = chrono_to_hifitime(point.timestamp);
                        let itrf_km = teme_to_itrf(
                            point.position_km,
                            epoch,
                            self.config.polar_motion_xp_arcsec,
                            self.config.polar_motion_yp_arcsec,
                        );
                        match itrf_to_geodetic(&self.almanac, itrf_km, epoch) {
                            Ok((latitude_deg, longitude_deg, altitude_km)) => {
                                time_series.push(GeodeticPoint {
                                    timestamp: point.timestamp,
                                    latitude_deg,
                                    longitude_deg,
                                    altitude_km,
                                });
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "geodetic conversion failed for satellite {} at {}: {e}",
                                    series.satellite_id,
                                    point.timestamp
                                );
                            }
                        }
                    }

                    if time_series.is_empty() {
                        failed.lock().unwrap().push(series.satellite_id);
                        return None;
                    }

                    *total_points.lock().unwrap() += time_series.len();
                    Some(SatelliteGeodeticSeries {
                        satellite_id: series.satellite_id,
                        name: series.name.clone(),
                        constellation: series.constellation,
                        time_series,
                    })
                })
                .collect()
        });

        if satellites.is_empty() {
            return Err(PipelineError::StageFailed(
                "all satellites failed coordinate transformation".to_string(),
            ));
        }

        let failed_satellite_ids = failed.into_inner().unwrap();
        let metadata = Stage3Metadata {
            reference_frame_chain: "TEME->PEF(GAST)->ITRF93(polar motion)->WGS84".to_string(),
            iau_model: "ANISE EARTH_ITRF93 (IAU SPICE frame kit)".to_string(),
            total_points_converted: total_points.into_inner().unwrap(),
            failed_satellite_ids,
        };

        Ok(Stage3Output {
            satellites,
            metadata,
        })
    }
}

pub struct Stage3Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage3Processor {
    type Config = Stage3Config;
    type CoreProcessor = Stage3Core;
    type Output = Stage3Output;

    const STAGE_ID: u8 = 3;
    const STAGE_NAME: &'static str = "Coordinate Transformation";

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
        Ok(Stage3Core { config, almanac })
    }

    fn run_core(
        &self,
        processor: &Self::CoreProcessor,
        previous_output: Option<Value>,
    ) -> Result<Self::Output> {
        let previous = previous_output
            .ok_or_else(|| PipelineError::NoPreviousOutput("stage2".to_string()))?;
        let stage2: Stage2Output = serde_json::from_value(previous)?;
        processor.run(&stage2)
    }
}
