//! Stage 6 core processor (spec §4.7): event detection, dynamic-pool
//! verification, and training-episode generation.
//!
//! Stage 6 is the deepest merge point in the pipeline: it needs Stage 2
//! (orbital period, for episode metadata), Stage 3 (geodetic sub-satellite
//! points, for the D2 ground-projection distance), Stage 4 (the optimized
//! pool and its elevation/azimuth/distance/is_connectable series), and
//! Stage 5 (RSRP/RSRQ/SINR/Doppler). `previous_output` is therefore
//! `{"stage2": ..., "stage3": ..., "stage4": ..., "stage5": ...}`.

use crate::config::Stage6Config;
use crate::dataset::{assign_splits, build_episode};
use crate::events::{detect_events, CandidateMeasurement};
use crate::ground_projection::haversine_distance_km;
use crate::serving::select_median_rsrp_serving;
use crate::types::{
    DynamicPoolVerification, EventCountSummary, EventRecord, PoolStatusPoint, Stage6Metadata, Stage6Output,
};
use chrono::{DateTime, Utc};
use coordinate_transform::Stage3Output;
use link_feasibility::Stage4Output;
use orbit_core::stage::StageProcessor;
use orbit_core::{PipelineError, Result};
use orbital_mechanics::Stage2Output;
use serde_json::Value;
use signal_analysis::{SatelliteSignalSeries, Stage5Output};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

pub struct Stage6Core {
    config: Stage6Config,
}

impl Stage6Core {
    fn pool_verification(&self, stage4: &Stage4Output) -> BTreeMap<String, DynamicPoolVerification> {
        let mut out = BTreeMap::new();
        for (name, pool) in &stage4.pools {
            let constellation = match pool.optimized_pool.first() {
                Some(s) => s.constellation,
                None => continue,
            };
            let target = self.config.pool_target_for(constellation);

            let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
            for satellite in &pool.optimized_pool {
                for point in &satellite.time_series {
                    if point.is_connectable {
                        *counts.entry(point.timestamp).or_insert(0) += 1;
                    }
                }
            }

            let time_series: Vec<PoolStatusPoint> = counts
                .into_iter()
                .map(|(timestamp, connectable_count)| PoolStatusPoint {
                    timestamp,
                    connectable_count,
                    meets_target: connectable_count >= target.minimum_visible
                        && connectable_count <= target.maximum_visible,
                })
                .collect();

            let coverage_rate = if time_series.is_empty() {
                0.0
            } else {
                time_series.iter().filter(|p| p.meets_target).count() as f64 / time_series.len() as f64
            };

            out.insert(
                name.clone(),
                DynamicPoolVerification {
                    time_series,
                    coverage_rate,
                    minimum_visible: target.minimum_visible,
                    maximum_visible: target.maximum_visible,
                },
            );
        }
        out
    }

    fn events_for_constellation(
        &self,
        constellation: tle_ingest::Constellation,
        signal_series: &[SatelliteSignalSeries],
        geodetic_by_id: &HashMap<u32, HashMap<DateTime<Utc>, (f64, f64)>>,
    ) -> Vec<EventRecord> {
        let signal_by_id_ts: HashMap<u32, HashMap<DateTime<Utc>, &signal_analysis::SignalPoint>> = signal_series
            .iter()
            .map(|s| (s.satellite_id, s.time_series.iter().map(|p| (p.timestamp, p)).collect()))
            .collect();

        let mut timestamps: BTreeSet<DateTime<Utc>> = BTreeSet::new();
        for s in signal_series {
            timestamps.extend(s.time_series.iter().map(|p| p.timestamp));
        }

        let d2 = self.config.d2_thresholds_for(constellation);
        let mut events = Vec::new();

        for timestamp in timestamps {
            let mut candidates: Vec<CandidateMeasurement> = Vec::new();
            for s in signal_series {
                let Some(points) = signal_by_id_ts.get(&s.satellite_id) else { continue };
                let Some(point) = points.get(&timestamp) else { continue };
                let ground_distance_km = geodetic_by_id
                    .get(&s.satellite_id)
                    .and_then(|ts| ts.get(&timestamp))
                    .map(|(lat, lon)| {
                        haversine_distance_km(
                            self.config.ground_station.latitude_deg,
                            self.config.ground_station.longitude_deg,
                            *lat,
                            *lon,
                        )
                    })
                    .unwrap_or(f64::MAX);
                candidates.push(CandidateMeasurement {
                    satellite_id: s.satellite_id,
                    rsrp_dbm: point.rsrp_dbm,
                    cell_individual_offset_db: point.cell_individual_offset_db,
                    offset_mo_db: point.offset_mo_db,
                    ground_distance_km,
                });
            }

            if candidates.len() < 2 {
                continue;
            }

            let rsrp_pairs: Vec<(u32, f64)> = candidates.iter().map(|c| (c.satellite_id, c.rsrp_dbm)).collect();
            let Some(serving_id) = select_median_rsrp_serving(&rsrp_pairs) else { continue };
            let serving = *candidates.iter().find(|c| c.satellite_id == serving_id).unwrap();
            let neighbors: Vec<CandidateMeasurement> =
                candidates.into_iter().filter(|c| c.satellite_id != serving_id).collect();

            events.extend(detect_events(
                timestamp,
                &serving,
                &neighbors,
                &self.config.a3,
                &self.config.a4,
                &self.config.a5,
                d2,
            ));
        }

        events
    }

    pub fn run(
        &self,
        stage2: &Stage2Output,
        stage3: &Stage3Output,
        stage4: &Stage4Output,
        stage5: &Stage5Output,
    ) -> Result<Stage6Output> {
        let orbital_period_by_id: HashMap<u32, f64> =
            stage2.satellites.iter().map(|s| (s.satellite_id, s.orbital_period_minutes)).collect();

        let geodetic_by_id: HashMap<u32, HashMap<DateTime<Utc>, (f64, f64)>> = stage3
            .satellites
            .iter()
            .map(|s| {
                (
                    s.satellite_id,
                    s.time_series.iter().map(|p| (p.timestamp, (p.latitude_deg, p.longitude_deg))).collect(),
                )
            })
            .collect();

        let pool_verification = self.pool_verification(stage4);

        let mut all_events = Vec::new();
        let mut episodes = Vec::new();

        for (name, signal_series) in &stage5.constellations {
            let Some(pool) = stage4.pools.get(name) else { continue };
            let constellation = match signal_series.first().or_else(|| pool.optimized_pool.first()) {
                Some(s) => s.constellation,
                None => continue,
            };

            all_events.extend(self.events_for_constellation(constellation, signal_series, &geodetic_by_id));

            let feasibility_by_id: HashMap<u32, &link_feasibility::SatelliteFeasibilitySeries> =
                pool.optimized_pool.iter().map(|s| (s.satellite_id, s)).collect();

            for signal in signal_series {
                let Some(feasibility) = feasibility_by_id.get(&signal.satellite_id) else {
                    continue;
                };
                let orbital_period_minutes = orbital_period_by_id.get(&signal.satellite_id).copied().unwrap_or(0.0);
                if let Some(episode) = build_episode(feasibility, signal, orbital_period_minutes) {
                    episodes.push(episode);
                }
            }
        }

        assign_splits(
            &mut episodes,
            self.config.dataset_split.train_fraction,
            self.config.dataset_split.validation_fraction,
        );

        let event_counts = all_events.iter().fold(EventCountSummary::default(), |mut acc, e| {
            match e.event {
                crate::types::Event::A3 { .. } => acc.a3_count += 1,
                crate::types::Event::A4 { .. } => acc.a4_count += 1,
                crate::types::Event::A5 { .. } => acc.a5_count += 1,
                crate::types::Event::D2 { .. } => acc.d2_count += 1,
            }
            acc
        });

        let dataset_start_time = episodes.iter().map(|e| e.start_time).min();
        let dataset_end_time = episodes.iter().map(|e| e.end_time).max();
        let train_episode_count =
            episodes.iter().filter(|e| e.split == crate::types::DatasetSplit::Train).count();
        let validation_episode_count =
            episodes.iter().filter(|e| e.split == crate::types::DatasetSplit::Validation).count();
        let test_episode_count =
            episodes.iter().filter(|e| e.split == crate::types::DatasetSplit::Test).count();

        Ok(Stage6Output {
            events: all_events,
            pool_verification,
            metadata: Stage6Metadata {
                total_satellites_considered: episodes.len(),
                event_counts,
                dataset_start_time,
                dataset_end_time,
                train_episode_count,
                validation_episode_count,
                test_episode_count,
            },
            episodes,
        })
    }
}

pub struct Stage6Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage6Processor {
    type Config = Stage6Config;
    type CoreProcessor = Stage6Core;
    type Output = Stage6Output;

    const STAGE_ID: u8 = 6;
    const STAGE_NAME: &'static str = "Event Detection & Dataset";

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
        Ok(Stage6Core { config })
    }

    fn run_core(&self, processor: &Self::CoreProcessor, previous_output: Option<Value>) -> Result<Self::Output> {
        let previous = previous_output
            .ok_or_else(|| PipelineError::NoPreviousOutput("stage2+stage3+stage4+stage5".to_string()))?;
        let stage2: Stage2Output = serde_json::from_value(
            previous.get("stage2").cloned().ok_or_else(|| PipelineError::NoPreviousOutput("stage2".to_string()))?,
        )?;
        let stage3: Stage3Output = serde_json::from_value(
            previous.get("stage3").cloned().ok_or_else(|| PipelineError::NoPreviousOutput("stage3".to_string()))?,
        )?;
        let stage4: Stage4Output = serde_json::from_value(
            previous.get("stage4").cloned().ok_or_else(|| PipelineError::NoPreviousOutput("stage4".to_string()))?,
        )?;
        let stage5: Stage5Output = serde_json::from_value(
            previous.get("stage5").cloned().ok_or_else(|| PipelineError::NoPreviousOutput("stage5".to_string()))?,
        )?;
        processor.run(&stage2, &stage3, &stage4, &stage5)
    }
}
