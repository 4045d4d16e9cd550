//! Stage 5 core processor (spec §4.6): per-timestep signal quality for
//! every satellite in every constellation's already-optimized pool.
//!
//! Like Stage 4, Stage 5 needs more than one predecessor: Stage 2 (TEME
//! position/velocity, for the line-of-sight Doppler dot product) and
//! Stage 4 (the optimized pools and their elevation/distance geometry). The
//! orchestrator passes `previous_output` as `{"stage2": <Stage2Output>,
//! "stage4": <Stage4Output>}`, continuing the keyed-merge convention Stage 4
//! established.

use crate::atmospheric::{self, AtmosphericState};
use crate::config::Stage5Config;
use crate::doppler;
use crate::link_budget;
use crate::scintillation;
use crate::types::{AtmosphericLossBreakdown, SatelliteSignalSeries, SignalPoint, Stage5Metadata, Stage5Output};
use anise::prelude::Almanac;
use chrono::{DateTime, Utc};
use coordinate_transform::frames::itrf_to_teme;
use link_feasibility::Stage4Output;
use orbit_core::almanac::{chrono_to_hifitime, load_almanac};
use orbit_core::stage::StageProcessor;
use orbit_core::workers::{choose_worker_count, CpuThresholds};
use orbit_core::{PipelineError, Result};
use orbital_mechanics::Stage2Output;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const CALCULATION_STANDARD: &str =
    "ITU-R P.676-13 + ITU-R P.618-13 + ITU-R P.525-4 + 3GPP TS 38.214/38.215/38.331";

pub struct Stage5Core {
    config: Stage5Config,
    almanac: Almanac,
}

/// Everything about a point that does not depend on sibling satellites —
/// computed in the first (embarrassingly parallel) pass.
struct PartialPoint {
    timestamp: DateTime<Utc>,
    distance_km: f64,
    elevation_deg: f64,
    free_space_path_loss_db: f64,
    atmospheric_loss: AtmosphericLossBreakdown,
    scintillation_loss_db: f64,
    rsrp_dbm: f64,
    radial_velocity_km_s: f64,
    doppler_shift_hz: f64,
    relativistic_correction_applied: bool,
    propagation_delay_seconds: f64,
}

fn orbital_speed_km_s(velocity_km_s: [f64; 3]) -> f64 {
    (velocity_km_s[0].powi(2) + velocity_km_s[1].powi(2) + velocity_km_s[2].powi(2)).sqrt()
}

impl Stage5Core {
    /// TEME-frame position of the configured ground station at `timestamp`.
    /// The ground station is fixed in ITRF, but TEME rotates with Earth's
    /// sidereal motion, so its TEME position still depends on time — it is
    /// reconstructed here via the same `GroundStationSite::to_orbit` used by
    /// Stage 4's topocentric geometry, then rotated ITRF -> TEME with
    /// `coordinate_transform::frames::itrf_to_teme`'s inverse.
    fn ground_station_teme_position_km(&self, timestamp: DateTime<Utc>) -> Result<[f64; 3]> {
        let epoch = chrono_to_hifitime(timestamp);
        let orbit = self.config.ground_station.to_orbit(&self.almanac, epoch)?;
        let pos_vel = orbit.to_cartesian_pos_vel();
        let itrf_km = [pos_vel[0], pos_vel[1], pos_vel[2]];
        Ok(itrf_to_teme(
            itrf_km,
            epoch,
            self.config.polar_motion_xp_arcsec,
            self.config.polar_motion_yp_arcsec,
        ))
    }

    fn partial_points_for(
        &self,
        distances_km: &[f64],
        elevations_deg: &[f64],
        timestamps: &[DateTime<Utc>],
        positions_km: &[[f64; 3]],
        velocities_km_s: &[[f64; 3]],
    ) -> Result<Vec<PartialPoint>> {
        let atmospheric_state = AtmosphericState {
            temperature_k: self.config.atmospheric.temperature_k,
            pressure_hpa: self.config.atmospheric.pressure_hpa,
            water_vapor_density_g_m3: self.config.atmospheric.water_vapor_density_g_m3,
        };
        let carrier_hz = self.config.transmitter.carrier_frequency_hz;
        let carrier_ghz = carrier_hz / 1e9;
        let receive_gain_db = link_budget::parabolic_antenna_gain_db(
            self.config.receiver.antenna_diameter_m,
            carrier_hz,
            self.config.receiver.aperture_efficiency,
        );

        let n = distances_km.len();
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let distance_km = distances_km[i];
            let elevation_deg = elevations_deg[i];

            let free_space_path_loss_db = link_budget::free_space_path_loss_db(distance_km, carrier_ghz);

            // Real per-species breakdown (spec §3: "atmospheric loss (total
            // with component breakdown)"), not a fabricated 70/30 split.
            let components = atmospheric::slant_path_attenuation_components_db(
                carrier_ghz,
                elevation_deg,
                &atmospheric_state,
                self.config.atmospheric.effective_path_length_km,
            );
            let atmospheric_loss = AtmosphericLossBreakdown {
                oxygen_db: components.oxygen_db,
                water_vapor_db: components.water_vapor_db,
                dry_continuum_db: components.dry_continuum_db,
                total_db: components.total_db,
            };

            let scintillation_loss_db = scintillation::scintillation_fade_db(
                carrier_ghz,
                elevation_deg,
                self.config.receiver.antenna_diameter_m,
                self.config.receiver.aperture_efficiency,
                &atmospheric_state,
                self.config.scintillation.exceedance_probability_percent,
            );

            let rsrp_dbm = link_budget::rsrp_dbm(
                self.config.transmitter.eirp_dbw,
                free_space_path_loss_db,
                atmospheric_loss.total_db,
                scintillation_loss_db,
                receive_gain_db,
            );

            // Radial velocity is the dot product of the satellite's Stage-2
            // TEME velocity with the TEME line-of-sight unit vector (spec
            // §4.6), never a range-rate finite difference.
            let ground_station_teme_km = self.ground_station_teme_position_km(timestamps[i])?;
            let line_of_sight_unit = doppler::line_of_sight_unit_vector(ground_station_teme_km, positions_km[i]);
            let radial_velocity = doppler::radial_velocity_km_s(velocities_km_s[i], line_of_sight_unit);
            let doppler_result =
                doppler::doppler_shift(radial_velocity, carrier_hz, orbital_speed_km_s(velocities_km_s[i]));

            points.push(PartialPoint {
                timestamp: timestamps[i],
                distance_km,
                elevation_deg,
                free_space_path_loss_db,
                atmospheric_loss,
                scintillation_loss_db,
                rsrp_dbm,
                radial_velocity_km_s: doppler_result.radial_velocity_km_s,
                doppler_shift_hz: doppler_result.doppler_shift_hz,
                relativistic_correction_applied: doppler_result.relativistic_correction_applied,
                propagation_delay_seconds: link_budget::propagation_delay_seconds(distance_km),
            });
        }
        Ok(points)
    }

    pub fn run(&self, stage2: &Stage2Output, stage4: &Stage4Output) -> Result<Stage5Output> {
        let velocities_by_id: HashMap<u32, &orbital_mechanics::SatelliteTemeSeries> =
            stage2.satellites.iter().map(|s| (s.satellite_id, s)).collect();

        let worker_count = choose_worker_count(CpuThresholds::default());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .map_err(|e| PipelineError::StageFailed(format!("thread pool build failed: {e}")))?;

        let failed: Mutex<Vec<u32>> = Mutex::new(Vec::new());
        let mut constellations = BTreeMap::new();

        for (name, constellation_pool) in &stage4.pools {
            // Pass 1: per-satellite geometry/propagation/Doppler, fully
            // independent of every other satellite in the pool.
            let partial: Vec<(u32, String, tle_ingest::Constellation, Vec<PartialPoint>)> = pool.install(|| {
                constellation_pool
                    .optimized_pool
                    .par_iter()
                    .filter_map(|feasibility_series| {
                        let teme = match velocities_by_id.get(&feasibility_series.satellite_id) {
                            Some(t) => t,
                            None => {
                                failed.lock().unwrap().push(feasibility_series.satellite_id);
                                return None;
                            }
                        };
                        if teme.time_series.len() != feasibility_series.time_series.len() {
                            tracing::warn!(
                                "satellite {} time series length mismatch between stage2 ({}) and stage4 ({})",
                                feasibility_series.satellite_id,
                                teme.time_series.len(),
                                feasibility_series.time_series.len()
                            );
                            failed.lock().unwrap().push(feasibility_series.satellite_id);
                            return None;
                        }
                        let distances_km: Vec<f64> =
                            feasibility_series.time_series.iter().map(|p| p.distance_km).collect();
                        let elevations_deg: Vec<f64> =
                            feasibility_series.time_series.iter().map(|p| p.elevation_deg).collect();
                        let timestamps: Vec<DateTime<Utc>> =
                            feasibility_series.time_series.iter().map(|p| p.timestamp).collect();
                        let positions_km: Vec<[f64; 3]> =
                            teme.time_series.iter().map(|p| p.position_km).collect();
                        let velocities_km_s: Vec<[f64; 3]> =
                            teme.time_series.iter().map(|p| p.velocity_km_s).collect();
                        let points = match self.partial_points_for(
                            &distances_km,
                            &elevations_deg,
                            &timestamps,
                            &positions_km,
                            &velocities_km_s,
                        ) {
                            Ok(points) => points,
                            Err(e) => {
                                tracing::warn!(
                                    "satellite {} line-of-sight/Doppler computation failed: {e}",
                                    feasibility_series.satellite_id
                                );
                                failed.lock().unwrap().push(feasibility_series.satellite_id);
                                return None;
                            }
                        };
                        Some((
                            feasibility_series.satellite_id,
                            feasibility_series.name.clone(),
                            feasibility_series.constellation,
                            points,
                        ))
                    })
                    .collect()
            });

            // Build a per-instant RSRP index for the interference sum (spec
            // §9 Open Question resolution: "other optimized-pool satellites
            // in the same constellation at the same instant").
            let mut rsrp_by_instant: HashMap<DateTime<Utc>, Vec<(u32, f64)>> = HashMap::new();
            for (satellite_id, _, _, points) in &partial {
                for p in points {
                    rsrp_by_instant.entry(p.timestamp).or_default().push((*satellite_id, p.rsrp_dbm));
                }
            }

            let noise_dbm = link_budget::thermal_noise_dbm(
                self.config.receiver.system_temperature_k,
                self.config.receiver.bandwidth_hz,
                self.config.receiver.noise_figure_db,
            );
            let baseline_noise_floor_dbm = self.config.interference.baseline_noise_floor_dbm;

            let series: Vec<SatelliteSignalSeries> = partial
                .into_iter()
                .map(|(satellite_id, name, constellation, points)| {
                    let time_series = points
                        .into_iter()
                        .map(|p| {
                            let others_iter = rsrp_by_instant
                                .get(&p.timestamp)
                                .into_iter()
                                .flatten()
                                .filter(|(id, _)| *id != satellite_id)
                                .map(|(_, rsrp)| *rsrp);
                            let interference_dbm = link_budget::sum_dbm_linear(
                                std::iter::once(baseline_noise_floor_dbm).chain(others_iter),
                            );
                            let rssi_dbm = link_budget::rssi_dbm(p.rsrp_dbm, interference_dbm, noise_dbm);
                            let rsrq_db =
                                link_budget::rsrq_db(p.rsrp_dbm, rssi_dbm, self.config.receiver.n_resource_blocks);
                            let sinr_db = link_budget::sinr_db(p.rsrp_dbm, interference_dbm, noise_dbm);

                            SignalPoint {
                                timestamp: p.timestamp,
                                distance_km: p.distance_km,
                                elevation_deg: p.elevation_deg,
                                free_space_path_loss_db: p.free_space_path_loss_db,
                                atmospheric_loss: p.atmospheric_loss,
                                scintillation_loss_db: p.scintillation_loss_db,
                                rsrp_dbm: p.rsrp_dbm,
                                rsrq_db,
                                sinr_db,
                                radial_velocity_km_s: p.radial_velocity_km_s,
                                doppler_shift_hz: p.doppler_shift_hz,
                                relativistic_correction_applied: p.relativistic_correction_applied,
                                propagation_delay_seconds: p.propagation_delay_seconds,
                                cell_individual_offset_db: self.config.a3_event_offsets.cell_individual_offset_db,
                                offset_mo_db: self.config.a3_event_offsets.offset_mo_db,
                                calculation_standard: CALCULATION_STANDARD,
                            }
                        })
                        .collect();
                    SatelliteSignalSeries {
                        satellite_id,
                        name,
                        constellation,
                        time_series,
                    }
                })
                .collect();

            constellations.insert(name.clone(), series);
        }

        let total_points_computed = constellations.values().flatten().map(|s| s.time_series.len()).sum();

        Ok(Stage5Output {
            constellations,
            metadata: Stage5Metadata {
                carrier_frequency_hz: self.config.transmitter.carrier_frequency_hz,
                bandwidth_hz: self.config.receiver.bandwidth_hz,
                atmospheric_model: "ITU-R P.676-13 full spectral line".to_string(),
                path_loss_model: "ITU-R P.525-4".to_string(),
                scintillation_model: "ITU-R P.618-13".to_string(),
                failed_satellite_ids: failed.into_inner().unwrap(),
                total_points_computed,
            },
        })
    }
}

pub struct Stage5Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage5Processor {
    type Config = Stage5Config;
    type CoreProcessor = Stage5Core;
    type Output = Stage5Output;

    const STAGE_ID: u8 = 5;
    const STAGE_NAME: &'static str = "Signal Analysis";

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
        Ok(Stage5Core { config, almanac })
    }

    fn run_core(&self, processor: &Self::CoreProcessor, previous_output: Option<Value>) -> Result<Self::Output> {
        let previous =
            previous_output.ok_or_else(|| PipelineError::NoPreviousOutput("stage2+stage4".to_string()))?;
        let stage2: Stage2Output = serde_json::from_value(
            previous
                .get("stage2")
                .cloned()
                .ok_or_else(|| PipelineError::NoPreviousOutput("stage2".to_string()))?,
        )?;
        let stage4: Stage4Output = serde_json::from_value(
            previous
                .get("stage4")
                .cloned()
                .ok_or_else(|| PipelineError::NoPreviousOutput("stage4".to_string()))?,
        )?;
        processor.run(&stage2, &stage4)
    }
}
