//! Training-episode generation and the satellite-keyed train/validation/test
//! split (spec §4.7).

use crate::types::{DatasetSplit, EpisodeStep, TrainingEpisode};
use chrono::{DateTime, Utc};
use link_feasibility::SatelliteFeasibilitySeries;
use signal_analysis::SatelliteSignalSeries;
use std::collections::{BTreeMap, HashMap};

/// One episode per satellite: the contiguous per-time-point record over
/// exactly the points Stage 5 computed signal quality for (i.e. the
/// connectable points — spec §4.7 "episode length equals that satellite's
/// connectable-point count").
pub fn build_episode(
    feasibility: &SatelliteFeasibilitySeries,
    signal: &SatelliteSignalSeries,
    orbital_period_minutes: f64,
) -> Option<TrainingEpisode> {
    let azimuth_by_timestamp: HashMap<DateTime<Utc>, f64> = feasibility
        .time_series
        .iter()
        .map(|p| (p.timestamp, p.azimuth_deg))
        .collect();

    let mut steps = Vec::with_capacity(signal.time_series.len());
    for point in &signal.time_series {
        let azimuth_deg = match azimuth_by_timestamp.get(&point.timestamp) {
            Some(a) => *a,
            None => {
                tracing::warn!(
                    "satellite {} has a signal point at {} with no matching feasibility point",
                    signal.satellite_id,
                    point.timestamp
                );
                continue;
            }
        };
        steps.push(EpisodeStep {
            timestamp: point.timestamp,
            elevation_deg: point.elevation_deg,
            azimuth_deg,
            distance_km: point.distance_km,
            rsrp_dbm: point.rsrp_dbm,
            rsrq_db: point.rsrq_db,
            sinr_db: point.sinr_db,
            atmospheric_loss_db: point.atmospheric_loss.total_db,
            doppler_shift_hz: point.doppler_shift_hz,
            radial_velocity_km_s: point.radial_velocity_km_s,
            propagation_delay_seconds: point.propagation_delay_seconds,
            cell_individual_offset_db: point.cell_individual_offset_db,
            offset_mo_db: point.offset_mo_db,
        });
    }

    let start_time = steps.iter().map(|s| s.timestamp).min()?;
    let end_time = steps.iter().map(|s| s.timestamp).max()?;
    let calculation_standard = signal
        .time_series
        .first()
        .map(|p| p.calculation_standard.to_string())
        .unwrap_or_default();

    Some(TrainingEpisode {
        satellite_id: signal.satellite_id,
        name: signal.name.clone(),
        constellation: signal.constellation,
        orbital_period_minutes,
        start_time,
        end_time,
        steps,
        split: DatasetSplit::Train, // overwritten by `assign_splits`
        calculation_standard,
    })
}

/// Deterministic satellite-keyed 75/12.5/12.5 split — satellites sorted by
/// id, then partitioned by position, so no satellite's points ever straddle
/// two splits (spec §4.7: "no within-satellite leakage").
pub fn assign_splits(
    episodes: &mut [TrainingEpisode],
    train_fraction: f64,
    validation_fraction: f64,
) {
    let mut ids: Vec<u32> = episodes.iter().map(|e| e.satellite_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let n = ids.len();
    let train_count = ((n as f64) * train_fraction).round() as usize;
    let validation_count = ((n as f64) * validation_fraction).round() as usize;

    let mut split_by_id: BTreeMap<u32, DatasetSplit> = BTreeMap::new();
    for (i, id) in ids.into_iter().enumerate() {
        let split = if i < train_count {
            DatasetSplit::Train
        } else if i < train_count + validation_count {
            DatasetSplit::Validation
        } else {
            DatasetSplit::Test
        };
        split_by_id.insert(id, split);
    }

    for episode in episodes.iter_mut() {
        if let Some(split) = split_by_id.get(&episode.satellite_id) {
            episode.split = *split;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tle_ingest::Constellation;

    fn episode(id: u32) -> TrainingEpisode {
        let t = Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap();
        TrainingEpisode {
            satellite_id: id,
            name: format!("SAT-{id}"),
            constellation: Constellation::Starlink,
            orbital_period_minutes: 95.0,
            start_time: t,
            end_time: t,
            steps: Vec::new(),
            split: DatasetSplit::Train,
            calculation_standard: "ITU-R P.676-13 + ITU-R P.525-4 + 3GPP TS 38.214/38.215/38.331".to_string(),
        }
    }

    #[test]
    fn split_respects_roughly_75_12_5_12_5_proportions() {
        let mut episodes: Vec<TrainingEpisode> = (0..40).map(episode).collect();
        assign_splits(&mut episodes, 0.75, 0.125);
        let train = episodes.iter().filter(|e| e.split == DatasetSplit::Train).count();
        let validation = episodes.iter().filter(|e| e.split == DatasetSplit::Validation).count();
        let test = episodes.iter().filter(|e| e.split == DatasetSplit::Test).count();
        assert_eq!(train, 30);
        assert_eq!(validation, 5);
        assert_eq!(test, 5);
    }

    #[test]
    fn split_is_deterministic_and_keyed_by_satellite() {
        let mut a: Vec<TrainingEpisode> = (0..20).map(episode).collect();
        let mut b: Vec<TrainingEpisode> = (0..20).map(episode).collect();
        assign_splits(&mut a, 0.75, 0.125);
        assign_splits(&mut b, 0.75, 0.125);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.split, y.split);
        }
    }
}
