//! 3GPP TS 38.331 A3/A4/A5/D2 event detection (spec §4.7).
//!
//! All four conditions are evaluated pairwise, serving vs. each candidate
//! neighbor, at one time instant.

use crate::config::{A3Config, A4Config, A5Config, D2Thresholds};
use crate::types::{Event, EventRecord, TriggerContext};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub struct CandidateMeasurement {
    pub satellite_id: u32,
    pub rsrp_dbm: f64,
    pub cell_individual_offset_db: f64,
    pub offset_mo_db: f64,
    pub ground_distance_km: f64,
}

fn trigger_context(serving: &CandidateMeasurement, neighbor: &CandidateMeasurement) -> TriggerContext {
    TriggerContext {
        serving_rsrp_dbm: serving.rsrp_dbm,
        serving_cell_individual_offset_db: serving.cell_individual_offset_db,
        serving_frequency_offset_db: serving.offset_mo_db,
        neighbor_rsrp_dbm: neighbor.rsrp_dbm,
        neighbor_cell_individual_offset_db: neighbor.cell_individual_offset_db,
        neighbor_frequency_offset_db: neighbor.offset_mo_db,
        serving_ground_distance_km: serving.ground_distance_km,
        neighbor_ground_distance_km: neighbor.ground_distance_km,
    }
}

/// A3: `M_neighbor + Ocn + Ofn - Hys > M_serving + Ofp + Ofs + offset_db`.
fn check_a3(serving: &CandidateMeasurement, neighbor: &CandidateMeasurement, cfg: &A3Config) -> bool {
    let lhs = neighbor.rsrp_dbm + neighbor.cell_individual_offset_db + neighbor.offset_mo_db - cfg.hysteresis_db;
    let rhs = serving.rsrp_dbm + serving.cell_individual_offset_db + serving.offset_mo_db + cfg.offset_db;
    lhs > rhs
}

/// A4: `M_neighbor + Ocn + Ofn - Hys > threshold_dbm`. Shares the A3
/// hysteresis parameter — spec's configuration list gives A4 only
/// `threshold_dbm`, so the generic `Hys` term in its formula is the same
/// hysteresis value A3 uses.
fn check_a4(neighbor: &CandidateMeasurement, hysteresis_db: f64, cfg: &A4Config) -> bool {
    let lhs = neighbor.rsrp_dbm + neighbor.cell_individual_offset_db + neighbor.offset_mo_db - hysteresis_db;
    lhs > cfg.threshold_dbm
}

/// A5: serving below threshold1 AND neighbor above threshold2,
/// simultaneously.
fn check_a5(
    serving: &CandidateMeasurement,
    neighbor: &CandidateMeasurement,
    hysteresis_db: f64,
    cfg: &A5Config,
) -> bool {
    let serving_below = serving.rsrp_dbm + hysteresis_db < cfg.threshold_1_dbm;
    let neighbor_above =
        neighbor.rsrp_dbm + neighbor.cell_individual_offset_db + neighbor.offset_mo_db - hysteresis_db
            > cfg.threshold_2_dbm;
    serving_below && neighbor_above
}

/// D2: serving ground-projection distance exceeds threshold1 AND
/// neighbor's is below threshold2.
fn check_d2(serving: &CandidateMeasurement, neighbor: &CandidateMeasurement, cfg: &D2Thresholds) -> bool {
    serving.ground_distance_km > cfg.threshold1_km && neighbor.ground_distance_km < cfg.threshold2_km
}

#[allow(clippy::too_many_arguments)]
pub fn detect_events(
    time_instant: DateTime<Utc>,
    serving: &CandidateMeasurement,
    neighbors: &[CandidateMeasurement],
    a3: &A3Config,
    a4: &A4Config,
    a5: &A5Config,
    d2: &D2Thresholds,
) -> Vec<EventRecord> {
    let mut events = Vec::new();
    for neighbor in neighbors {
        if neighbor.satellite_id == serving.satellite_id {
            continue;
        }
        let context = trigger_context(serving, neighbor);

        if check_a3(serving, neighbor, a3) {
            events.push(EventRecord {
                event: Event::A3 {
                    offset_db: a3.offset_db,
                    hysteresis_db: a3.hysteresis_db,
                    neighbor_id: neighbor.satellite_id,
                },
                time_instant,
                serving_satellite_id: serving.satellite_id,
                candidate_neighbor_satellite_id: neighbor.satellite_id,
                trigger_context: context,
                handover_recommended: true,
            });
        }

        if check_a4(neighbor, a3.hysteresis_db, a4) {
            events.push(EventRecord {
                event: Event::A4 {
                    threshold_dbm: a4.threshold_dbm,
                    neighbor_id: neighbor.satellite_id,
                },
                time_instant,
                serving_satellite_id: serving.satellite_id,
                candidate_neighbor_satellite_id: neighbor.satellite_id,
                trigger_context: context,
                // A4 is a neighbor-quality report, not a comparative
                // serving-vs-neighbor condition — it does not by itself
                // imply the serving link has degraded.
                handover_recommended: false,
            });
        }

        if check_a5(serving, neighbor, a3.hysteresis_db, a5) {
            events.push(EventRecord {
                event: Event::A5 {
                    threshold_1_dbm: a5.threshold_1_dbm,
                    threshold_2_dbm: a5.threshold_2_dbm,
                    neighbor_id: neighbor.satellite_id,
                },
                time_instant,
                serving_satellite_id: serving.satellite_id,
                candidate_neighbor_satellite_id: neighbor.satellite_id,
                trigger_context: context,
                handover_recommended: true,
            });
        }

        if check_d2(serving, neighbor, d2) {
            events.push(EventRecord {
                event: Event::D2 {
                    threshold1_km: d2.threshold1_km,
                    threshold2_km: d2.threshold2_km,
                    neighbor_id: neighbor.satellite_id,
                },
                time_instant,
                serving_satellite_id: serving.satellite_id,
                candidate_neighbor_satellite_id: neighbor.satellite_id,
                trigger_context: context,
                handover_recommended: true,
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap()
    }

    fn measurement(id: u32, rsrp_dbm: f64, ground_distance_km: f64) -> CandidateMeasurement {
        CandidateMeasurement {
            satellite_id: id,
            rsrp_dbm,
            cell_individual_offset_db: 0.0,
            offset_mo_db: 0.0,
            ground_distance_km,
        }
    }

    #[test]
    fn a3_triggers_when_neighbor_clears_offset_and_hysteresis() {
        let serving = measurement(1, -35.2, 100.0);
        let neighbors = vec![measurement(2, -31.1, 100.0)];
        let a3 = A3Config { offset_db: 3.0, hysteresis_db: 2.0 };
        let a4 = A4Config { threshold_dbm: -100.0 };
        let a5 = A5Config { threshold_1_dbm: -110.0, threshold_2_dbm: -110.0 };
        let d2 = D2Thresholds { threshold1_km: 1e9, threshold2_km: 0.0 };
        let events = detect_events(instant(), &serving, &neighbors, &a3, &a4, &a5, &d2);
        assert!(events.iter().any(|e| matches!(e.event, Event::A3 { .. })));
    }

    #[test]
    fn a3_does_not_trigger_against_itself() {
        let serving = measurement(1, -35.2, 100.0);
        let neighbors = vec![measurement(1, -35.2, 100.0)];
        let a3 = A3Config { offset_db: 0.0, hysteresis_db: 0.0 };
        let a4 = A4Config { threshold_dbm: -200.0 };
        let a5 = A5Config { threshold_1_dbm: -200.0, threshold_2_dbm: -200.0 };
        let d2 = D2Thresholds { threshold1_km: 1e9, threshold2_km: 1e9 };
        let events = detect_events(instant(), &serving, &neighbors, &a3, &a4, &a5, &d2);
        assert!(events.is_empty());
    }

    #[test]
    fn d2_requires_both_distance_conditions() {
        let serving = measurement(1, -40.0, 2000.0);
        let neighbors = vec![measurement(2, -45.0, 500.0)];
        let a3 = A3Config { offset_db: 1000.0, hysteresis_db: 0.0 };
        let a4 = A4Config { threshold_dbm: 1000.0 };
        let a5 = A5Config { threshold_1_dbm: -1000.0, threshold_2_dbm: 1000.0 };
        let d2 = D2Thresholds { threshold1_km: 1500.0, threshold2_km: 1000.0 };
        let events = detect_events(instant(), &serving, &neighbors, &a3, &a4, &a5, &d2);
        assert!(events.iter().any(|e| matches!(e.event, Event::D2 { .. })));
    }
}
