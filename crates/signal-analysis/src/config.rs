//! Stage 5 configuration (`config/stage5_signal_analysis_config.yaml`).
//!
//! Every physical parameter is config-sourced (spec §4.6: "carrier
//! frequency, EIRP, antenna, receiver noise figure, atmospheric state, and
//! bandwidth must all come from configuration with SOURCE annotations — no
//! hard-coded defaults").

use ground_station::GroundStationSite;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransmitterConfig {
    pub carrier_frequency_hz: f64,
    pub eirp_dbw: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiverConfig {
    pub antenna_diameter_m: f64,
    pub aperture_efficiency: f64,
    pub noise_figure_db: f64,
    pub system_temperature_k: f64,
    /// 3GPP TS 38.104 channel bandwidth.
    pub bandwidth_hz: f64,
    /// 3GPP TS 38.211 §4.3.2 subcarrier spacing, used for resource-block
    /// count in the RSRQ formula.
    pub subcarrier_spacing_hz: f64,
    pub n_resource_blocks: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InterferenceConfig {
    /// In-band interference is computed from other optimized-pool
    /// satellites in the same constellation at the same instant (spec §9
    /// Open Question resolution) and summed with this baseline floor,
    /// which represents out-of-constellation/system noise the pipeline
    /// does not otherwise model.
    pub baseline_noise_floor_dbm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AtmosphericConfig {
    pub temperature_k: f64,
    pub pressure_hpa: f64,
    pub water_vapor_density_g_m3: f64,
    /// Effective vertical path length (km) used by the slant-path secant
    /// scaling, SOURCE: ITU-R P.676-13 Annex 1 Table 3 mean annual
    /// zenith-path values for the configured climate zone.
    pub effective_path_length_km: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct A3EventOffsets {
    pub cell_individual_offset_db: f64,
    pub offset_mo_db: f64,
}

/// ITU-R P.618-13 §2.4.1 tropospheric-scintillation parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScintillationConfig {
    /// Average-year time percentage, p, for the fade-depth exceedance
    /// factor a(p) (Recommendation's valid range: 0.01 < p < 50).
    pub exceedance_probability_percent: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage5Config {
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    /// SOURCE: spec.md §4.4/§5 — IAU-standard ephemeris/Earth-orientation
    /// kernels, needed here (as in Stage 3) to place the ground station in
    /// the TEME frame for the line-of-sight Doppler dot product.
    pub kernel_dir: PathBuf,
    pub ground_station: GroundStationSite,
    /// IERS polar motion pole offsets for this run, arcsec — same
    /// operator-supplied values Stage 3 uses for the TEME<->ITRF chain.
    pub polar_motion_xp_arcsec: f64,
    pub polar_motion_yp_arcsec: f64,
    pub interval_seconds: u32,
    pub transmitter: TransmitterConfig,
    pub receiver: ReceiverConfig,
    pub interference: InterferenceConfig,
    pub atmospheric: AtmosphericConfig,
    pub scintillation: ScintillationConfig,
    pub a3_event_offsets: A3EventOffsets,
}
