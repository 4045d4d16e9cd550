//! Stage 3 configuration (`config/stage3_coordinate_transform_config.yaml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Stage3Config {
    pub output_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    /// SOURCE: spec.md §4.4/§5 — directory of IAU-standard ephemeris/Earth-
    /// orientation kernels (`de440s.bsp`, `pck08.pca`,
    /// `earth_latest_high_prec.bpc`), loaded once per process.
    pub kernel_dir: PathBuf,
    /// IERS polar motion pole offsets for this run, arcsec. This is an
    /// offline batch pipeline (spec §9 Non-goals: no live IERS bulletin
    /// fetch), so the operator supplies the bulletin value current at
    /// processing time rather than the pipeline fetching it itself.
    /// SOURCE: IERS Bulletin A, operator-supplied per run.
    pub polar_motion_xp_arcsec: f64,
    pub polar_motion_yp_arcsec: f64,
}
