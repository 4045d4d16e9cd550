//! Shared IAU-standard ephemeris loading (spec §4.4 "an established astronomy
//! library that implements IAU 2000A/2006 nutation, IERS polar motion, and
//! WGS84"; spec §5 "a read-only astronomy-ephemeris data file ... loaded
//! once per process").
//!
//! `coordinate-transform`, `ground-station`, `link-feasibility`, and
//! `signal-analysis` all need the same planetary-ephemeris/Earth-orientation
//! kernel set; this module is the single load path so it only happens once
//! and every stage gets identical frame behavior.

use anise::prelude::Almanac;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// SOURCE: spec.md §4.4/§5 — the pipeline's IAU-standard frame provider.
/// Kernel file names follow the JPL/IERS naming convention for the
/// short-term (DE440s) planetary ephemeris, the IAU body-orientation
/// constants, and the latest high-precision Earth-orientation (polar
/// motion + nutation) binary kernel.
pub const DE440S_BSP: &str = "de440s.bsp";
pub const PCK_PCA: &str = "pck08.pca";
pub const EARTH_ORIENTATION_BPC: &str = "earth_latest_high_prec.bpc";

/// Load the Almanac once from a directory of kernel files. Fail-fast (spec
/// §7): a missing or corrupt kernel aborts the owning stage rather than
/// falling back to a hand-rolled rotation.
pub fn load_almanac(kernel_dir: &Path) -> crate::Result<Almanac> {
    let almanac = Almanac::default();
    let almanac = almanac
        .load(kernel_dir.join(DE440S_BSP).to_str().ok_or_else(|| {
            crate::PipelineError::CorruptInput("kernel_dir is not valid UTF-8".to_string())
        })?)
        .map_err(|e| {
            crate::PipelineError::CorruptInput(format!("failed to load {DE440S_BSP}: {e}"))
        })?;
    let almanac = almanac
        .load(kernel_dir.join(PCK_PCA).to_str().unwrap())
        .map_err(|e| {
            crate::PipelineError::CorruptInput(format!("failed to load {PCK_PCA}: {e}"))
        })?;
    let almanac = almanac
        .load(kernel_dir.join(EARTH_ORIENTATION_BPC).to_str().unwrap())
        .map_err(|e| {
            crate::PipelineError::CorruptInput(format!(
                "failed to load {EARTH_ORIENTATION_BPC}: {e}"
            ))
        })?;
    Ok(almanac)
}

/// Convert a `chrono` UTC timestamp to a `hifitime::Epoch`, the time type
/// ANISE's frame transforms expect. SOURCE: hifitime leap-second-aware UTC
/// scale construction from calendar components.
pub fn chrono_to_hifitime(timestamp: DateTime<Utc>) -> hifitime::Epoch {
    hifitime::Epoch::from_gregorian_utc(
        timestamp.format("%Y").to_string().parse().unwrap_or(1970),
        timestamp.format("%m").to_string().parse().unwrap_or(1),
        timestamp.format("%d").to_string().parse().unwrap_or(1),
        timestamp.format("%H").to_string().parse().unwrap_or(0),
        timestamp.format("%M").to_string().parse().unwrap_or(0),
        timestamp.format("%S").to_string().parse().unwrap_or(0),
        timestamp.timestamp_subsec_nanos(),
    )
}

pub fn default_kernel_dir() -> PathBuf {
    PathBuf::from("data/ephemeris")
}
