//! Directory-of-TLE-files ingestion (spec §4.2 Inputs, §6 "TLE input
//! format").

use crate::parse::{parse_record, split_records};
use crate::types::{Constellation, IngestStats, SatelliteRecord};
use orbit_core::error::PipelineError;
use orbit_core::Result;
use std::path::Path;

fn constellation_from_filename(path: &Path) -> Result<Constellation> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if stem.contains("starlink") {
        Ok(Constellation::Starlink)
    } else if stem.contains("oneweb") {
        Ok(Constellation::Oneweb)
    } else {
        Err(PipelineError::CorruptInput(format!(
            "cannot infer constellation from file name {}",
            path.display()
        )))
    }
}

/// Load every `*.txt` TLE file in `dir`, one file per constellation per
/// download date (spec §6). Per-record malformed entries are dropped and
/// counted, never causing the whole batch to fail-fast; a file that can't
/// be read at all is a fail-fast `CorruptInput` (spec §7).
pub fn load_directory(dir: &Path) -> Result<(Vec<SatelliteRecord>, IngestStats)> {
    if !dir.is_dir() {
        return Err(PipelineError::CorruptInput(format!(
            "TLE input directory not found: {}",
            dir.display()
        )));
    }

    let mut satellites = Vec::new();
    let mut stats = IngestStats::default();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "txt").unwrap_or(false))
        .collect();
    entries.sort();

    for path in entries {
        let constellation = constellation_from_filename(&path)?;
        let text = std::fs::read_to_string(&path)?;
        let raw_records = split_records(&text);

        for raw in raw_records {
            stats.total_records_seen += 1;
            match parse_record(&raw, constellation) {
                Ok(record) => {
                    match record.checksum_convention {
                        crate::types::ChecksumConvention::StrictDigitsAndMinus => {
                            stats.strict_checksum_count += 1
                        }
                        crate::types::ChecksumConvention::LenientDigitsMinusPlus => {
                            stats.lenient_checksum_count += 1
                        }
                    }
                    *stats
                        .constellation_counts
                        .entry(constellation.to_string())
                        .or_insert(0) += 1;
                    stats.parsed_records += 1;
                    satellites.push(record);
                }
                Err(e) => {
                    tracing::warn!("dropping malformed TLE record in {}: {e}", path.display());
                    stats.failed_records += 1;
                }
            }
        }
    }

    if satellites.is_empty() {
        return Err(PipelineError::CorruptInput(
            "no valid TLE records found in input directory".to_string(),
        ));
    }

    Ok((satellites, stats))
}
