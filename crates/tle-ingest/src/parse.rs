//! TLE record parsing and checksum validation (spec §4.2).

use crate::constants::*;
use crate::types::{ChecksumConvention, Constellation, SatelliteRecord};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use orbit_core::error::PipelineError;
use orbit_core::Result;

/// One physical three-line (name + two TLE lines) or two-line record as
/// read from a constellation file, before epoch/checksum processing.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Split a TLE file's text into raw records. Accepts both the 2-line and
/// 3-line (name header) conventions (spec §6 "TLE input format").
pub fn split_records(text: &str) -> Vec<RawRecord> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut records = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with("1 ") {
            if i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
                records.push(RawRecord {
                    name: None,
                    line1: lines[i].to_string(),
                    line2: lines[i + 1].to_string(),
                });
                i += 2;
                continue;
            }
            i += 1;
        } else {
            // Treat as a name header; the next two lines should be the TLE pair.
            if i + 2 < lines.len()
                && lines[i + 1].starts_with("1 ")
                && lines[i + 2].starts_with("2 ")
            {
                records.push(RawRecord {
                    name: Some(lines[i].trim().to_string()),
                    line1: lines[i + 1].to_string(),
                    line2: lines[i + 2].to_string(),
                });
                i += 3;
            } else {
                i += 1;
            }
        }
    }
    records
}

/// TLE line checksum: mod-10 sum of digits, with `-` counted as 1.
/// SOURCE: NORAD TLE format — checksum is the final character of each
/// line. `count_plus` controls the lenient variant some producers emit by
/// mistake (spec §4.2).
fn line_checksum(line: &str, count_plus: bool) -> u32 {
    line.chars()
        .take(68)
        .map(|c| {
            if let Some(d) = c.to_digit(10) {
                d
            } else if c == '-' {
                1
            } else if c == '+' && count_plus {
                1
            } else {
                0
            }
        })
        .sum::<u32>()
        % 10
}

fn validate_checksum(line: &str) -> Result<ChecksumConvention> {
    if line.len() < TLE_LINE_LENGTH {
        return Err(PipelineError::RecordMalformed(format!(
            "line length {} < required {TLE_LINE_LENGTH}",
            line.len()
        )));
    }
    let expected: u32 = line
        .chars()
        .nth(68)
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| PipelineError::RecordMalformed("missing checksum digit".to_string()))?;

    if line_checksum(line, false) == expected {
        Ok(ChecksumConvention::StrictDigitsAndMinus)
    } else if line_checksum(line, true) == expected {
        Ok(ChecksumConvention::LenientDigitsMinusPlus)
    } else {
        Err(PipelineError::RecordMalformed(format!(
            "checksum mismatch: expected {expected}"
        )))
    }
}

fn norad_id(line: &str) -> Result<u32> {
    line.get(NORAD_ID_COLUMNS)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| PipelineError::RecordMalformed("unparseable NORAD id".to_string()))
}

/// Compute `epoch_datetime` independently from line1 columns 19-32
/// (two-digit year, fractional day-of-year). spec §4.2: "Independently
/// compute each satellite's epoch_datetime" — never reuse a value derived
/// elsewhere.
pub fn parse_epoch(line1: &str) -> Result<DateTime<Utc>> {
    let year_str = line1.get(EPOCH_YEAR_COLUMNS).ok_or_else(|| {
        PipelineError::RecordMalformed("line1 too short for epoch year".to_string())
    })?;
    let day_str = line1.get(EPOCH_DAY_COLUMNS).ok_or_else(|| {
        PipelineError::RecordMalformed("line1 too short for epoch day".to_string())
    })?;

    let two_digit_year: i32 = year_str
        .trim()
        .parse()
        .map_err(|_| PipelineError::RecordMalformed(format!("bad epoch year `{year_str}`")))?;
    // SOURCE: NORAD convention — years 57-99 are 1957-1999, 00-56 are 2000-2056
    // (the TLE format predates 2057 by construction).
    let full_year = if two_digit_year >= 57 {
        1900 + two_digit_year
    } else {
        2000 + two_digit_year
    };

    let fractional_day: f64 = day_str
        .trim()
        .parse()
        .map_err(|_| PipelineError::RecordMalformed(format!("bad epoch day `{day_str}`")))?;

    if !(1.0..367.0).contains(&fractional_day) {
        return Err(PipelineError::RecordMalformed(format!(
            "epoch day {fractional_day} out of range"
        )));
    }

    let jan1 = NaiveDate::from_ymd_opt(full_year, 1, 1)
        .ok_or_else(|| PipelineError::RecordMalformed(format!("bad year {full_year}")))?
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let jan1_utc = DateTime::<Utc>::from_naive_utc_and_offset(jan1, Utc);

    let whole_days = fractional_day.trunc() as i64 - 1;
    let remainder_seconds = (fractional_day.fract() * 86400.0).round() as i64;

    Ok(jan1_utc + Duration::days(whole_days) + Duration::seconds(remainder_seconds))
}

pub fn parse_mean_motion(line2: &str) -> Result<f64> {
    line2
        .get(MEAN_MOTION_COLUMNS)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| PipelineError::RecordMalformed("unparseable mean motion".to_string()))
}

/// Parse a single raw record into a normalized `SatelliteRecord`. Returns
/// `Err` for malformed records so the caller can drop and count them
/// without aborting the batch (spec §4.2 "Invalid-checksum records are
/// reported and excluded").
pub fn parse_record(raw: &RawRecord, constellation: Constellation) -> Result<SatelliteRecord> {
    if raw.line1.len() < TLE_LINE_LENGTH || raw.line2.len() < TLE_LINE_LENGTH {
        return Err(PipelineError::RecordMalformed(format!(
            "line length check failed: line1={} line2={}",
            raw.line1.len(),
            raw.line2.len()
        )));
    }

    let id1 = norad_id(&raw.line1)?;
    let id2 = norad_id(&raw.line2)?;
    if id1 != id2 {
        return Err(PipelineError::RecordMalformed(format!(
            "NORAD id mismatch between lines: {id1} vs {id2}"
        )));
    }

    let convention1 = validate_checksum(&raw.line1)?;
    let convention2 = validate_checksum(&raw.line2)?;
    // Report the stricter-failing convention if they differ; either line
    // needing leniency marks the whole record as lenient for statistics.
    let checksum_convention = if convention1 == ChecksumConvention::LenientDigitsMinusPlus
        || convention2 == ChecksumConvention::LenientDigitsMinusPlus
    {
        ChecksumConvention::LenientDigitsMinusPlus
    } else {
        ChecksumConvention::StrictDigitsAndMinus
    };

    let epoch_datetime = parse_epoch(&raw.line1)?;
    let mean_motion_rev_per_day = parse_mean_motion(&raw.line2)?;

    if !(orbit_core::constants::MIN_MEAN_MOTION_REV_PER_DAY..=orbit_core::constants::MAX_MEAN_MOTION_REV_PER_DAY)
        .contains(&mean_motion_rev_per_day)
    {
        return Err(PipelineError::RecordMalformed(format!(
            "mean motion {mean_motion_rev_per_day} rev/day outside Vallado-valid range"
        )));
    }

    let name = raw
        .name
        .clone()
        .unwrap_or_else(|| format!("SAT-{id1}"));

    Ok(SatelliteRecord {
        satellite_id: id1,
        name,
        constellation,
        tle_line1: raw.line1.clone(),
        tle_line2: raw.line2.clone(),
        epoch_datetime,
        mean_motion_rev_per_day,
        checksum_convention,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_L1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    const ISS_L2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    #[test]
    fn parses_well_formed_iss_tle() {
        let raw = RawRecord {
            name: Some("ISS (ZARYA)".to_string()),
            line1: ISS_L1.to_string(),
            line2: ISS_L2.to_string(),
        };
        let record = parse_record(&raw, Constellation::Starlink).unwrap();
        assert_eq!(record.satellite_id, 25544);
        assert_eq!(record.epoch_datetime.format("%Y").to_string(), "2020");
        assert!((record.mean_motion_rev_per_day - 15.49507896).abs() < 1e-6);
    }

    #[test]
    fn rejects_norad_id_mismatch() {
        let mut raw = RawRecord {
            name: None,
            line1: ISS_L1.to_string(),
            line2: ISS_L2.to_string(),
        };
        raw.line2.replace_range(2..7, "00001");
        assert!(parse_record(&raw, Constellation::Starlink).is_err());
    }

    #[test]
    fn split_records_handles_three_line_format() {
        let text = format!("ISS (ZARYA)\n{ISS_L1}\n{ISS_L2}\n");
        let records = split_records(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn split_records_handles_two_line_format() {
        let text = format!("{ISS_L1}\n{ISS_L2}\n");
        let records = split_records(&text);
        assert_eq!(records.len(), 1);
        assert!(records[0].name.is_none());
    }
}
