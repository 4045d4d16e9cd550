//! Cited TLE-format constants (spec §4.2/§6).

/// SOURCE: NORAD/Space-Track TLE format definition — both physical lines
/// are fixed at 69 characters including the checksum digit.
pub const TLE_LINE_LENGTH: usize = 69;

/// Line 1 columns 19-32 (1-indexed, inclusive) hold the epoch: two-digit
/// year followed by fractional day-of-year. SOURCE: Space-Track TLE format
/// spec, Field 8 ("Epoch").
pub const EPOCH_YEAR_COLUMNS: std::ops::Range<usize> = 18..20;
pub const EPOCH_DAY_COLUMNS: std::ops::Range<usize> = 20..32;

/// Line 2 columns 53-63 hold mean motion in revolutions/day.
/// SOURCE: Space-Track TLE format spec, Field 17 ("Mean Motion").
pub const MEAN_MOTION_COLUMNS: std::ops::Range<usize> = 52..63;

/// NORAD catalog number, columns 3-7 on both lines; must match between the
/// two physical lines of one record (spec §4.2).
pub const NORAD_ID_COLUMNS: std::ops::Range<usize> = 2..7;
