//! Median-RSRP serving-satellite selection (spec §4.7: "*Not* the
//! highest-RSRP satellite — doing so makes A3 events mathematically
//! impossible ... select the median-RSRP satellite at each time instant").

/// Returns the satellite id whose RSRP is the (lower-)median among
/// `candidates` at one time instant. `candidates` is `(satellite_id,
/// rsrp_dbm)`. Returns `None` for an empty slice.
pub fn select_median_rsrp_serving(candidates: &[(u32, f64)]) -> Option<u32> {
    if candidates.is_empty() {
        return None;
    }
    let mut sorted: Vec<(u32, f64)> = candidates.to_vec();
    sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let median_index = (sorted.len() - 1) / 2;
    Some(sorted[median_index].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_picks_the_exact_middle_value() {
        let candidates = vec![(1, -40.0), (2, -35.0), (3, -30.0)];
        assert_eq!(select_median_rsrp_serving(&candidates), Some(2));
    }

    #[test]
    fn even_count_picks_the_lower_of_the_two_middle_values() {
        let candidates = vec![(1, -40.0), (2, -35.0), (3, -32.0), (4, -30.0)];
        assert_eq!(select_median_rsrp_serving(&candidates), Some(2));
    }

    #[test]
    fn never_selects_the_maximum_when_more_than_one_candidate_exists() {
        let candidates = vec![(1, -50.0), (2, -45.0), (3, -20.0)];
        let serving = select_median_rsrp_serving(&candidates).unwrap();
        assert_ne!(serving, 3, "median selection must not degenerate into max-RSRP selection");
    }

    #[test]
    fn empty_input_returns_none() {
        assert_eq!(select_median_rsrp_serving(&[]), None);
    }
}
