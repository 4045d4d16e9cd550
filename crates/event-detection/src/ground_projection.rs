//! Great-circle ground-projection distance for the D2 event (spec §4.7:
//! "serving satellite's ground-projection distance from UE ... distances
//! use Stage 3 geodetic positions").
//!
//! This is sub-satellite-point-to-ground-station distance along the
//! Earth's surface, distinct from Stage 4's slant range.

/// SOURCE: IUGG mean Earth radius, used by the standard haversine formula.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0088;

/// SOURCE: Sinnott, R. W., "Virtues of the Haversine", Sky & Telescope 68(2),
/// 1984 — the standard great-circle distance formula.
pub fn haversine_distance_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlat = (lat2_deg - lat1_deg).to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    MEAN_EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_distance_for_identical_points() {
        let d = haversine_distance_km(37.7749, -122.4194, 37.7749, -122.4194);
        assert_relative_eq!(d, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn antipodal_points_span_half_the_circumference() {
        let d = haversine_distance_km(0.0, 0.0, 0.0, 180.0);
        assert_relative_eq!(d, std::f64::consts::PI * MEAN_EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn symmetric_in_both_directions() {
        let forward = haversine_distance_km(10.0, 20.0, 30.0, 40.0);
        let backward = haversine_distance_km(30.0, 40.0, 10.0, 20.0);
        assert_relative_eq!(forward, backward, epsilon = 1e-9);
    }
}
