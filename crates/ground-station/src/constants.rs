//! Cited constants for the single-site ground-station model.

/// SOURCE: IERS Conventions (2010), Table 1.1 — mean Earth angular velocity.
/// Used to give the station's ITRF-fixed `Orbit` a consistent rotating-frame
/// velocity so ANISE's topocentric routine sees a physically complete state.
pub const EARTH_ANGULAR_VELOCITY_RAD_S: f64 = 7.292_115e-5;

/// SOURCE: Meeus, J., "Astronomical Algorithms", 2nd ed. (1998), Ch. 16 —
/// Bennett's 1982 refraction formula, the standard closed-form approximation
/// for atmospheric refraction near the horizon where a rigorous ray-trace is
/// unnecessary for this pipeline's link-geometry purposes.
pub const REFRACTION_MODEL: &str = "Bennett 1982 (Meeus Astronomical Algorithms Ch. 16)";
