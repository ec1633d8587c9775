use crate::core::Coordinate;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers (haversine)
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h past 1 for near-antipodal points
    let h = h.min(1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Speed in km/h for a distance covered in `seconds`
///
/// A zero, negative or non-finite time delta yields 0 instead of
/// an infinite or NaN speed.
pub fn calculate_speed(distance_km: f64, seconds: f64) -> f64 {
    if seconds <= 0.0 || !seconds.is_finite() {
        return 0.0;
    }
    distance_km / (seconds / 3600.0)
}

/// Component-wise linear blend between two coordinates
///
/// Not a great-circle interpolation. Waypoints are sampled closely enough
/// that the straight-line blend is visually indistinguishable. Returns
/// `start` exactly at `t == 0` and `end` exactly at `t == 1`.
pub fn interpolate(start: Coordinate, end: Coordinate, t: f64) -> Coordinate {
    let t = t.clamp(0.0, 1.0);
    Coordinate {
        latitude: start.latitude * (1.0 - t) + end.latitude * t,
        longitude: start.longitude * (1.0 - t) + end.longitude * t,
    }
}
