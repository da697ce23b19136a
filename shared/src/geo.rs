//! Great-circle distance and travel-time math. Pure functions, no state.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two coordinate pairs.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimated travel time in minutes at a constant speed in km/h.
pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    distance_km / speed_kmh * 60.0
}
