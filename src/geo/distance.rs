//! Great-circle distance between login locations.

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance in kilometers between two (latitude, longitude)
/// pairs given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // rounding can push a marginally past 1.0 for near-antipodal pairs
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}
