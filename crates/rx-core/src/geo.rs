//! Great-circle distance.
//!
//! Coordinates and results are `f32`.  At city/country scale the rounding
//! error is a few metres at most, and the same function produces both the
//! edge-cost floor (at ingestion) and the A* heuristic (at query time), so
//! the two stay comparable.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f32 = 6371.0088;

const EARTH_DIAMETER_KM: f32 = EARTH_RADIUS_KM * 2.0;

/// Haversine great-circle distance between two points, in kilometres.
pub fn earth_distance(lat1: f32, lon1: f32, lat2: f32, lon2: f32) -> f32 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let lon1 = lon1.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half
        + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Clamp: rounding can push `h` a hair above 1 for antipodal points.
    EARTH_DIAMETER_KM * h.sqrt().min(1.0).asin()
}
