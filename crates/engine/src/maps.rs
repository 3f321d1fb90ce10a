//! Map URL helpers for the rendering collaborator
//!
//! The engine has no rendering responsibility; these produce the links
//! a report layer attaches to query results.

/// OpenStreetMap URL for a point, e.g.
/// `http://www.openstreetmap.org/#map=14/51.0640/-1.7820`
pub fn open_street_map_url(lat: f64, lon: f64, zoom: u8) -> String {
    format!("http://www.openstreetmap.org/#map={zoom}/{lat:.4}/{lon:.4}")
}

/// Google Maps URL for a point
pub fn google_maps_url(lat: f64, lon: f64, zoom: u8) -> String {
    format!("http://maps.google.com/maps?hl=en&ie=UTF8&z={zoom}&ll={lat:.6},{lon:.6}&t=m")
}
