use crate::core::{Route, RouteError, Waypoint};

/// Parse a JSON array of `{latitude, longitude, timestamp}` objects
///
/// Entries are taken as-is; beyond what deserialization requires there is
/// no validation of coordinate ranges or timestamp ordering.
pub fn parse_json(text: &str) -> Result<Route, RouteError> {
    let waypoints: Vec<Waypoint> = serde_json::from_str(text)?;
    Route::new(waypoints)
}
