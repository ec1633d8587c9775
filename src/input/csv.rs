use chrono::{DateTime, Utc};
use crate::core::{Route, RouteError, Waypoint};

const LATITUDE_COLUMNS: &[&str] = &["latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitude", "lng", "lon", "long"];
const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "time", "ts", "datetime"];

/// Parse a route from CSV text
///
/// Supports flexible column names:
/// - latitude,longitude,timestamp
/// - lat,lng,time
/// - lat,lon,ts
///
/// Extra columns are ignored. Timestamps must be RFC 3339 / ISO-8601.
pub fn parse_csv(text: &str) -> Result<Route, RouteError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?;
    let lat_idx = find_column(headers, LATITUDE_COLUMNS)?;
    let lng_idx = find_column(headers, LONGITUDE_COLUMNS)?;
    let ts_idx = find_column(headers, TIMESTAMP_COLUMNS)?;

    let mut waypoints = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Row numbers are 1-based and count the header line
        let row = row + 2;

        let latitude = parse_field::<f64>(&record, lat_idx, row, "latitude")?;
        let longitude = parse_field::<f64>(&record, lng_idx, row, "longitude")?;
        let timestamp = parse_field::<DateTime<Utc>>(&record, ts_idx, row, "timestamp")?;

        waypoints.push(Waypoint::new(latitude, longitude, timestamp));
    }

    Route::new(waypoints)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<T, RouteError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<T>().map_err(|_| RouteError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> Result<usize, RouteError> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(RouteError::MissingColumn(names))
}
