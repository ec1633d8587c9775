pub mod csv;
pub mod json;

pub use self::csv::parse_csv;
pub use self::json::parse_json;

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};
use crate::core::{Route, RouteError};

/// Route shipped inside the binary, used when the primary source is unavailable
pub const BUNDLED_ROUTE: &str = include_str!("../../assets/fallback_route.json");

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of route data by looking at its leading content
pub fn detect_format(text: &str) -> InputFormat {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with('[') {
        return InputFormat::Json;
    }

    // A CSV route needs at least latitude, longitude and timestamp columns
    match trimmed.lines().next() {
        Some(header) if header.chars().filter(|&c| c == ',').count() >= 2 => InputFormat::Csv,
        _ => InputFormat::Unknown,
    }
}

/// Parse route data, auto-detecting format
pub fn parse_route(text: &str) -> Result<Route, RouteError> {
    match detect_format(text) {
        InputFormat::Json => parse_json(text),
        InputFormat::Csv => parse_csv(text),
        InputFormat::Unknown => Err(RouteError::UnknownFormat),
    }
}

/// Somewhere a route can be fetched from
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Fetch and parse the route
    async fn fetch(&self) -> Result<Route, RouteError>;
}

/// Route read from a file on disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Route, RouteError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_route(&text)
    }
}

/// Route compiled into the binary (or any in-memory text)
pub struct BundledSource {
    text: &'static str,
}

impl BundledSource {
    pub fn new(text: &'static str) -> Self {
        Self { text }
    }
}

impl Default for BundledSource {
    fn default() -> Self {
        Self::new(BUNDLED_ROUTE)
    }
}

#[async_trait]
impl RouteSource for BundledSource {
    fn describe(&self) -> String {
        "bundled route".to_string()
    }

    async fn fetch(&self) -> Result<Route, RouteError> {
        parse_route(self.text)
    }
}

/// A route together with the source that supplied it
#[derive(Debug)]
pub struct LoadedRoute {
    pub route: Route,
    pub source: String,
    pub used_fallback: bool,
}

/// Load the route from `primary`, falling back to `fallback` on any failure
///
/// A primary failure is logged, never returned. Only a failing fallback
/// produces an error.
pub async fn load_route(
    primary: &dyn RouteSource,
    fallback: &dyn RouteSource,
) -> Result<LoadedRoute, RouteError> {
    match primary.fetch().await {
        Ok(route) => {
            info!("Loaded {} waypoints from {}", route.len(), primary.describe());
            Ok(LoadedRoute {
                route,
                source: primary.describe(),
                used_fallback: false,
            })
        }
        Err(e) => {
            warn!("Route unavailable from {} ({}), using {}", primary.describe(), e, fallback.describe());
            let route = fallback.fetch().await?;
            info!("Loaded {} waypoints from {}", route.len(), fallback.describe());
            Ok(LoadedRoute {
                route,
                source: fallback.describe(),
                used_fallback: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("  [ {} ]"), InputFormat::Json);
        assert_eq!(detect_format("\u{feff}[]"), InputFormat::Json);
        assert_eq!(detect_format("lat,lng,time\n1,2,3"), InputFormat::Csv);
        assert_eq!(detect_format("hello world"), InputFormat::Unknown);
        assert_eq!(detect_format(""), InputFormat::Unknown);
    }

    #[test]
    fn test_bundled_route_parses() {
        let route = parse_route(BUNDLED_ROUTE).unwrap();
        assert!(route.is_playable());
    }

    #[tokio::test]
    async fn test_load_route_primary() {
        let primary = BundledSource::new(
            r#"[{"latitude": 1.0, "longitude": 2.0, "timestamp": "2024-01-15T08:00:00Z"}]"#,
        );
        let loaded = load_route(&primary, &BundledSource::default()).await.unwrap();

        assert!(!loaded.used_fallback);
        assert_eq!(loaded.route.len(), 1);
    }

    #[tokio::test]
    async fn test_load_route_falls_back_on_missing_file() {
        let primary = FileSource::new("/nonexistent/route-replay/route.json");
        let loaded = load_route(&primary, &BundledSource::default()).await.unwrap();

        assert!(loaded.used_fallback);
        assert_eq!(loaded.source, "bundled route");
        assert!(loaded.route.is_playable());
    }

    #[tokio::test]
    async fn test_load_route_falls_back_on_malformed_data() {
        let primary = BundledSource::new("not a route");
        let loaded = load_route(&primary, &BundledSource::default()).await.unwrap();
        assert!(loaded.used_fallback);
    }

    #[tokio::test]
    async fn test_file_source_reads_csv() {
        let path = std::env::temp_dir().join(format!("route-replay-test-{}.csv", std::process::id()));
        tokio::fs::write(
            &path,
            "latitude,longitude,timestamp\n0.0,0.0,2024-01-15T08:00:00Z\n1.0,1.0,2024-01-15T08:01:00Z\n",
        )
        .await
        .unwrap();

        let route = FileSource::new(&path).fetch().await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(route.len(), 2);
        assert_eq!(route.segment_time_delta_secs(0), Some(60.0));
    }
}
