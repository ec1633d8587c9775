use serde::Serialize;
use crate::core::geo::haversine_distance;
use crate::core::{Coordinate, RouteError, Waypoint};

/// Geographic bounding box of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}

/// Immutable, ordered sequence of waypoints
///
/// Always holds at least one waypoint. The index of a waypoint is its
/// only identity.
#[derive(Debug, Clone)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.last_index()]
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// A route needs at least one segment to be played back
    pub fn is_playable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Full route polyline
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.waypoints.iter().map(Waypoint::coordinate).collect()
    }

    /// Seconds between waypoint `index` and `index + 1`
    pub fn segment_time_delta_secs(&self, index: usize) -> Option<f64> {
        let from = self.waypoints.get(index)?;
        let to = self.waypoints.get(index + 1)?;
        Some(from.seconds_until(to))
    }

    /// Great-circle length of segment `index` in kilometers
    pub fn segment_distance_km(&self, index: usize) -> Option<f64> {
        let from = self.waypoints.get(index)?;
        let to = self.waypoints.get(index + 1)?;
        Some(haversine_distance(from.coordinate(), to.coordinate()))
    }

    pub fn total_distance_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| haversine_distance(pair[0].coordinate(), pair[1].coordinate()))
            .sum()
    }

    /// Smallest box containing every waypoint, used to fit the whole route in view
    pub fn bounds(&self) -> Bounds {
        let first = self.first().coordinate();
        let (mut sw, mut ne) = (first, first);

        for wp in &self.waypoints[1..] {
            sw.latitude = sw.latitude.min(wp.latitude);
            sw.longitude = sw.longitude.min(wp.longitude);
            ne.latitude = ne.latitude.max(wp.latitude);
            ne.longitude = ne.longitude.max(wp.longitude);
        }

        Bounds {
            south_west: sw,
            north_east: ne,
        }
    }
}
