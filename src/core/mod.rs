pub mod error;
pub mod geo;
pub mod route;
pub mod waypoint;

pub use error::RouteError;
pub use route::{Bounds, Route};
pub use waypoint::{Coordinate, Waypoint};
