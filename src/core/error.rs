use thiserror::Error;

/// Errors raised while building or loading a route
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route contains no waypoints")]
    Empty,

    #[error("unrecognized route format")]
    UnknownFormat,

    #[error("failed to parse JSON route: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse CSV route: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column, expected one of {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("invalid value '{value}' in row {row}, column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("failed to read route file: {0}")]
    Io(#[from] std::io::Error),
}
