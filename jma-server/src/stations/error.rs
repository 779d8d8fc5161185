//! Station directory error types.

use std::path::PathBuf;

use crate::domain::StationCode;

/// Errors returned by directory queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StationError {
    /// No station has the requested code
    #[error("station with code '{code}' not found")]
    NotFound { code: String },

    /// Malformed or out-of-range query input
    #[error("invalid argument `{field}`: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    /// Nearest station is farther than the allowed distance
    #[error("no station within {radius_km} km of ({lat}, {lon})")]
    NoStationNearby { lat: f64, lon: f64, radius_km: f64 },

    /// The directory holds no stations
    #[error("station directory is empty")]
    Empty,
}

impl StationError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        StationError::InvalidArgument {
            field,
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading the station table.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Table file could not be read
    #[error("failed to read station table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table is not a JSON object
    #[error("station table JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single entry failed validation
    #[error("station entry {code:?}: {message}")]
    Entry { code: String, message: String },

    /// Two records share a code
    #[error("duplicate station code {0}")]
    DuplicateCode(StationCode),

    /// Table contains no stations
    #[error("station table is empty")]
    Empty,
}
