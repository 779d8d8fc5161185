//! Dispatcher error types.

use serde::Serialize;

use crate::jma::JmaError;
use crate::stations::StationError;

use super::operation::Operation;

/// Coarse classification of a failed request, stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    UnknownOperation,
    Upstream,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::Upstream => "upstream",
        }
    }
}

/// Errors from dispatching a request.
///
/// Errors raised by an operation carry the operation they came from.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No operation has this name
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// Arguments missing, malformed or out of range
    #[error("{operation}: {message}")]
    InvalidArgument {
        operation: Operation,
        message: String,
    },

    /// Station directory rejected the query
    #[error("{operation}: {source}")]
    Station {
        operation: Operation,
        #[source]
        source: StationError,
    },

    /// Remote JMA request failed
    #[error("{operation}: {source}")]
    Upstream {
        operation: Operation,
        #[source]
        source: JmaError,
    },
}

impl DispatchError {
    pub(crate) fn invalid(operation: Operation, message: impl ToString) -> Self {
        DispatchError::InvalidArgument {
            operation,
            message: message.to_string(),
        }
    }

    /// The originating error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            DispatchError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            DispatchError::Station { source, .. } => match source {
                StationError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                StationError::NotFound { .. }
                | StationError::NoStationNearby { .. }
                | StationError::Empty => ErrorKind::NotFound,
            },
            DispatchError::Upstream { source, .. } => match source {
                JmaError::DataUnavailable(_) => ErrorKind::NotFound,
                _ => ErrorKind::Upstream,
            },
        }
    }

    /// The operation that failed, if the name was recognised.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            DispatchError::UnknownOperation(_) => None,
            DispatchError::InvalidArgument { operation, .. }
            | DispatchError::Station { operation, .. }
            | DispatchError::Upstream { operation, .. } => Some(*operation),
        }
    }
}

/// Attach the failing operation to a lower-level error.
pub(crate) trait WithinOperation<T> {
    fn within(self, operation: Operation) -> Result<T, DispatchError>;
}

impl<T> WithinOperation<T> for Result<T, StationError> {
    fn within(self, operation: Operation) -> Result<T, DispatchError> {
        self.map_err(|source| DispatchError::Station { operation, source })
    }
}

impl<T> WithinOperation<T> for Result<T, JmaError> {
    fn within(self, operation: Operation) -> Result<T, DispatchError> {
        self.map_err(|source| DispatchError::Upstream { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_survive_wrapping() {
        let err: Result<(), _> = Err(StationError::NotFound {
            code: "99999".into(),
        });
        let err = err.within(Operation::GetStationInfo).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.operation(), Some(Operation::GetStationInfo));
        assert_eq!(
            err.to_string(),
            "get_station_info: station with code '99999' not found"
        );

        let err: Result<(), _> = Err(StationError::invalid("radius_km", "must be positive"));
        let err = err.within(Operation::SearchNearbyStations).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err: Result<(), _> = Err(JmaError::Api {
            status: 503,
            message: "busy".into(),
        });
        let err = err.within(Operation::GetForecast).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let err: Result<(), _> = Err(JmaError::DataUnavailable("gone".into()));
        let err = err.within(Operation::GetHistoricalWeather).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unknown_operation_has_no_operation() {
        let err = DispatchError::UnknownOperation("get_tides".into());
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
        assert_eq!(err.operation(), None);
        assert_eq!(err.to_string(), "unknown operation 'get_tides'");
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidArgument).unwrap(),
            serde_json::json!("invalid_argument")
        );
        assert_eq!(ErrorKind::Upstream.as_str(), "upstream");
    }
}
