//! JMA client error types.

use std::fmt;

/// Errors from the JMA HTTP client.
#[derive(Debug)]
pub enum JmaError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// No published data for the requested station or time
    DataUnavailable(String),

    /// Client could not be constructed or used
    Internal(String),
}

impl fmt::Display for JmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JmaError::Http(e) => write!(f, "HTTP error: {e}"),
            JmaError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            JmaError::Api { status, message } => write!(f, "JMA API error {status}: {message}"),
            JmaError::DataUnavailable(what) => write!(f, "data unavailable: {what}"),
            JmaError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for JmaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JmaError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for JmaError {
    fn from(err: reqwest::Error) -> Self {
        JmaError::Http(err)
    }
}
