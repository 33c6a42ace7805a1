//! Error types for ClickCut

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using ClickCut's Error
pub type Result<T> = std::result::Result<T, Error>;

/// ClickCut error types
#[derive(Error, Debug)]
pub enum Error {
    /// The server rejected the credential (HTTP 401). The session layer has
    /// already reacted by the time a caller sees this.
    #[error("Session rejected by server: {message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response, carrying the server-supplied message
    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Required field missing: {field}")]
    MissingField { field: &'static str },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True for the structural auth rejection handled by the session layer
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// HTTP status of a server-side failure, if there was a response at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a form banner or an empty-state placeholder.
    ///
    /// Validation errors from the server surface their own message; transport
    /// and decoding failures collapse into `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api { message, .. } if !message.is_empty() => message.clone(),
            Error::Unauthorized { .. } => {
                "Your session has ended. Run 'clickcut login' to sign in again.".to_string()
            }
            Error::InvalidDateRange { .. } | Error::MissingField { .. } => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}
