//! Error types for the Bay Wheels client.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for all client operations.
///
/// Authentication and reservation failures keep their own enums and are
/// wrapped here, so callers can either match the wrapper or route on
/// [`BayWheelsError::category`].
#[derive(Error, Debug)]
pub enum BayWheelsError {
    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("Failed to parse station data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Reservation-specific failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Failed to create reservation: {status}")]
    CreateFailed { status: u16 },

    #[error("Failed to cancel reservation: {status}")]
    CancelFailed { status: u16 },

    #[error("Could not parse reservation response: {0}")]
    Unparseable(String),
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Reservation,
    Api,
    DataShape,
    Network,
    Configuration,
}

impl BayWheelsError {
    /// Create an API error for a non-success status.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Reservation(_) => ErrorCategory::Reservation,
            Self::Api { .. } => ErrorCategory::Api,
            Self::UnexpectedFormat(_) | Self::Parse(_) => ErrorCategory::DataShape,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// The wrapped authentication error, if any.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Self::Authentication(err) => Some(err),
            _ => None,
        }
    }

    /// The wrapped reservation error, if any.
    pub fn as_reservation(&self) -> Option<&ReservationError> {
        match self {
            Self::Reservation(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BayWheelsError>;
