//! Centralized error types for Sips & Spots.
//!
//! This module provides a typed error hierarchy that:
//! - Lets each pipeline stage return a structured failure
//! - Provides user-friendly messages the front end can show as it sees fit
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Every stage of the discovery pipeline maps into this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Location error: {0}")]
    Location(#[from] LocationAccessError),

    #[error("Cafe search error: {0}")]
    Search(#[from] CafeSearchError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Storage(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
            AppError::Search(e) => e.user_message(),
        }
    }
}

/// Why an HTTP request to a provider failed.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Durable storage errors (saved list, location cache).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read {key}: {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write {key}: {message}")]
    WriteFailed { key: String, message: String },
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "Unable to access local data. Check permissions.",
            StorageError::ReadFailed { .. } => "Saved data could not be read.",
            StorageError::WriteFailed { .. } => "Your changes could not be saved. Please try again.",
        }
    }
}

/// Failure to obtain the user's coordinates.
#[derive(Debug, Error)]
pub enum LocationAccessError {
    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationAccessError {
    pub fn user_message(&self) -> &'static str {
        // Denial and unavailability are indistinguishable to the user.
        "Location access denied or unavailable."
    }
}

/// Failure of the nearby cafe search.
#[derive(Debug, Error)]
pub enum CafeSearchError {
    #[error("No cafes found near the current location")]
    NothingFound,

    #[error("Cafe search failed: {0}")]
    Failed(#[from] NetworkError),
}

impl CafeSearchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CafeSearchError::NothingFound => "No cafes found near you.",
            CafeSearchError::Failed(_) => "There was an error fetching cafes.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            CafeSearchError::Failed(NetworkError::Timeout).into(),
            StorageError::Unavailable("test".into()).into(),
            LocationAccessError::Denied.into(),
            CafeSearchError::NothingFound.into(),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?} has no message");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = CafeSearchError::NothingFound.into();
        assert!(matches!(app_err, AppError::Search(CafeSearchError::NothingFound)));
    }

    #[test]
    fn test_search_messages() {
        assert_eq!(
            AppError::Search(CafeSearchError::NothingFound).user_message(),
            "No cafes found near you."
        );
        assert_eq!(
            AppError::Search(CafeSearchError::Failed(NetworkError::ConnectionFailed("boom".into())))
                .user_message(),
            "There was an error fetching cafes."
        );
    }

    #[test]
    fn test_location_message_hides_cause() {
        let denied = LocationAccessError::Denied;
        let unavailable = LocationAccessError::Unavailable("no geoclue".into());
        assert_eq!(denied.user_message(), unavailable.user_message());
        assert_eq!(denied.user_message(), "Location access denied or unavailable.");
    }

    #[test]
    fn test_every_search_failure_shares_one_message() {
        let failures = vec![
            NetworkError::Timeout,
            NetworkError::ConnectionFailed("refused".into()),
            NetworkError::ServerError {
                status: 504,
                message: "gateway timeout".into(),
            },
            NetworkError::InvalidResponse("eof".into()),
        ];

        for failure in failures {
            let app: AppError = CafeSearchError::from(failure).into();
            assert_eq!(app.user_message(), "There was an error fetching cafes.");
        }
    }
}
