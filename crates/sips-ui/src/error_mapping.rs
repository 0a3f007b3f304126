//! Maps pipeline errors to sips_core::AppError for consistent user-facing messages.

use sips_core::{AppError, CafeSearchError, LocationAccessError};

use crate::finder::FinderError;

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        match e {
            FinderError::Location(e) => AppError::Location(LocationAccessError::from(e)),
            FinderError::Search(e) => AppError::Search(CafeSearchError::from(e)),
            FinderError::Storage(e) => AppError::Storage(e),
        }
    }
}
