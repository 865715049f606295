//! Error types for dashweb-core
//!
//! Every failure the list controller can run into is recovered locally;
//! these types carry enough information for the presentation layer to
//! show a toast and re-enable whatever control triggered the operation.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A page fetch failed
    FetchFailure,
    /// A delete call failed
    DeleteFailure,
    /// Item not found in the backing collection
    ItemNotFound,
    /// Backing collection cannot serve requests
    SourceUnavailable,
    /// Fixture data could not be decoded
    InvalidFixture,
    /// IO error
    IoError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailure => write!(f, "FETCH_FAILURE"),
            ErrorCode::DeleteFailure => write!(f, "DELETE_FAILURE"),
            ErrorCode::ItemNotFound => write!(f, "ITEM_NOT_FOUND"),
            ErrorCode::SourceUnavailable => write!(f, "SOURCE_UNAVAILABLE"),
            ErrorCode::InvalidFixture => write!(f, "INVALID_FIXTURE"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation failed, controller keeps its last good state
    Warning,
    /// Error - collaborator is misbehaving
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for dashweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Failed to load page {page} for '{term}': {message}")]
    FetchFailure {
        page: usize,
        term: String,
        message: String,
    },

    #[error("Failed to delete {id}: {message}")]
    DeleteFailure { id: String, message: String },

    #[error("Item not found: {id}")]
    ItemNotFound { id: String },

    #[error("Backing collection unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Invalid fixture: {message}")]
    InvalidFixture { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailure { .. } => ErrorCode::FetchFailure,
            CoreError::DeleteFailure { .. } => ErrorCode::DeleteFailure,
            CoreError::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            CoreError::SourceUnavailable { .. } => ErrorCode::SourceUnavailable,
            CoreError::InvalidFixture { .. } => ErrorCode::InvalidFixture,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::FetchFailure { .. } => ErrorSeverity::Warning,
            CoreError::DeleteFailure { .. } => ErrorSeverity::Warning,
            CoreError::ItemNotFound { .. } => ErrorSeverity::Info,
            CoreError::SourceUnavailable { .. } => ErrorSeverity::Error,
            CoreError::InvalidFixture { .. } => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FetchFailure { page, term, .. } => {
                details = details.with_detail(serde_json::json!({ "page": page, "term": term }));
                details = details.with_suggestion(
                    "Search again or change the page to retry.".to_string(),
                );
            }
            CoreError::DeleteFailure { id, .. } => {
                details = details.with_detail(serde_json::json!({ "id": id }));
                details = details.with_suggestion(
                    "The item was left in place; try deleting it again.".to_string(),
                );
            }
            CoreError::ItemNotFound { .. } => {
                details = details.with_suggestion(
                    "The item may already have been removed; refresh the list.".to_string(),
                );
            }
            CoreError::InvalidFixture { message } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FetchFailure.to_string(), "FETCH_FAILURE");
        assert_eq!(ErrorCode::DeleteFailure.to_string(), "DELETE_FAILURE");
        assert_eq!(ErrorCode::ItemNotFound.to_string(), "ITEM_NOT_FOUND");
    }

    #[test]
    fn test_error_code_serializes_screaming() {
        let json = serde_json::to_string(&ErrorCode::SourceUnavailable).unwrap();
        assert_eq!(json, "\"SOURCE_UNAVAILABLE\"");
    }

    #[test]
    fn test_core_error_severity() {
        let error = CoreError::FetchFailure {
            page: 2,
            term: "john".to_string(),
            message: "timeout".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(CoreError::IoError.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_fetch_failure_details() {
        let error = CoreError::FetchFailure {
            page: 3,
            term: "smith".to_string(),
            message: "connection reset".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::FetchFailure);
        assert!(details.message.contains("page 3"));
        assert_eq!(details.details, Some(serde_json::json!({ "page": 3, "term": "smith" })));
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_delete_failure_details() {
        let error = CoreError::DeleteFailure {
            id: "TXN-1004".to_string(),
            message: "locked".to_string(),
        };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::DeleteFailure);
        assert!(details.to_string().contains("TXN-1004"));
    }

    #[test]
    fn test_io_error_conversion() {
        let error: CoreError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(error.code(), ErrorCode::IoError);
    }
}
