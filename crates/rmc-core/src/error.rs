//! Error types for rmc operations.
//!
//! Errors carry structured codes so callers can tell configuration problems
//! (rejected before any I/O) apart from runtime failures of collaborators.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for rmc operations.
pub type RmcResult<T> = Result<T, RmcError>;

/// Main error type for all rmc operations.
#[derive(Error, Debug)]
pub enum RmcError {
    /// Input or option validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Embedding generation failed.
    #[error("Embedding error: {message}")]
    Embedding {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector store operation failed.
    #[error("Vector store error: {message}")]
    VectorStore {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Relation store operation failed.
    #[error("Relation store error: {message}")]
    RelationStore {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation exceeded its deadline.
    #[error("Timeout: {operation} exceeded {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValOutOfRange,
    ValUnknownRelationType,

    // Embedding (EMB_xxx)
    EmbGenerationFailed,
    EmbDimensionMismatch,

    // Vector Store (VEC_xxx)
    VecOperationFailed,

    // Relation Store (REL_xxx)
    RelOperationFailed,
    RelUnknownNode,

    // Database (DB_xxx)
    DbOperationFailed,

    // Network (NET_xxx)
    NetTimeout,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValOutOfRange => "VAL_002",
            ErrorCode::ValUnknownRelationType => "VAL_003",
            ErrorCode::EmbGenerationFailed => "EMB_002",
            ErrorCode::EmbDimensionMismatch => "EMB_003",
            ErrorCode::VecOperationFailed => "VEC_002",
            ErrorCode::RelOperationFailed => "REL_001",
            ErrorCode::RelUnknownNode => "REL_002",
            ErrorCode::DbOperationFailed => "DB_001",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RmcError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a validation error for a value outside its allowed range.
    pub fn out_of_range(field: &str, value: impl ToString, allowed: impl Into<String>) -> Self {
        let allowed = allowed.into();
        let mut details = HashMap::new();
        details.insert("field".to_string(), field.to_string());
        details.insert("value".to_string(), value.to_string());
        Self::Validation {
            message: format!("{} is out of range", field),
            code: ErrorCode::ValOutOfRange,
            details,
            suggestion: Some(format!("{} must be {}", field, allowed)),
        }
    }

    /// Create a validation error for an unrecognized relation tag.
    pub fn unknown_relation_type(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::Validation {
            message: format!("Unknown relation type '{}'", tag),
            code: ErrorCode::ValUnknownRelationType,
            details: HashMap::new(),
            suggestion: Some("Use one of CAUSES, SUPPORTS, IMPACTS, CONTRADICTS".to_string()),
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            code: ErrorCode::EmbGenerationFailed,
            source: None,
        }
    }

    /// Create an embedding error for a vector of the wrong length.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::Embedding {
            message: format!(
                "Expected an embedding of dimension {}, got {}",
                expected, actual
            ),
            code: ErrorCode::EmbDimensionMismatch,
            source: None,
        }
    }

    /// Create a vector store error.
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore {
            message: message.into(),
            code: ErrorCode::VecOperationFailed,
            source: None,
        }
    }

    /// Create a relation store error.
    pub fn relation_store(message: impl Into<String>) -> Self {
        Self::RelationStore {
            message: message.into(),
            code: ErrorCode::RelOperationFailed,
            source: None,
        }
    }

    /// Create a relation store error for an edge endpoint that does not exist.
    pub fn unknown_node(node_id: impl Into<String>) -> Self {
        Self::RelationStore {
            message: format!("Memory '{}' is not in the relation store", node_id.into()),
            code: ErrorCode::RelUnknownNode,
            source: None,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Embedding { code, .. } => *code,
            Self::VectorStore { code, .. } => *code,
            Self::RelationStore { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Timeout { .. } => ErrorCode::NetTimeout,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error was raised while validating caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Embedding { .. } => Some("Please check your embedding provider configuration"),
            Self::VectorStore { .. } => Some("Please check your vector store connection settings"),
            Self::Timeout { .. } => Some("Increase the configured timeout or check store latency"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RmcError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = RmcError::validation("Invalid input");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.is_validation());
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_out_of_range_carries_suggestion() {
        let err = RmcError::out_of_range("min_confidence", 1.5, "between 0.0 and 1.0");
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
        assert_eq!(err.suggestion(), Some("min_confidence must be between 0.0 and 1.0"));
    }

    #[test]
    fn test_timeout_is_not_validation() {
        let err = RmcError::timeout("retrieve", 100);
        assert!(!err.is_validation());
        assert_eq!(err.code(), ErrorCode::NetTimeout);
        assert!(err.to_string().contains("100ms"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: RmcError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, RmcError::Io(_)));
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValInvalidInput.as_str(), "VAL_001");
        assert_eq!(ErrorCode::EmbDimensionMismatch.as_str(), "EMB_003");
        assert_eq!(ErrorCode::RelUnknownNode.as_str(), "REL_002");
    }
}
