// ABOUTME: Unified error handling for the recommendation engine
// ABOUTME: Error codes, context attachment, and convenience constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

//! # Unified Error Handling
//!
//! Centralized error types for the recommendation subsystem. Nothing in this
//! crate surfaces an error to the feed caller; errors exist so that internal
//! layers can degrade deliberately (fallback query, popular feed, cache
//! eviction) while still logging what went wrong.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Input validation failed
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// The cache backend failed or returned malformed data
    #[serde(rename = "CACHE_ERROR")]
    CacheError,
    /// A database query failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// An upstream collaborator failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// User-facing description of this error class
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::CacheError => "Cache operation failed",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether a failure of this class is transient and safe to retry later
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::CacheError | Self::DatabaseError | Self::ExternalServiceError
        )
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// User the failing operation was running for, when known
    pub user_id: Option<i64>,
    /// Source error for chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            user_id: None,
            source: None,
        }
    }

    /// Attach the user the failing operation was running for
    #[must_use]
    pub const fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Cache backend error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CacheError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_descriptions() {
        assert!(ErrorCode::CacheError.description().contains("Cache"));
        assert!(ErrorCode::DatabaseError.description().contains("Database"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ErrorCode::CacheError.is_transient());
        assert!(ErrorCode::DatabaseError.is_transient());
        assert!(!ErrorCode::InvalidInput.is_transient());
        assert!(!ErrorCode::ConfigError.is_transient());
    }

    #[test]
    fn test_app_error_context() {
        let error = AppError::database("query timed out").with_user_id(42);
        assert_eq!(error.code, ErrorCode::DatabaseError);
        assert_eq!(error.user_id, Some(42));
        assert!(error.to_string().contains("query timed out"));
    }

    #[test]
    fn test_serde_json_conversion() {
        let bad: Result<Vec<String>, _> = serde_json::from_str("{not json");
        let error: AppError = bad.expect_err("must fail").into();
        assert_eq!(error.code, ErrorCode::SerializationError);
    }
}
