//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the workspace.
//! Each code carries a string identifier for clients, an integer code
//! for logging and monitoring, and a default human-readable message.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,
    /// Invalid JSON format in request body
    InvalidJson,
    /// Malformed multipart form payload
    InvalidMultipart,
    /// Requested resource was not found
    NotFound,
    /// Request payload is semantically incorrect
    UnprocessableEntity,

    // Server errors (5000-5999)
    /// An unexpected internal server error occurred
    InternalError,
    /// An upstream dependency answered with an error
    UpstreamError,
    /// A required dependency could not be reached
    ServiceUnavailable,
}

impl ErrorCode {
    /// String representation sent to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::InvalidMultipart => "INVALID_MULTIPART",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidJson => 1002,
            ErrorCode::InvalidMultipart => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::UnprocessableEntity => 1005,
            ErrorCode::InternalError => 5000,
            ErrorCode::UpstreamError => 5002,
            ErrorCode::ServiceUnavailable => 5003,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::InvalidJson => "Request body is not valid JSON",
            ErrorCode::InvalidMultipart => "Multipart form payload is malformed",
            ErrorCode::NotFound => "The requested resource was not found",
            ErrorCode::UnprocessableEntity => "Request payload is semantically incorrect",
            ErrorCode::InternalError => "An unexpected internal error occurred",
            ErrorCode::UpstreamError => "An upstream dependency returned an error",
            ErrorCode::ServiceUnavailable => "A required dependency is unreachable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::ServiceUnavailable.code(), 5003);
    }
}
