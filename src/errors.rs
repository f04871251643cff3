// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for AAS search operations
//!
//! Every remote call returns an [`ApiResult`]. Errors carry an
//! [`ApiErrorCode`] so callers can tell "nothing there" apart from
//! "not allowed to look", which halts a search.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error code surfaced to callers of the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    /// No source produced a result
    NotFound,
    /// The remote service rejected missing or invalid credentials
    Unauthorized,
    /// The remote service refused access
    Forbidden,
    /// Missing capability or an unexpected failure on our side
    InternalServerError,
    /// The request was malformed
    BadRequest,
    /// Any other non-success answer
    UnknownError,
}

impl ApiErrorCode {
    /// Map an HTTP status code onto an error code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorCode::BadRequest,
            401 => ApiErrorCode::Unauthorized,
            403 => ApiErrorCode::Forbidden,
            404 => ApiErrorCode::NotFound,
            500..=599 => ApiErrorCode::InternalServerError,
            _ => ApiErrorCode::UnknownError,
        }
    }

    /// Whether this code must stop a search instead of falling through
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiErrorCode::Unauthorized | ApiErrorCode::Forbidden)
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ApiErrorCode::NotFound => "NOT_FOUND",
            ApiErrorCode::Unauthorized => "UNAUTHORIZED",
            ApiErrorCode::Forbidden => "FORBIDDEN",
            ApiErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ApiErrorCode::BadRequest => "BAD_REQUEST",
            ApiErrorCode::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(code)
    }
}

/// Tagged failure of a remote call or a search stage
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ApiError {
    /// Machine readable error code
    pub code: ApiErrorCode,
    /// Human readable detail
    pub message: String,
}

impl ApiError {
    /// Create an error with the given code
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Nothing was found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    /// Missing capability or unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InternalServerError, message)
    }

    /// Build an error from a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::from_status(status), message)
    }

    /// Whether this error must halt the search pipeline
    pub fn is_auth_failure(&self) -> bool {
        self.code.is_auth_failure()
    }
}

/// Result type for search operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Deserialization error: {}", err))
    }
}

/// Errors that can occur while loading search configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable held an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    /// Configuration is structurally invalid
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
