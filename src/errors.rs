// ABOUTME: Unified error handling for the Vital health analytics engine
// ABOUTME: Defines error codes, the AppError type, and conversion helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! # Unified Error Handling
//!
//! Centralized error types for the engine. Every fallible operation returns
//! [`AppResult`]; the [`ErrorCode`] tells callers which degradation path (if
//! any) applies. Extraction is the only subsystem with a designed fallback —
//! provider errors there are logged and absorbed, never surfaced to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Completion provider (1000-1999)
    /// No credential configured - Tier 1 is skipped without an attempted call
    #[serde(rename = "PROVIDER_UNAVAILABLE")]
    ProviderUnavailable = 1000,
    /// Transport or HTTP failure from the completion provider
    #[serde(rename = "PROVIDER_ERROR")]
    ProviderError = 1001,
    /// Provider signalled rate limiting (HTTP 429)
    #[serde(rename = "PROVIDER_RATE_LIMITED")]
    ProviderRateLimited = 1002,
    /// Provider call exceeded the configured time box
    #[serde(rename = "PROVIDER_TIMEOUT")]
    ProviderTimeout = 1003,

    // Extraction (2000-2999)
    /// Provider text failed JSON/shape validation
    #[serde(rename = "MALFORMED_RESPONSE")]
    MalformedResponse = 2000,
    /// A single candidate failed field checks (dropped, batch continues)
    #[serde(rename = "VALIDATION_REJECTED")]
    ValidationRejected = 2001,

    // Record store (3000-3999)
    /// Read/write failure from the external record store
    #[serde(rename = "DATA_STORE_ERROR")]
    DataStoreError = 3000,

    // Input validation (4000-4999)
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 4000,

    // Configuration (6000-6999)
    /// Configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// User-facing description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "Completion provider credential is not configured",
            Self::ProviderError => "Completion provider request failed",
            Self::ProviderRateLimited => "Completion provider rate limit exceeded",
            Self::ProviderTimeout => "Completion provider call timed out",
            Self::MalformedResponse => "Provider response failed shape validation",
            Self::ValidationRejected => "Extracted candidate failed field validation",
            Self::DataStoreError => "Record store operation failed",
            Self::InvalidInput => "The provided input is invalid",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether the extraction pipeline may absorb this error and fall
    /// through to the next tier
    #[must_use]
    pub const fn triggers_fallback(self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable
                | Self::ProviderError
                | Self::ProviderRateLimited
                | Self::ProviderTimeout
                | Self::MalformedResponse
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
    pub user_id: Option<Uuid>,
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

    /// Attach the user the operation was running for
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Missing provider credential
    #[must_use]
    pub fn provider_unavailable() -> Self {
        Self::new(
            ErrorCode::ProviderUnavailable,
            "completion provider credential not configured",
        )
    }

    /// Transport or HTTP failure from the completion provider
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderError, message)
    }

    /// Provider rate-limit signal
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderRateLimited, message)
    }

    /// Provider call exceeded its time box
    pub fn provider_timeout(timeout_secs: u64) -> Self {
        Self::new(
            ErrorCode::ProviderTimeout,
            format!("provider call exceeded {timeout_secs}s time box"),
        )
    }

    /// Provider text failed JSON or shape validation
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedResponse, message)
    }

    /// Record store failure
    pub fn data_store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataStoreError, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Conversion from `anyhow::Error` (the store trait boundary) to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::DataStoreError, error.to_string())
    }
}
