//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for CommonError {
    fn from(err: config::ConfigError) -> Self {
        CommonError::Config(err.to_string())
    }
}

/// Portal error type
#[derive(Debug, Error)]
pub enum PortalError {
    /// Status requested for an endpoint that is not monitored
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// Captcha token unknown, expired, consumed or answered wrongly
    #[error("Invalid captcha")]
    InvalidCaptcha,

    /// Endpoint registered twice
    #[error("Endpoint already registered: {0}")]
    DuplicateEndpoint(String),

    /// Conflict error (e.g., duplicate login)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details stay in the `Display` output, which is only written to
    /// server logs.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::UnknownEndpoint(_) => "Unknown server",
            Self::InvalidCaptcha => "Invalid captcha",
            Self::DuplicateEndpoint(_) => "Internal server error",
            Self::Conflict(_) => "Account with this login already exists",
            Self::Validation(_) => "Login and password are required",
            Self::Database(_) => "Internal server error",
            Self::PasswordHash(_) => "Internal server error",
            Self::Internal(_) => "Internal server error",
        }
    }
}

/// Portal result type
pub type PortalResult<T> = Result<T, PortalError>;

/// Unexpected probe failure, distinct from a reported Down outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The prober could not run at all
    #[error("Probe failed: {0}")]
    Unexpected(String),

    /// The probe task panicked or was cancelled
    #[error("Probe task aborted: {0}")]
    TaskAborted(String),
}

/// Reason a challenge answer was rejected.
///
/// Only used for logging; callers of the validator see a plain `false`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ChallengeRejection {
    /// Token expired, unknown or already consumed
    #[error("challenge token not found")]
    TokenNotFound,

    /// Token existed but the answer did not match
    #[error("challenge answer mismatch")]
    TokenMismatch,
}
