//! Strict error handling with the AppError enum
//!
//! All core functions return `AppResult<T>` instead of `Result<T, String>`.
//! Variants are serializable for IPC communication with the frontend.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Non-numeric or empty conversion input. The whole conversion group
    /// shows "no result" in this state, never a stale number.
    #[error("Invalid numeric input: {0}")]
    InvalidNumericInput(String),

    /// Unparseable or out-of-range calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Malformed UUID namespace for name-based generation
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// All password character classes disabled
    #[error("Empty charset: no character classes enabled")]
    EmptyCharset,

    /// Unit symbol not present in the conversion table
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Numeric edge condition (division guard, NaN, incompatible categories)
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// Unknown/unexpected error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Unknown(format!("Serialization error: {}", err))
    }
}

// String errors still show up at a few call boundaries
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Unknown(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Unknown(err.to_string())
    }
}

/// Helper type alias for core results
pub type AppResult<T> = Result<T, AppError>;

/// Sentinel message used by the feature registry to mean "not my action"
pub const ERR_UNSUPPORTED_ACTION: &str = "Unsupported action type";
