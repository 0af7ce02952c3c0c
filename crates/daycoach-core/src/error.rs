//! Core error types for daycoach-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daycoach-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar-feed errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Referenced row does not exist
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Query execution failed
    #[error("Query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Calendar-feed errors.
///
/// A failed fetch must stay distinguishable from a day with zero free
/// minutes, so these never collapse into a default value.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// No feed URL configured
    #[error("No calendar feed URL configured")]
    NotConfigured,

    /// The feed URL could not be parsed
    #[error("Invalid calendar feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network-level failure (connect, timeout, TLS)
    #[error("Calendar feed unavailable: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed server answered with a non-success status
    #[error("Calendar feed returned HTTP {status}")]
    Status { status: u16 },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// String field outside its length bounds
    #[error("{field} must be between {min} and {max} characters")]
    LengthOutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
    },

    /// Numeric field outside its bounds
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Unknown enum-like value
    #[error("Unknown {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },

    /// Malformed HH:MM time-of-day string
    #[error("Invalid HH:MM time: '{0}'")]
    InvalidTimeOfDay(String),
}
