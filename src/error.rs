//! Error types for the feedcsv pipeline.
//!
//! This module defines a hierarchy of error types, one per pipeline stage:
//!
//! - [`ConfigError`] - configuration loading and schema derivation errors
//! - [`SourceError`] - row source errors
//! - [`AggregateError`] - row aggregation errors
//! - [`EmitError`] - CSV emission errors
//! - [`FeedError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.
//!
//! Duplicate keys and FOR slot overflow are deliberately NOT errors: they
//! are warning-level conditions counted by the aggregator (see
//! [`crate::feed::aggregator::Aggregation`]).

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration or deriving a field schema.
///
/// All of these are fatal and abort the run before any aggregation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid JSON.
    #[error("Invalid config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// No config path given and the environment variable is unset.
    #[error("No config file given; pass --config or set {0}")]
    NoConfigPath(&'static str),

    /// A feed name was requested that the config does not define.
    #[error("Unknown feed: {0}")]
    UnknownFeed(String),

    /// A feed declares no input fields.
    #[error("Feed '{0}' declares no input fields")]
    NoInputFields(String),

    /// The same input field name is declared twice.
    #[error("Feed '{feed}' declares input field '{field}' more than once")]
    DuplicateInputField { feed: String, field: String },

    /// No input field is marked as the unique key.
    #[error("Feed '{0}' has no input field marked unique_id")]
    NoKeyField(String),

    /// More than one input field is marked as the unique key.
    #[error("Feed '{feed}' marks both '{first}' and '{second}' as unique_id")]
    MultipleKeyFields {
        feed: String,
        first: String,
        second: String,
    },

    /// More than one input field is marked as a FOR field.
    #[error("Feed '{feed}' marks both '{first}' and '{second}' as FOR fields")]
    MultipleForFields {
        feed: String,
        first: String,
        second: String,
    },

    /// A FOR field bound that is not a positive integer.
    #[error("Feed '{feed}': FOR field '{field}' has invalid bound {bound} (must be >= 1)")]
    InvalidForBound {
        feed: String,
        field: String,
        bound: usize,
    },
}

// =============================================================================
// Row Source Errors
// =============================================================================

/// Errors while reading rows from a row source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read the rows file.
    #[error("Failed to read rows file: {0}")]
    IoError(#[from] std::io::Error),

    /// Rows file is not a JSON array of rows.
    #[error("Invalid rows JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Aggregation Errors
// =============================================================================

/// Errors during row aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A row's cell count does not match the schema's input field count.
    ///
    /// The aggregator never pads or truncates; a mismatched row aborts
    /// the whole run. `row` is the 0-based index in the row stream.
    #[error("Row {row}: expected {expected} cells, got {actual}")]
    MalformedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Emission Errors
// =============================================================================

/// Errors while writing the CSV output.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Failed to create or write the destination file.
    #[error("Failed to write CSV: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV writer rejected a record.
    #[error("CSV write error: {0}")]
    CsvError(#[from] csv::Error),
}

// =============================================================================
// Feed Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::feed::pipeline::run_feed`].
/// The wrapped variant identifies the failing stage.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Configuration or schema error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Row source error.
    #[error("Row source error: {0}")]
    Source(#[from] SourceError),

    /// Aggregation error.
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Emission error.
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for row source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Result type for emission operations.
pub type EmitResult<T> = Result<T, EmitError>;

/// Result type for whole-feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
