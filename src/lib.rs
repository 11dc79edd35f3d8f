//! # feedcsv - keyed row flattening and CSV feed export
//!
//! feedcsv collapses raw relational rows into one logical record per key,
//! spreads a repeating "FOR code" attribute across a bounded set of
//! numbered slots, and writes the result as CSV with a configured column
//! mapping.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Row source │────▶│ Aggregator  │────▶│ Record set  │────▶│  CSV file   │
//! │ (rows file) │     │ (key + FOR) │     │ (per key)   │     │ (emitter)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedcsv::{run_all, FeedsConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), feedcsv::FeedError> {
//!     let config = FeedsConfig::load("feeds.json")?;
//!     for summary in run_all(&config, Path::new("."))? {
//!         println!("{}: {} records", summary.name, summary.record_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - JSON feed configuration
//! - [`schema`] - Per-feed field schema
//! - [`source`] - Row sources
//! - [`feed`] - Aggregation, emission, and pipeline

// Core modules
pub mod error;

// Configuration
pub mod config;

// Schema
pub mod schema;

// Row sources
pub mod source;

// Aggregation, emission, pipeline
pub mod feed;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AggregateError, ConfigError, EmitError, FeedError, SourceError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{config_path, FeedConfig, FeedsConfig, FieldDecl, Locations, CONFIG_ENV_VAR};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{FieldSchema, ForField};

// =============================================================================
// Re-exports - Row sources
// =============================================================================

pub use source::{feed_row_source, JsonRowSource, RawRow, RowSource, VecRowSource};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use feed::{aggregate, emit, emit_to_path, run_all, run_feed, Aggregation, FeedSummary, Record, RecordSet};
