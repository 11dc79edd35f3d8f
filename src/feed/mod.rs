//! Feed pipeline: aggregation and CSV emission.
//!
//! - Aggregator: raw rows into one record per key, FOR codes slotted
//! - Emitter: record set into a deterministic CSV
//! - Pipeline: per-feed orchestration

pub mod aggregator;
pub mod emitter;
pub mod pipeline;

pub use aggregator::{aggregate, Aggregation, Record, RecordSet};
pub use emitter::{emit, emit_to_path};
pub use pipeline::{run_all, run_feed, FeedSummary};
