//! Per-feed orchestration: schema → rows → aggregate → CSV.
//!
//! The pipeline is strictly sequential. The record set is built in full
//! before emission starts and is owned by this module for the duration of
//! the run; nothing is shared or mutated concurrently. Running several
//! independent feeds in parallel is a caller-level choice.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{FeedConfig, FeedsConfig};
use crate::error::FeedResult;
use crate::feed::{aggregate, emit_to_path};
use crate::schema::FieldSchema;
use crate::source::RowSource;

/// Outcome of one feed run.
#[derive(Debug, Clone)]
pub struct FeedSummary {
    /// Feed name from the configuration.
    pub name: String,
    /// Records written (one CSV row each, plus the header).
    pub record_count: usize,
    /// Duplicate rows dropped (feeds with no FOR field).
    pub duplicates_dropped: u64,
    /// FOR values dropped for want of a free slot.
    pub overflow_dropped: u64,
    /// Where the CSV was written.
    pub output_path: PathBuf,
}

/// Run one feed: derive its schema, read its rows, aggregate, and write
/// `<working_dir>/<file>`.
///
/// Fatal errors from any stage abort the run; duplicate-key and slot
/// overflow conditions are logged and counted on the summary instead.
pub fn run_feed(
    working_dir: &Path,
    feed: &FeedConfig,
    source: &mut dyn RowSource,
) -> FeedResult<FeedSummary> {
    info!(feed = %feed.name, "running feed");

    let schema = FieldSchema::from_config(feed)?;
    let rows = source.read_rows()?;
    info!(feed = %feed.name, rows = rows.len(), "read rows");

    let agg = aggregate(&schema, rows)?;
    info!(feed = %feed.name, records = agg.records.len(), "aggregated records");

    let output_path = working_dir.join(&feed.file);
    emit_to_path(&schema, &agg.records, &output_path)?;
    info!(feed = %feed.name, path = %output_path.display(), "wrote CSV");

    Ok(FeedSummary {
        name: feed.name.clone(),
        record_count: agg.records.len(),
        duplicates_dropped: agg.duplicates_dropped,
        overflow_dropped: agg.overflow_dropped,
        output_path,
    })
}

/// Run every feed in configured order, with rows from each feed's
/// configured rows file. The first fatal error aborts the remaining feeds.
pub fn run_all(config: &FeedsConfig, config_dir: &Path) -> FeedResult<Vec<FeedSummary>> {
    let mut summaries = Vec::with_capacity(config.feeds.len());
    for feed in &config.feeds {
        let mut source = crate::source::feed_row_source(config_dir, &feed.rows);
        summaries.push(run_feed(&config.locations.working, feed, &mut source)?);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldDecl;
    use crate::source::VecRowSource;

    fn staff_feed() -> FeedConfig {
        FeedConfig {
            name: "staff".into(),
            file: "staff.csv".into(),
            rows: PathBuf::from("rows.json"),
            infields: vec![
                FieldDecl::key("id"),
                FieldDecl::plain("desc"),
                FieldDecl::fors("for", 2),
            ],
            outfields: vec!["id".into(), "desc".into(), "for_1".into(), "for_2".into()],
        }
    }

    fn rows(raw: &[&[&str]]) -> Vec<Vec<Option<String>>> {
        raw.iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect()
    }

    #[test]
    fn test_run_feed_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let feed = staff_feed();
        let mut source = VecRowSource::new(rows(&[
            &["A", "desc1", "CODE1"],
            &["A", "desc1", "CODE2"],
            &["B", "desc2", "CODE3"],
        ]));

        let summary = run_feed(dir.path(), &feed, &mut source).unwrap();
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.duplicates_dropped, 0);
        assert_eq!(summary.overflow_dropped, 0);

        let csv = std::fs::read_to_string(summary.output_path).unwrap();
        assert_eq!(
            csv,
            "id,desc,for_1,for_2\nA,desc1,CODE1,CODE2\nB,desc2,CODE3,\n"
        );
    }

    #[test]
    fn test_run_feed_reports_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let feed = staff_feed();
        let mut source = VecRowSource::new(rows(&[
            &["A", "desc1", "CODE1"],
            &["A", "desc1", "CODE2"],
            &["A", "desc1", "CODE3"],
        ]));

        let summary = run_feed(dir.path(), &feed, &mut source).unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.overflow_dropped, 1);

        let csv = std::fs::read_to_string(summary.output_path).unwrap();
        assert_eq!(csv, "id,desc,for_1,for_2\nA,desc1,CODE1,CODE2\n");
    }

    #[test]
    fn test_run_feed_fails_on_bad_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut feed = staff_feed();
        feed.infields[0].unique_id = false;
        let mut source = VecRowSource::new(vec![]);

        let err = run_feed(dir.path(), &feed, &mut source).unwrap_err();
        assert!(err.to_string().contains("unique_id"));
    }
}
