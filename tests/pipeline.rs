//! End-to-end pipeline tests: config file + rows file in, CSV out.

use feedcsv::{run_all, run_feed, FeedsConfig, JsonRowSource};
use std::fs;
use std::path::Path;

fn write_fixture(dir: &Path, rows_json: &str, max_fors: usize) -> FeedsConfig {
    fs::write(dir.join("rows.json"), rows_json).unwrap();
    fs::create_dir_all(dir.join("out")).unwrap();

    let config_json = format!(
        r#"{{
            "locations": {{ "working": "{working}" }},
            "feeds": [
                {{
                    "name": "staff",
                    "file": "staff.csv",
                    "rows": "rows.json",
                    "infields": [
                        {{ "name": "id", "unique_id": true }},
                        {{ "name": "desc" }},
                        {{ "name": "for", "fors": {max_fors} }}
                    ],
                    "outfields": ["id", "desc", "for_1", "for_2"]
                }}
            ]
        }}"#,
        working = dir.join("out").display(),
        max_fors = max_fors,
    );
    let config_path = dir.join("feeds.json");
    fs::write(&config_path, config_json).unwrap();
    FeedsConfig::load(config_path).unwrap()
}

#[test]
fn run_all_writes_expected_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        r#"[
            ["A", "desc1", "CODE1"],
            ["A", "desc1", "CODE2"],
            ["B", "desc2", "CODE3"]
        ]"#,
        2,
    );

    let summaries = run_all(&config, dir.path()).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].record_count, 2);

    let csv = fs::read_to_string(dir.path().join("out/staff.csv")).unwrap();
    assert_eq!(
        csv,
        "id,desc,for_1,for_2\nA,desc1,CODE1,CODE2\nB,desc2,CODE3,\n"
    );
}

#[test]
fn overflow_value_is_dropped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        r#"[
            ["A", "desc1", "CODE1"],
            ["A", "desc1", "CODE2"],
            ["A", "desc1", "CODE3"],
            ["B", "desc2", "CODE4"]
        ]"#,
        2,
    );

    let summaries = run_all(&config, dir.path()).unwrap();
    assert_eq!(summaries[0].overflow_dropped, 1);

    let csv = fs::read_to_string(&summaries[0].output_path).unwrap();
    assert_eq!(
        csv,
        "id,desc,for_1,for_2\nA,desc1,CODE1,CODE2\nB,desc2,CODE4,\n"
    );
}

#[test]
fn null_cells_and_newlines_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        r#"[["A", "line1\nline2", null]]"#,
        2,
    );

    run_all(&config, dir.path()).unwrap();

    let csv = fs::read_to_string(dir.path().join("out/staff.csv")).unwrap();
    assert_eq!(csv, "id,desc,for_1,for_2\nA,line1<br />line2,,\n");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        r#"[
            ["C", "third", "X"],
            ["A", "first", "Y"],
            ["B", "second", "Z"]
        ]"#,
        2,
    );

    run_all(&config, dir.path()).unwrap();
    let first = fs::read_to_string(dir.path().join("out/staff.csv")).unwrap();

    run_all(&config, dir.path()).unwrap();
    let second = fs::read_to_string(dir.path().join("out/staff.csv")).unwrap();

    assert_eq!(first, second);
    // Rows come out key-sorted regardless of arrival order.
    assert!(first.find("A,first").unwrap() < first.find("B,second").unwrap());
    assert!(first.find("B,second").unwrap() < first.find("C,third").unwrap());
}

#[test]
fn malformed_row_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        r#"[["A", "desc1", "CODE1"], ["B", "desc2"]]"#,
        2,
    );

    let err = run_all(&config, dir.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Row 1"), "unexpected error: {msg}");
    assert!(msg.contains("expected 3"), "unexpected error: {msg}");
}

#[test]
fn missing_rows_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), "[]", 2);

    let feed = config.feed("staff").unwrap();
    let mut source = JsonRowSource::new(dir.path().join("no-such-rows.json"));
    let err = run_feed(&config.locations.working, feed, &mut source).unwrap_err();
    assert!(err.to_string().contains("rows file"));
}

#[test]
fn empty_rows_produce_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), "[]", 2);

    let summaries = run_all(&config, dir.path()).unwrap();
    assert_eq!(summaries[0].record_count, 0);

    let csv = fs::read_to_string(&summaries[0].output_path).unwrap();
    assert_eq!(csv, "id,desc,for_1,for_2\n");
}
