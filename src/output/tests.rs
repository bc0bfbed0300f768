//! Tests for output module

use super::*;
use crate::error::Error;
use crate::pagination::{Meta, ResultPage};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use test_case::test_case;

fn meta(count: u64) -> Meta {
    Meta {
        count,
        ..Meta::default()
    }
}

fn records(range: std::ops::RangeInclusive<u64>) -> Vec<serde_json::Value> {
    range.map(|n| json!({"id": format!("W{n}"), "n": n})).collect()
}

// ============================================================================
// Chunk Label Tests
// ============================================================================

#[test_case(1, "0,000,001")]
#[test_case(1000, "0,001,000")]
#[test_case(2500, "0,002,500")]
#[test_case(1_234_567, "1,234,567")]
#[test_case(12_345_678, "12,345,678")]
fn test_format_record_number(n: u64, expected: &str) {
    assert_eq!(format_record_number(n), expected);
}

#[test]
fn test_chunk_range_label() {
    let range = ChunkRange {
        start: 1001,
        end: 2000,
    };
    assert_eq!(range.label(), "0,001,001-0,002,000");
    assert_eq!(range.to_string(), range.label());
    assert_eq!(range.len(), 1000);
}

// ============================================================================
// CSV Flattening Tests
// ============================================================================

#[test]
fn test_flatten_nested_and_arrays() {
    let record = json!({
        "id": "W1",
        "primary_location": {"source": {"display_name": "Nature"}},
        "authorships": [{"author": {"id": "A1"}}, {"author": {"id": "A2"}}],
        "concepts": ["x", "y"],
        "doi": null
    });
    let columns = flatten_record(&record);
    let get = |key: &str| {
        columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("id"), Some("W1"));
    assert_eq!(get("primary_location.source.display_name"), Some("Nature"));
    assert_eq!(get("authorships[1].author.id"), Some("A2"));
    assert_eq!(get("concepts[0]"), Some("x"));
    assert_eq!(get("doi"), Some(""));
}

#[test]
fn test_flatten_counts_by_year() {
    let record = json!({
        "counts_by_year": [
            {"year": 2023, "cited_by_count": 10, "works_count": 2},
            {"year": 2022, "cited_by_count": 4, "works_count": 1}
        ]
    });
    let columns = flatten_record(&record);

    assert!(columns.contains(&("counts_by_year.2023.cited_by_count".into(), "10".into())));
    assert!(columns.contains(&("counts_by_year.2022.works_count".into(), "1".into())));
    assert!(!columns.iter().any(|(k, _)| k.contains("year.year")));
    assert_eq!(columns.len(), 4);
}

#[test]
fn test_csv_header_is_union_in_first_seen_order() {
    let rows = vec![
        json!({"id": "W1", "title": "First"}),
        json!({"id": "W2", "cited_by_count": 3}),
    ];
    let mut buffer = Vec::new();
    write_records(&mut buffer, &rows).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], r#""id","title","cited_by_count""#);
    assert_eq!(lines[1], r#""W1","First","""#);
    assert_eq!(lines[2], r#""W2","","3""#);
}

#[test]
fn test_csv_header_follows_record_key_order() {
    let rows = vec![json!({"title": "T", "id": "W1", "doi": "d"})];
    let mut buffer = Vec::new();
    write_records(&mut buffer, &rows).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().next(), Some(r#""title","id","doi""#));
}

#[test]
fn test_csv_quotes_embedded_quotes_and_commas() {
    let rows = vec![json!({"title": "a \"quoted\", title"})];
    let mut buffer = Vec::new();
    write_records(&mut buffer, &rows).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().nth(1), Some(r#""a ""quoted"", title""#));
}

#[test]
fn test_csv_no_records_writes_nothing() {
    let mut buffer = Vec::new();
    write_records(&mut buffer, &[]).unwrap();
    assert!(buffer.is_empty());
}

// ============================================================================
// Whole-Result Export Tests
// ============================================================================

#[test]
fn test_export_target_writes_both_formats() {
    let dir = tempdir().unwrap();
    let target = ExportTarget {
        json: Some(dir.path().join("english.africa")),
        csv: Some(dir.path().join("nested").join("result")),
    };
    let page = ResultPage {
        meta: meta(2),
        results: records(1..=2),
        group_by: None,
    };

    let files = target.write(&page).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("english.africa.json"),
            dir.path().join("nested").join("result.csv")
        ]
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(json["meta"]["count"], 2);
    assert_eq!(json["results"][1]["id"], "W2");

    let csv = std::fs::read_to_string(&files[1]).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_empty_target_writes_nothing() {
    let files = ExportTarget::default()
        .write(&ResultPage::default())
        .unwrap();
    assert!(files.is_empty());
}

// ============================================================================
// Chunked Export Tests
// ============================================================================

#[test]
fn test_chunked_export_ranges_are_contiguous() {
    let dir = tempdir().unwrap();
    let target = ExportTarget {
        json: Some(dir.path().join("works")),
        csv: Some(dir.path().join("works_csv")),
    };
    let mut exporter = ChunkedExporter::new(&target, 1000).unwrap();

    // 13 pages of up to 200 records, as an all-pages walk would deliver
    let mut next = 1u64;
    while next <= 2500 {
        let last = (next + 199).min(2500);
        exporter.push(records(next..=last), &meta(2500)).unwrap();
        assert!(exporter.pending() < 1000);
        next = last + 1;
    }
    let summary = exporter.finish(&meta(2500)).unwrap();

    assert_eq!(summary.total_records, 2500);
    let ranges: Vec<(u64, u64)> = summary
        .chunks
        .iter()
        .map(|c| (c.range.start, c.range.end))
        .collect();
    assert_eq!(ranges, vec![(1, 1000), (1001, 2000), (2001, 2500)]);
    assert_eq!(summary.files().count(), 6);

    let first_csv = dir
        .path()
        .join("works_csv")
        .join("works_csv_0,000,001-0,001,000.csv");
    let csv = std::fs::read_to_string(first_csv).unwrap();
    assert_eq!(csv.lines().count(), 1001);

    let last_json = dir
        .path()
        .join("works")
        .join("works_0,002,001-0,002,500.json");
    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(last_json).unwrap()).unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 500);
    assert_eq!(body["results"][0]["n"], 2001);
    assert_eq!(body["meta"]["count"], 2500);
}

#[test]
fn test_chunked_export_exact_multiple_has_no_empty_tail() {
    let dir = tempdir().unwrap();
    let target = ExportTarget {
        json: Some(dir.path().join("out")),
        csv: None,
    };
    let mut exporter = ChunkedExporter::new(&target, 50).unwrap();
    exporter.push(records(1..=100), &meta(100)).unwrap();
    let summary = exporter.finish(&meta(100)).unwrap();

    assert_eq!(summary.chunks.len(), 2);
    assert_eq!(summary.chunks[1].range.label(), "0,000,051-0,000,100");
}

#[test]
fn test_chunked_exporter_rejects_bad_setup() {
    let err = ChunkedExporter::new(&ExportTarget::default(), 10).unwrap_err();
    assert!(matches!(err, Error::InvalidParameters { .. }));

    let dir = tempdir().unwrap();
    let target = ExportTarget {
        json: Some(dir.path().join("x")),
        csv: None,
    };
    assert!(ChunkedExporter::new(&target, 0).is_err());
}

#[test]
fn test_chunked_exporter_creates_directory_up_front() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deep").join("chunks");
    let target = ExportTarget {
        json: None,
        csv: Some(path.clone()),
    };
    let exporter = ChunkedExporter::new(&target, 10).unwrap();
    assert!(path.is_dir());

    let summary = exporter.finish(&meta(0)).unwrap();
    assert!(summary.chunks.is_empty());
}

#[test]
fn test_chunk_directory_failure_is_io_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, "not a directory").unwrap();

    let target = ExportTarget {
        json: Some(blocker.join("chunks")),
        csv: None,
    };
    let err = ChunkedExporter::new(&target, 10).unwrap_err();

    assert!(err.to_string().contains("Failed to create directory"));
    assert!(matches!(err.root_cause(), Error::Io(_)), "got {err:?}");
}

#[test]
fn test_json_write_failure_is_io_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, "").unwrap();

    let err = write_json(&blocker.join("out"), &json!({"a": 1})).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Io(_)), "got {err:?}");
}
