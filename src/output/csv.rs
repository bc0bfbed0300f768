//! CSV file output
//!
//! Records are flattened into dotted-path columns:
//!
//! - nested objects: `primary_location.source.display_name`
//! - arrays: `authorships[0].author.id`
//! - `counts_by_year`: `counts_by_year.2023.cited_by_count`
//!
//! The header is the union of every record's columns in first-seen order.
//! All fields are quoted; nulls are written as empty fields.

use super::json::{ensure_parent, with_extension};
use crate::error::{Result, ResultExt};
use crate::types::JsonValue;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

const COUNTS_BY_YEAR: &str = "counts_by_year";

/// Flatten one record into `(column, value)` pairs
pub fn flatten_record(record: &JsonValue) -> Vec<(String, String)> {
    let mut columns = Vec::new();
    flatten_into("", record, &mut columns);
    columns
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten_into(prefix: &str, value: &JsonValue, out: &mut Vec<(String, String)>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                let column = join_key(prefix, key);
                match child {
                    JsonValue::Array(items) if key == COUNTS_BY_YEAR => {
                        flatten_counts_by_year(&column, items, out);
                    }
                    _ => flatten_into(&column, child, out),
                }
            }
        }
        JsonValue::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(&format!("{prefix}[{i}]"), item, out);
            }
        }
        scalar => out.push((prefix.to_string(), scalar_to_string(scalar))),
    }
}

// Entries are keyed by year instead of position so columns line up across
// records with different year coverage.
fn flatten_counts_by_year(column: &str, items: &[JsonValue], out: &mut Vec<(String, String)>) {
    for (i, item) in items.iter().enumerate() {
        let year = item.get("year").filter(|y| !y.is_null());
        match (item.as_object(), year) {
            (Some(fields), Some(year)) => {
                let year = scalar_to_string(year);
                for (field, value) in fields.iter().filter(|(k, _)| *k != "year") {
                    flatten_into(&format!("{column}.{year}.{field}"), value, out);
                }
            }
            _ => flatten_into(&format!("{column}[{i}]"), item, out),
        }
    }
}

fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write records as CSV to any writer
pub fn write_records<W: Write>(writer: W, records: &[JsonValue]) -> Result<()> {
    let flattened: Vec<Vec<(String, String)>> = records.iter().map(flatten_record).collect();

    let mut seen = HashSet::new();
    let mut header: Vec<&str> = Vec::new();
    for (column, _) in flattened.iter().flatten() {
        if seen.insert(column.as_str()) {
            header.push(column.as_str());
        }
    }

    let mut csv_writer = ::csv::WriterBuilder::new()
        .quote_style(::csv::QuoteStyle::Always)
        .from_writer(writer);

    if header.is_empty() {
        csv_writer.flush()?;
        return Ok(());
    }

    csv_writer.write_record(&header)?;
    for columns in &flattened {
        let row: HashMap<&str, &str> = columns
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        csv_writer.write_record(header.iter().map(|h| row.get(h).copied().unwrap_or("")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to `<path>.csv`, returning the file written
pub fn write_csv(path: &Path, records: &[JsonValue]) -> Result<PathBuf> {
    let file = with_extension(path, "csv");
    write_csv_file(&file, records)?;
    Ok(file)
}

/// Write records as CSV to exactly `file`
pub fn write_csv_file(file: &Path, records: &[JsonValue]) -> Result<()> {
    ensure_parent(file)?;
    let handle = std::fs::File::create(file)
        .with_context(|| format!("Failed to create {}", file.display()))?;
    write_records(std::io::BufWriter::new(handle), records)
}
