//! Output module
//!
//! Writes fetched records to disk.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing a whole result page as pretty JSON (`<path>.json`)
//! - Flattening records into quoted CSV (`<path>.csv`)
//! - Exporting all-pages retrievals in numbered chunk files

mod chunked;
mod csv;
mod json;

pub use self::csv::{flatten_record, write_csv, write_csv_file, write_records};
pub use chunked::{format_record_number, ChunkRange, ChunkedExporter, ExportSummary, WrittenChunk};
pub use json::{write_json, write_json_file};

use crate::error::Result;
use crate::pagination::ResultPage;
use std::path::PathBuf;
use tracing::info;

/// Where results are written
///
/// Paths carry no extension: a whole-result export writes `<path>.json` /
/// `<path>.csv`, a chunked export uses each path as a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTarget {
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl ExportTarget {
    /// Check if no destination is set
    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.csv.is_none()
    }

    /// Write `page` to every destination, returning the files written
    pub fn write(&self, page: &ResultPage) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if let Some(path) = &self.json {
            files.push(write_json(path, page)?);
        }
        if let Some(path) = &self.csv {
            files.push(write_csv(path, &page.results)?);
        }
        for file in &files {
            info!(file = %file.display(), records = page.len(), "Wrote results");
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests;
