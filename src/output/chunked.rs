//! Chunked export of large result sets
//!
//! While all pages are being retrieved, records are buffered and written
//! out in files of `chunk_size` records so memory stays bounded by one
//! chunk plus one page. Each destination path becomes a directory holding
//! `<stem>_<first>-<last>.<ext>` files, where the record numbers are
//! 1-based, cumulative, zero-padded to seven digits and comma-grouped:
//!
//! ```text
//! out/works/works_0,000,001-0,001,000.json
//! out/works/works_0,001,001-0,002,000.json
//! ```

use super::csv::write_csv_file;
use super::json::write_json_file;
use super::ExportTarget;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::Meta;
use crate::types::JsonValue;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Format a record number as seven zero-padded digits grouped by commas
pub fn format_record_number(n: u64) -> String {
    let digits = format!("{n:07}");
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ============================================================================
// Chunk Bookkeeping
// ============================================================================

/// Inclusive 1-based record range of one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkRange {
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// File name label, e.g. `0,000,001-0,001,000`
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            format_record_number(self.start),
            format_record_number(self.end)
        )
    }

    /// Number of records in the range
    pub fn len(&self) -> u64 {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One flushed chunk and the files it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenChunk {
    pub range: ChunkRange,
    pub files: Vec<PathBuf>,
}

/// Outcome of a chunked export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub chunks: Vec<WrittenChunk>,
    pub total_records: u64,
}

impl ExportSummary {
    /// Every file written, in order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.chunks
            .iter()
            .flat_map(|c| c.files.iter().map(PathBuf::as_path))
    }
}

// ============================================================================
// Exporter
// ============================================================================

#[derive(Debug)]
struct ChunkDir {
    dir: PathBuf,
    stem: String,
}

impl ChunkDir {
    fn create(path: &Path) -> Result<Self> {
        let stem = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::output(format!("Export path {} has no file name", path.display()))
            })?;
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;

        Ok(Self {
            dir: path.to_path_buf(),
            stem,
        })
    }

    fn file(&self, range: &ChunkRange, ext: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{ext}", self.stem, range.label()))
    }
}

#[derive(Serialize)]
struct ChunkPage<'a> {
    meta: &'a Meta,
    results: &'a [JsonValue],
}

/// Buffers records and flushes numbered chunk files
#[derive(Debug)]
pub struct ChunkedExporter {
    chunk_size: usize,
    json: Option<ChunkDir>,
    csv: Option<ChunkDir>,
    buffer: Vec<JsonValue>,
    written: u64,
    chunks: Vec<WrittenChunk>,
}

impl ChunkedExporter {
    /// Create the chunk directories for `target`
    pub fn new(target: &ExportTarget, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_params("chunk_size must be at least 1"));
        }
        if target.is_empty() {
            return Err(Error::invalid_params(
                "chunk_size requires to_json or to_csv",
            ));
        }

        Ok(Self {
            chunk_size,
            json: target.json.as_deref().map(ChunkDir::create).transpose()?,
            csv: target.csv.as_deref().map(ChunkDir::create).transpose()?,
            buffer: Vec::with_capacity(chunk_size),
            written: 0,
            chunks: Vec::new(),
        })
    }

    /// Records buffered but not yet written
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Buffer a page of records, writing every full chunk
    pub fn push(&mut self, records: Vec<JsonValue>, meta: &Meta) -> Result<()> {
        self.buffer.extend(records);
        while self.buffer.len() >= self.chunk_size {
            let chunk: Vec<JsonValue> = self.buffer.drain(..self.chunk_size).collect();
            self.write_chunk(&chunk, meta)?;
        }
        Ok(())
    }

    /// Write the remaining partial chunk and report what was written
    pub fn finish(mut self, meta: &Meta) -> Result<ExportSummary> {
        if !self.buffer.is_empty() {
            let chunk = std::mem::take(&mut self.buffer);
            self.write_chunk(&chunk, meta)?;
        }

        info!(
            chunks = self.chunks.len(),
            records = self.written,
            "Chunked export complete"
        );
        Ok(ExportSummary {
            chunks: self.chunks,
            total_records: self.written,
        })
    }

    fn write_chunk(&mut self, records: &[JsonValue], meta: &Meta) -> Result<()> {
        let range = ChunkRange {
            start: self.written + 1,
            end: self.written + records.len() as u64,
        };
        let mut files = Vec::new();

        if let Some(dir) = &self.json {
            let file = dir.file(&range, "json");
            write_json_file(&file, &ChunkPage { meta, results: records })?;
            files.push(file);
        }
        if let Some(dir) = &self.csv {
            let file = dir.file(&range, "csv");
            write_csv_file(&file, records)?;
            files.push(file);
        }

        info!(range = %range, files = files.len(), "Wrote chunk");
        self.written = range.end;
        self.chunks.push(WrittenChunk { range, files });
        Ok(())
    }
}
