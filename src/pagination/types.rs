//! Pagination types
//!
//! Response envelope and the resolved pagination mode.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Cursor that starts a cursor-paginated walk
pub const START_CURSOR: &str = "*";

/// Largest page the API serves
pub const MAX_PER_PAGE: u32 = 200;

/// Page size when none is given
pub const DEFAULT_PER_PAGE: u32 = 25;

// ============================================================================
// Response Envelope
// ============================================================================

/// One list response, or several concatenated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub meta: Meta,

    #[serde(default)]
    pub results: Vec<JsonValue>,

    /// Buckets of a `group_by` request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<JsonValue>>,
}

impl ResultPage {
    /// Decode a response body
    pub fn from_json(body: JsonValue) -> Result<Self> {
        serde_json::from_value(body)
            .map_err(|e| Error::decode(format!("Malformed result page: {e}")))
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the page carries no records
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Cursor of the following page, if any
    pub fn next_cursor(&self) -> Option<&str> {
        self.meta.next_cursor.as_deref()
    }
}

/// Response metadata
///
/// Fields the client does not interpret are kept in `extra` so exports
/// reproduce the API's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Total records matching the query
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub db_response_time_ms: Option<u64>,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub per_page: Option<u32>,

    /// Only meaningful under cursor pagination
    #[serde(default)]
    pub next_cursor: Option<String>,

    #[serde(default)]
    pub groups_count: Option<u64>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Meta {
    /// Pages needed to cover `count` records at `per_page`
    pub fn total_pages(&self, per_page: u32) -> u64 {
        self.count.div_ceil(u64::from(per_page.max(1)))
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// How a list request walks the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// One page
    SinglePage { page: u32, per_page: u32 },

    /// Pages `start..=end`, concatenated
    PageRange { start: u32, end: u32, per_page: u32 },

    /// Every page at the maximum page size; exported in chunks when
    /// `chunk_size` is set
    AllPages { chunk_size: Option<usize> },
}

impl PaginationStrategy {
    /// Check if records are written in chunks instead of returned
    pub fn is_chunked(&self) -> bool {
        matches!(self, Self::AllPages { chunk_size: Some(_) })
    }
}
