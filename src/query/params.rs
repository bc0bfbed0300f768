//! Caller-facing search parameters and their validation
//!
//! [`SearchParameters::validate`] checks every combination rule up front and
//! resolves the pagination mode into a [`PaginationStrategy`], so nothing
//! downstream re-inspects the raw flags.

use super::filter::Filter;
use super::url::{Query, QueryBuilder};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::output::ExportTarget;
use crate::pagination::{PaginationStrategy, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::types::{EntityType, SearchField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Group By / Sort By
// ============================================================================

/// Field to aggregate counts by (`group_by=<field>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupBy(String);

impl GroupBy {
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupBy {
    fn from(field: &str) -> Self {
        Self::new(field)
    }
}

impl From<String> for GroupBy {
    fn from(field: String) -> Self {
        Self(field)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort field and direction (`sort=<field>` or `sort=<field>:desc`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortBy {
    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Asc => f.write_str(&self.field),
            SortOrder::Desc => write!(f, "{}:desc", self.field),
        }
    }
}

// ============================================================================
// Search Parameters
// ============================================================================

/// Parameters of a list request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    /// Free-text search
    pub search: Option<String>,
    /// Restrict the search to one field
    pub search_field: Option<SearchField>,
    /// Page size, 1..=200 (default 25)
    pub per_page: Option<u32>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// First page of an inclusive range
    pub start_page: Option<u32>,
    /// Last page of an inclusive range
    pub end_page: Option<u32>,
    /// Walk every page of the result set
    pub retrieve_all_pages: bool,
    pub filter: Option<Filter>,
    pub group_by: Option<GroupBy>,
    pub sort_by: Option<SortBy>,
    /// Write results to `<path>.json`, or to a chunk directory at `<path>`
    pub to_json: Option<PathBuf>,
    /// Write results to `<path>.csv`, or to a chunk directory at `<path>`
    pub to_csv: Option<PathBuf>,
    /// Records per chunk file when exporting all pages
    pub chunk_size: Option<usize>,
    /// Replace `abstract_inverted_index` with a plain-text `abstract`
    pub decode_abstracts: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            search: None,
            search_field: None,
            per_page: None,
            page: None,
            start_page: None,
            end_page: None,
            retrieve_all_pages: false,
            filter: None,
            group_by: None,
            sort_by: None,
            to_json: None,
            to_csv: None,
            chunk_size: None,
            decode_abstracts: true,
        }
    }
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn search_field(mut self, field: SearchField) -> Self {
        self.search_field = Some(field);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Fetch pages `start..=end`
    #[must_use]
    pub fn pages(mut self, start: u32, end: u32) -> Self {
        self.start_page = Some(start);
        self.end_page = Some(end);
        self
    }

    #[must_use]
    pub fn retrieve_all_pages(mut self, all: bool) -> Self {
        self.retrieve_all_pages = all;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn group_by(mut self, group_by: impl Into<GroupBy>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    #[must_use]
    pub fn to_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.to_json = Some(path.into());
        self
    }

    #[must_use]
    pub fn to_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.to_csv = Some(path.into());
        self
    }

    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    #[must_use]
    pub fn decode_abstracts(mut self, decode: bool) -> Self {
        self.decode_abstracts = decode;
        self
    }

    /// Output destinations
    pub fn export_target(&self) -> ExportTarget {
        ExportTarget {
            json: self.to_json.clone(),
            csv: self.to_csv.clone(),
        }
    }

    /// Check the parameters against `entity` and resolve the pagination mode
    pub fn validate(&self, entity: EntityType) -> Result<PaginationStrategy> {
        let has_range = self.start_page.is_some() || self.end_page.is_some();

        if self.retrieve_all_pages && has_range {
            return Err(Error::invalid_params(
                "retrieve_all_pages cannot be combined with start_page/end_page",
            ));
        }

        if let Some(chunk_size) = self.chunk_size {
            if has_range {
                return Err(Error::invalid_params(
                    "chunk_size cannot be combined with start_page/end_page",
                ));
            }
            if self.export_target().is_empty() {
                return Err(Error::invalid_params(
                    "chunk_size requires to_json or to_csv",
                ));
            }
            if !self.retrieve_all_pages {
                return Err(Error::invalid_params(
                    "chunk_size requires retrieve_all_pages",
                ));
            }
            if chunk_size == 0 {
                return Err(Error::invalid_params("chunk_size must be at least 1"));
            }
        }

        if let Some(field) = self.search_field {
            if self.search.as_deref().map_or(true, |s| s.trim().is_empty()) {
                return Err(Error::invalid_params("search_field requires search"));
            }
            if !entity.supports_search_field(field) {
                return Err(Error::UnsupportedSearchField {
                    entity: entity.to_string(),
                    field: field.to_string(),
                });
            }
        }

        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::invalid_params(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }

        if self.page == Some(0) {
            return Err(Error::invalid_params("page numbers start at 1"));
        }
        if self.page.is_some() && (has_range || self.retrieve_all_pages) {
            return Err(Error::invalid_params(
                "page cannot be combined with start_page/end_page or retrieve_all_pages",
            ));
        }

        match (self.start_page, self.end_page) {
            (Some(start), Some(end)) => {
                if start == 0 {
                    return Err(Error::invalid_params("page numbers start at 1"));
                }
                if start > end {
                    return Err(Error::invalid_params(format!(
                        "start_page ({start}) is after end_page ({end})"
                    )));
                }
                Ok(PaginationStrategy::PageRange {
                    start,
                    end,
                    per_page,
                })
            }
            (Some(_), None) | (None, Some(_)) => Err(Error::invalid_params(
                "start_page and end_page must be given together",
            )),
            (None, None) if self.retrieve_all_pages => Ok(PaginationStrategy::AllPages {
                chunk_size: self.chunk_size,
            }),
            (None, None) => Ok(PaginationStrategy::SinglePage {
                page: self.page.unwrap_or(1),
                per_page,
            }),
        }
    }

    /// Base query for `entity` under the configured API root
    pub fn query(&self, config: &ClientConfig, entity: EntityType) -> Query {
        QueryBuilder::new(config.base_url(), entity)
            .search(self.search.as_deref())
            .search_field(self.search_field)
            .filter(self.filter.as_ref())
            .group_by(self.group_by.as_ref())
            .sort_by(self.sort_by.as_ref())
            .auth_params(config.auth_params())
            .build()
    }
}
