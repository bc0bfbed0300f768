// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # OpenAlex SDK
//!
//! A typed, async client for the OpenAlex bibliographic API.
//!
//! ## Features
//!
//! - **Filter Trees**: Nested filters flattened into the API's `path:a|b,c:d` syntax
//! - **Cursor Pagination**: Single pages, page ranges, or every page of a result set
//! - **Chunked Export**: Stream large result sets to numbered JSON/CSV chunk files
//! - **Abstract Decoding**: Inverted abstract indexes turned back into text
//! - **Resilient HTTP**: Retries with backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openalex_sdk::{ClientConfig, Filter, OpenAlex, Result, SearchParameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = OpenAlex::new(ClientConfig::new().with_email("me@example.org"))?;
//!
//!     // Every open-access work of an institution, 1000 records per file
//!     let params = SearchParameters::new()
//!         .filter(
//!             Filter::new()
//!                 .with("institutions", Filter::new().with("ror", "https://ror.org/00cvxb145"))
//!                 .with("is_oa", true),
//!         )
//!         .retrieve_all_pages(true)
//!         .chunk_size(1000)
//!         .to_json("exports/works");
//!
//!     let summary = client.works().export_chunks(&params).await?;
//!     println!("{} records in {} chunks", summary.total_records, summary.chunks.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OpenAlex client                            │
//! │  get_one()   search_many()   autocomplete()   ngrams()          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬───────────┬──────┴────────┬───────────┬────────────┐
//! │   Query   │ Paginate  │    Decode     │  Output   │   HTTP     │
//! ├───────────┼───────────┼───────────────┼───────────┼────────────┤
//! │ Filter    │ Cursor    │ Abstract      │ JSON      │ Retry      │
//! │ URL       │ Range     │ index         │ CSV       │ Rate Limit │
//! │ Validate  │ All pages │               │ Chunks    │ Backoff    │
//! └───────────┴───────────┴───────────────┴───────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Filter rendering, URL building and parameter validation
pub mod query;

/// Cursor pagination strategies
pub mod pagination;

/// Abstract index decoding
pub mod decode;

/// JSON/CSV output and chunked export
pub mod output;

/// Client facade
pub mod client;

/// Citation snowballing
pub mod snowball;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{Entities, OpenAlex};
pub use config::{ClientConfig, HttpConfig};
pub use http::{HttpClient, Transport};
pub use output::{ExportSummary, ExportTarget};
pub use pagination::{Meta, PaginationStrategy, ResultPage};
pub use query::{Filter, FilterValue, GroupBy, SearchParameters, SortBy, SortOrder};
pub use snowball::{Relation, SnowballResult, WorkNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
