//! Pagination module
//!
//! Cursor pagination over list endpoints.
//!
//! # Overview
//!
//! Every list request is paged by cursor: the first request uses `*` and
//! each response names the cursor of the next page. Page numbers are mapped
//! onto the cursor chain by [`resolve_cursor`], and [`PageFetcher`] runs the
//! single page, page range and all-pages strategies over a [`page_stream`].

mod cursor;
mod fetcher;
mod types;

pub use cursor::resolve_cursor;
pub use fetcher::{page_stream, PageFetcher};
pub use types::{
    Meta, PaginationStrategy, ResultPage, DEFAULT_PER_PAGE, MAX_PER_PAGE, START_CURSOR,
};
