//! Page stream and aggregation strategies
//!
//! [`page_stream`] lazily follows `next_cursor` from a starting cursor.
//! [`PageFetcher`] builds the three strategies on top of it: a single page,
//! an explicit page range, and every page (accumulated or exported in
//! chunks). Fetches are strictly sequential since each request needs the
//! previous response's cursor.

use super::cursor::resolve_cursor;
use super::types::{Meta, PaginationStrategy, ResultPage, MAX_PER_PAGE, START_CURSOR};
use crate::decode;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::output::{ChunkedExporter, ExportSummary};
use crate::query::Query;
use crate::types::JsonValue;
use futures::stream::{self, Stream, TryStreamExt};
use std::time::Instant;
use tracing::{debug, info};

// ============================================================================
// Page Stream
// ============================================================================

struct StreamState {
    cursor: Option<String>,
    fetched: u64,
}

/// Lazy stream of pages following the cursor chain
///
/// Ends after `limit` pages, when a response has no `next_cursor`, or when
/// a page comes back empty. Nothing is requested until the stream is polled.
pub fn page_stream<'a, T: Transport + ?Sized>(
    transport: &'a T,
    query: &'a Query,
    per_page: u32,
    start_cursor: String,
    limit: Option<u64>,
) -> impl Stream<Item = Result<ResultPage>> + Send + 'a {
    let init = StreamState {
        cursor: Some(start_cursor),
        fetched: 0,
    };
    stream::try_unfold(init, move |state| {
        next_page(transport, query, per_page, limit, state)
    })
}

async fn next_page<T: Transport + ?Sized>(
    transport: &T,
    query: &Query,
    per_page: u32,
    limit: Option<u64>,
    state: StreamState,
) -> Result<Option<(ResultPage, StreamState)>> {
    let Some(cursor) = state.cursor else {
        return Ok(None);
    };
    if limit.is_some_and(|max| state.fetched >= max) {
        return Ok(None);
    }

    let url = query.page_url(per_page, &cursor);
    let page = ResultPage::from_json(transport.get_json(&url).await?)?;
    debug!(
        page = state.fetched + 1,
        records = page.len(),
        has_next = page.next_cursor().is_some(),
        "Fetched page"
    );

    let cursor = if page.is_empty() {
        None
    } else {
        page.meta.next_cursor.clone()
    };
    let next = StreamState {
        cursor,
        fetched: state.fetched + 1,
    };
    Ok(Some((page, next)))
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Runs a pagination strategy against one query
pub struct PageFetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    query: &'a Query,
    decode_abstracts: bool,
}

impl<'a, T: Transport + ?Sized> PageFetcher<'a, T> {
    /// Create a fetcher; abstracts are decoded by default
    pub fn new(transport: &'a T, query: &'a Query) -> Self {
        Self {
            transport,
            query,
            decode_abstracts: true,
        }
    }

    /// Toggle abstract decoding of fetched records
    #[must_use]
    pub fn decode_abstracts(mut self, decode: bool) -> Self {
        self.decode_abstracts = decode;
        self
    }

    /// Raw page stream over this fetcher's query
    pub fn pages(
        &self,
        per_page: u32,
        start_cursor: String,
        limit: Option<u64>,
    ) -> impl Stream<Item = Result<ResultPage>> + Send + 'a {
        page_stream(self.transport, self.query, per_page, start_cursor, limit)
    }

    /// Run a non-chunked strategy
    ///
    /// `AllPages` accumulates every record here regardless of `chunk_size`;
    /// use [`fetch_all_chunked`](Self::fetch_all_chunked) to export instead.
    pub async fn fetch(&self, strategy: PaginationStrategy) -> Result<ResultPage> {
        match strategy {
            PaginationStrategy::SinglePage { page, per_page } => {
                self.fetch_page(page, per_page).await
            }
            PaginationStrategy::PageRange {
                start,
                end,
                per_page,
            } => self.fetch_range(start, end, per_page).await,
            PaginationStrategy::AllPages { .. } => self.fetch_all().await,
        }
    }

    /// Fetch one page by number
    pub async fn fetch_page(&self, page: u32, per_page: u32) -> Result<ResultPage> {
        let cursor = resolve_cursor(self.transport, self.query, page, per_page).await?;
        let url = self.query.page_url(per_page, &cursor);
        let mut result = ResultPage::from_json(self.transport.get_json(&url).await?)?;

        result.meta.page = Some(page);
        self.post_process(&mut result.results);
        Ok(result)
    }

    /// Fetch pages `start..=end` and concatenate them in order
    ///
    /// The returned meta is the first page's, with `page` set to the last
    /// page reached and `next_cursor` to the last cursor seen.
    pub async fn fetch_range(&self, start: u32, end: u32, per_page: u32) -> Result<ResultPage> {
        if start == 0 || start > end {
            return Err(Error::invalid_params(format!(
                "invalid page range {start}..={end}"
            )));
        }

        let cursor = resolve_cursor(self.transport, self.query, start, per_page).await?;
        let pages = self.pages(per_page, cursor, Some(u64::from(end - start + 1)));
        futures::pin_mut!(pages);

        let mut combined = ResultPage::default();
        let mut fetched = 0u32;
        while let Some(page) = pages.try_next().await? {
            let ResultPage {
                meta,
                mut results,
                group_by,
            } = page;
            self.post_process(&mut results);

            if fetched == 0 {
                combined.meta = meta;
                combined.group_by = group_by;
            } else {
                combined.meta.next_cursor = meta.next_cursor;
            }
            combined.results.append(&mut results);
            fetched += 1;
        }

        combined.meta.page = Some(start + fetched.saturating_sub(1));
        info!(
            start,
            end,
            pages = fetched,
            records = combined.len(),
            "Fetched page range"
        );
        Ok(combined)
    }

    /// Fetch every page at the maximum page size
    pub async fn fetch_all(&self) -> Result<ResultPage> {
        let mut results = Vec::new();
        let (meta, group_by) = self
            .walk_all(|records, _| {
                results.extend(records);
                Ok(())
            })
            .await?;

        Ok(ResultPage {
            meta,
            results,
            group_by,
        })
    }

    /// Fetch every page, handing records to `exporter` as they arrive
    ///
    /// The returned page carries the final meta and no records.
    pub async fn fetch_all_chunked(
        &self,
        mut exporter: ChunkedExporter,
    ) -> Result<(ResultPage, ExportSummary)> {
        let (meta, group_by) = self
            .walk_all(|records, meta| exporter.push(records, meta))
            .await?;
        let summary = exporter.finish(&meta)?;

        let page = ResultPage {
            meta,
            results: Vec::new(),
            group_by,
        };
        Ok((page, summary))
    }

    /// Walk the whole cursor chain, feeding each page's records to `sink`
    ///
    /// The page count comes from the first response's `count`; the walk also
    /// stops early if the API stops returning a cursor.
    async fn walk_all<F>(&self, mut sink: F) -> Result<(Meta, Option<Vec<JsonValue>>)>
    where
        F: FnMut(Vec<JsonValue>, &Meta) -> Result<()>,
    {
        let started = Instant::now();
        let pages = self.pages(MAX_PER_PAGE, START_CURSOR.to_string(), None);
        futures::pin_mut!(pages);

        let Some(first) = pages.try_next().await? else {
            return Ok((Meta::default(), None));
        };
        let total_pages = first.meta.total_pages(MAX_PER_PAGE).max(1);
        info!(
            count = first.meta.count,
            total_pages, "Retrieving all pages"
        );

        let ResultPage {
            mut meta,
            mut results,
            group_by,
        } = first;
        self.post_process(&mut results);
        sink(results, &meta)?;

        let mut fetched = 1u64;
        while fetched < total_pages {
            let Some(page) = pages.try_next().await? else {
                break;
            };
            fetched += 1;

            let ResultPage {
                meta: page_meta,
                mut results,
                ..
            } = page;
            meta.next_cursor = page_meta.next_cursor;
            self.post_process(&mut results);
            debug!(page = fetched, total_pages, "Processing page");
            sink(results, &meta)?;
        }

        meta.page = u32::try_from(fetched).ok();
        meta.per_page = Some(MAX_PER_PAGE);

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(pages = fetched, total_pages, elapsed_ms, "Retrieved all pages");
        Ok((meta, group_by))
    }

    fn post_process(&self, records: &mut [JsonValue]) {
        if self.decode_abstracts {
            decode::decode_abstracts(records);
        }
    }
}
