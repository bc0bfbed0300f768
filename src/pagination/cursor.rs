//! Page number → cursor resolution
//!
//! The API only pages by cursor, so reaching page N means walking the
//! cursor chain from the start, skipping `(N - 1) * per_page` records in
//! steps of at most [`MAX_PER_PAGE`].

use super::types::{ResultPage, MAX_PER_PAGE, START_CURSOR};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::query::Query;
use tracing::debug;

/// Resolve the cursor that starts `page` at `per_page` records per page
///
/// Page 1 resolves to [`START_CURSOR`] without a request. Fails with
/// [`Error::CursorExhausted`] when the chain ends before the page.
pub async fn resolve_cursor<T: Transport + ?Sized>(
    transport: &T,
    query: &Query,
    page: u32,
    per_page: u32,
) -> Result<String> {
    if page == 0 {
        return Err(Error::invalid_params("page numbers start at 1"));
    }

    let mut cursor = START_CURSOR.to_string();
    let mut remaining = u64::from(page - 1) * u64::from(per_page);

    while remaining > 0 {
        let step = remaining.min(u64::from(MAX_PER_PAGE));
        // step <= MAX_PER_PAGE
        #[allow(clippy::cast_possible_truncation)]
        let url = query.page_url(step as u32, &cursor);

        let response = ResultPage::from_json(transport.get_json(&url).await?)?;
        cursor = response
            .meta
            .next_cursor
            .ok_or(Error::CursorExhausted { page })?;
        remaining -= step;

        debug!(page, skipped = step, remaining, "Advanced cursor");
    }

    Ok(cursor)
}
