//! Request URL assembly
//!
//! A [`Query`] is the fixed part of a list request: endpoint plus the
//! search, filter, grouping and sort parameters. Pagination parameters are
//! appended per request by [`Query::page_url`], followed by the polite-pool
//! and key parameters so that every URL has the same parameter order:
//!
//! ```text
//! <base>/<entity>?filter=…&group_by=…&sort=…&per_page=…&cursor=…&mailto=…&api_key=…
//! ```

use super::filter::Filter;
use super::params::{GroupBy, SortBy};
use crate::types::{EntityType, SearchField};
use std::borrow::Cow;
use std::fmt;

/// Escape the characters that would break a query string
///
/// Everything else is left as-is so URLs stay readable in logs; the HTTP
/// layer completes encoding when the URL is parsed.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['%', '&', '#', '+', ' ']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '&' => escaped.push_str("%26"),
            '#' => escaped.push_str("%23"),
            '+' => escaped.push_str("%2B"),
            ' ' => escaped.push_str("%20"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

// ============================================================================
// Query
// ============================================================================

/// The pagination-independent part of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    endpoint: String,
    params: Vec<(String, String)>,
    trailing: Vec<(String, String)>,
}

impl Query {
    /// Start building a query against `<base_url>/<entity>`
    pub fn builder(base_url: &str, entity: EntityType) -> QueryBuilder {
        QueryBuilder::new(base_url, entity)
    }

    /// Endpoint without query string
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Value of a non-pagination parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .chain(&self.trailing)
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL of one page: `per_page` and `cursor` slot in before the
    /// authentication parameters
    pub fn page_url(&self, per_page: u32, cursor: &str) -> String {
        let pagination = [
            ("per_page".to_string(), per_page.to_string()),
            ("cursor".to_string(), cursor.to_string()),
        ];
        render(
            &self.endpoint,
            self.params.iter().chain(&pagination).chain(&self.trailing),
        )
    }

    /// URL without pagination parameters
    pub fn url(&self) -> String {
        render(&self.endpoint, self.params.iter().chain(&self.trailing))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn render<'a>(endpoint: &str, params: impl Iterator<Item = &'a (String, String)>) -> String {
    let query = params
        .map(|(k, v)| format!("{k}={}", escape_value(v)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}?{query}")
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Query`]
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: String,
    search: Option<String>,
    search_field: Option<SearchField>,
    filter: Option<Filter>,
    group_by: Option<GroupBy>,
    sort_by: Option<SortBy>,
    extra: Vec<(String, String)>,
    trailing: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a builder for `<base_url>/<entity>`
    pub fn new(base_url: &str, entity: EntityType) -> Self {
        Self::with_path(base_url, entity.path())
    }

    /// Create a builder for an arbitrary path under the API root
    pub fn with_path(base_url: &str, path: &str) -> Self {
        Self {
            endpoint: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            search: None,
            search_field: None,
            filter: None,
            group_by: None,
            sort_by: None,
            extra: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Full-text search; scoped to a field when [`search_field`](Self::search_field) is set
    ///
    /// Blank text counts as no search.
    #[must_use]
    pub fn search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        self
    }

    /// Field scoping the search
    #[must_use]
    pub fn search_field(mut self, field: Option<SearchField>) -> Self {
        self.search_field = field;
        self
    }

    /// Structured filter
    #[must_use]
    pub fn filter(mut self, filter: Option<&Filter>) -> Self {
        self.filter = filter.cloned();
        self
    }

    /// Grouping field
    #[must_use]
    pub fn group_by(mut self, group_by: Option<&GroupBy>) -> Self {
        self.group_by = group_by.cloned();
        self
    }

    /// Sort order
    #[must_use]
    pub fn sort_by(mut self, sort_by: Option<&SortBy>) -> Self {
        self.sort_by = sort_by.cloned();
        self
    }

    /// Add a raw parameter after the standard ones
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Parameters rendered last, after pagination
    #[must_use]
    pub fn auth_params<K: Into<String>>(
        mut self,
        params: impl IntoIterator<Item = (K, String)>,
    ) -> Self {
        self.trailing
            .extend(params.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Assemble the query
    ///
    /// A field-scoped search becomes the last filter clause
    /// (`<field>.search:<text>`); an unscoped search is sent as `search`.
    pub fn build(self) -> Query {
        let mut params = Vec::new();

        let filter_string = self
            .filter
            .as_ref()
            .map(Filter::to_filter_string)
            .filter(|s| !s.is_empty());

        match (&self.search, self.search_field) {
            (Some(search), Some(field)) => {
                let clause = format!("{}.search:{search}", field.as_str());
                let clauses = match filter_string {
                    Some(rest) => format!("{rest},{clause}"),
                    None => clause,
                };
                params.push(("filter".to_string(), clauses));
            }
            (search, _) => {
                if let Some(rest) = filter_string {
                    params.push(("filter".to_string(), rest));
                }
                if let Some(search) = search {
                    params.push(("search".to_string(), search.clone()));
                }
            }
        }

        if let Some(group_by) = &self.group_by {
            params.push(("group_by".to_string(), group_by.as_str().to_string()));
        }

        if let Some(sort_by) = &self.sort_by {
            params.push(("sort".to_string(), sort_by.to_string()));
        }

        params.extend(self.extra);

        Query {
            endpoint: self.endpoint,
            params,
            trailing: self.trailing,
        }
    }
}
