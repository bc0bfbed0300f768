//! Query construction
//!
//! Turns [`SearchParameters`] into request URLs:
//!
//! - [`Filter`] trees are flattened into dotted paths and rendered as
//!   `path:a|b,other:c`
//! - [`QueryBuilder`] assembles the endpoint, filter, search, grouping and
//!   sort parameters into a [`Query`]
//! - [`Query::page_url`] adds `per_page` and `cursor` for each request

mod filter;
mod params;
mod url;

pub use filter::{Filter, FilterValue, FlatFilter, Scalar};
pub use params::{GroupBy, SearchParameters, SortBy, SortOrder};
pub use url::{escape_value, Query, QueryBuilder};
