//! Filter trees and their rendering
//!
//! A [`Filter`] is an ordered tree of keys whose leaves are scalars, lists
//! or nested filters. Rendering flattens it into dotted paths: nested keys
//! are joined with `.`, values collected at the same path are OR-ed with
//! `|`, and distinct paths are AND-ed with `,`:
//!
//! ```text
//! { authorships: { institutions: { country_code: ["fr", "de"] } },
//!   cited_by_count: ">10" }
//!   => authorships.institutions.country_code:fr|de,cited_by_count:>10
//! ```

use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::fmt;

// ============================================================================
// Scalars
// ============================================================================

/// A leaf value in a filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    $variant(value)
                }
            }

            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_from!(
    &str => |v: &str| Scalar::String(v.to_string()),
    String => Scalar::String,
    bool => Scalar::Bool,
    i32 => |v: i32| Scalar::Number(v.into()),
    i64 => |v: i64| Scalar::Number(v.into()),
    u32 => |v: u32| Scalar::Number(v.into()),
    u64 => |v: u64| Scalar::Number(v.into()),
    usize => |v: usize| Scalar::Number(v.into()),
    f64 => |v: f64| serde_json::Number::from_f64(v)
        .map_or_else(|| Scalar::String(v.to_string()), Scalar::Number),
);

// ============================================================================
// Filter Values
// ============================================================================

/// A node in a filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Single value at this path
    Scalar(Scalar),
    /// Alternatives at this path; nested filters keep the path prefix
    List(Vec<FilterValue>),
    /// Nested keys, composed into dotted paths
    Object(Filter),
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Filter> for FilterValue {
    fn from(value: Filter) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<JsonValue> for FilterValue {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::String(s) => Ok(Self::Scalar(Scalar::String(s))),
            JsonValue::Number(n) => Ok(Self::Scalar(Scalar::Number(n))),
            JsonValue::Bool(b) => Ok(Self::Scalar(Scalar::Bool(b))),
            JsonValue::Array(items) => items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(Self::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            JsonValue::Object(_) => Filter::try_from(value).map(Self::Object),
            JsonValue::Null => Err(Error::invalid_params("null is not a filter value")),
        }
    }
}

// ============================================================================
// Filter
// ============================================================================

/// An ordered filter tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, FilterValue)>,
}

impl Filter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, builder style
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a key; an existing key is replaced in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Check if the filter has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate top-level entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into dotted paths with every value found at each path
    pub fn flatten(&self) -> FlatFilter {
        let mut flat = FlatFilter::default();
        for (key, value) in &self.entries {
            collect_paths(value, key, &mut flat);
        }
        flat
    }

    /// Render as the API's filter syntax; empty when no leaf has a value
    pub fn to_filter_string(&self) -> String {
        self.flatten().to_string()
    }
}

impl TryFrom<JsonValue> for Filter {
    type Error = Error;

    /// Convert a JSON object; null members are skipped
    fn try_from(value: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = value else {
            return Err(Error::invalid_params("filter must be a JSON object"));
        };

        let mut filter = Self::new();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            filter.insert(key, FilterValue::try_from(value)?);
        }
        Ok(filter)
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (key, value) in iter {
            filter.insert(key, value);
        }
        filter
    }
}

fn collect_paths(value: &FilterValue, path: &str, flat: &mut FlatFilter) {
    match value {
        FilterValue::Scalar(scalar) => flat.push(path, scalar.clone()),
        FilterValue::List(items) => {
            for item in items {
                collect_paths(item, path, flat);
            }
        }
        FilterValue::Object(nested) => {
            for (key, child) in &nested.entries {
                collect_paths(child, &format!("{path}.{key}"), flat);
            }
        }
    }
}

// ============================================================================
// Flattened Filter
// ============================================================================

/// Dotted path → values, in first-seen path order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFilter {
    paths: Vec<(String, Vec<Scalar>)>,
}

impl FlatFilter {
    fn push(&mut self, path: &str, value: Scalar) {
        match self.paths.iter_mut().find(|(p, _)| p == path) {
            Some((_, values)) => values.push(value),
            None => self.paths.push((path.to_string(), vec![value])),
        }
    }

    /// Values collected at a path
    pub fn get(&self, path: &str) -> Option<&[Scalar]> {
        self.paths
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if no path carries a value
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate paths in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Scalar])> {
        self.paths.iter().map(|(p, v)| (p.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FlatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, values)) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{path}:")?;
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    f.write_str("|")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}
