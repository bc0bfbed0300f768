//! Common types used throughout the OpenAlex SDK
//!
//! This module contains shared type definitions, type aliases,
//! and the entity vocabulary used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Entity Type
// ============================================================================

/// The API entity collections this client can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Works,
    Authors,
    Sources,
    Institutions,
    Topics,
}

impl EntityType {
    /// Path segment used in request URLs
    pub fn path(&self) -> &'static str {
        match self {
            Self::Works => "works",
            Self::Authors => "authors",
            Self::Sources => "sources",
            Self::Institutions => "institutions",
            Self::Topics => "topics",
        }
    }

    /// Search fields accepted by `<field>.search` filters on this entity
    pub fn search_fields(&self) -> &'static [SearchField] {
        match self {
            Self::Works => &[
                SearchField::Abstract,
                SearchField::Title,
                SearchField::TitleAndAbstract,
                SearchField::DisplayName,
                SearchField::Fulltext,
            ],
            Self::Authors | Self::Sources | Self::Institutions | Self::Topics => {
                &[SearchField::DisplayName]
            }
        }
    }

    /// Check whether a search field is accepted by this entity
    pub fn supports_search_field(&self, field: SearchField) -> bool {
        self.search_fields().contains(&field)
    }

    /// External id namespaces accepted by single-entity lookups
    pub fn external_ids(&self) -> &'static [ExternalId] {
        match self {
            Self::Works => &[
                ExternalId::Doi,
                ExternalId::Mag,
                ExternalId::Pmid,
                ExternalId::Pmcid,
            ],
            Self::Authors => &[
                ExternalId::Orcid,
                ExternalId::Scopus,
                ExternalId::Twitter,
                ExternalId::Wikipedia,
            ],
            Self::Institutions => &[ExternalId::Ror, ExternalId::Mag, ExternalId::Wikidata],
            Self::Sources => &[
                ExternalId::Issn,
                ExternalId::IssnL,
                ExternalId::Mag,
                ExternalId::Fatcat,
                ExternalId::Wikidata,
            ],
            Self::Topics => &[],
        }
    }

    /// Check whether an external id namespace is accepted by this entity
    pub fn supports_external_id(&self, namespace: ExternalId) -> bool {
        self.external_ids().contains(&namespace)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ============================================================================
// Search Field
// ============================================================================

/// Field targeted by a field-scoped search (`<field>.search:<text>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Abstract,
    Title,
    TitleAndAbstract,
    DisplayName,
    Fulltext,
}

impl SearchField {
    /// Name of the field as used in filter clauses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Title => "title",
            Self::TitleAndAbstract => "title_and_abstract",
            Self::DisplayName => "display_name",
            Self::Fulltext => "fulltext",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abstract" => Ok(Self::Abstract),
            "title" => Ok(Self::Title),
            "title_and_abstract" => Ok(Self::TitleAndAbstract),
            "display_name" => Ok(Self::DisplayName),
            "fulltext" => Ok(Self::Fulltext),
            other => Err(crate::Error::invalid_params(format!(
                "Invalid search field: {other}"
            ))),
        }
    }
}

// ============================================================================
// External Ids
// ============================================================================

/// Namespace of an external identifier (`<namespace>:<id>` lookups)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalId {
    Doi,
    Mag,
    Pmid,
    Pmcid,
    Orcid,
    Scopus,
    Twitter,
    Wikipedia,
    Ror,
    Wikidata,
    Issn,
    IssnL,
    Fatcat,
}

impl ExternalId {
    /// Namespace prefix as used in lookup paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Mag => "mag",
            Self::Pmid => "pmid",
            Self::Pmcid => "pmcid",
            Self::Orcid => "orcid",
            Self::Scopus => "scopus",
            Self::Twitter => "twitter",
            Self::Wikipedia => "wikipedia",
            Self::Ror => "ror",
            Self::Wikidata => "wikidata",
            Self::Issn => "issn",
            Self::IssnL => "issn_l",
            Self::Fatcat => "fatcat",
        }
    }

    /// Render `<namespace>:<id>`, completing bare ROR ids to their URL form
    pub fn qualify(&self, id: &str) -> String {
        match self {
            Self::Ror if !id.starts_with("http") => {
                format!("{}:https://ror.org/{id}", self.as_str())
            }
            _ => format!("{}:{id}", self.as_str()),
        }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
