//! Citation snowballing
//!
//! Starting from a seed work, collect the works citing it, the works it
//! cites, and its related works. With `depth > 1` every work found is
//! expanded again along the same relation, producing one tree per
//! relation.

use crate::client::OpenAlex;
use crate::error::{Error, Result};
use crate::query::{Filter, SearchParameters};
use crate::types::{ExternalId, JsonValue};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::debug;

const OPENALEX_ID_PREFIX: &str = "https://openalex.org/";

/// Direction of a snowball expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Works citing this one
    CitedBy,
    /// Works this one references
    Cites,
    /// Works the API lists as related
    Related,
}

/// A work and its expansion along one relation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkNode {
    pub work: JsonValue,
    pub children: Vec<WorkNode>,
}

/// Snowball trees around a seed work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowballResult {
    pub seed: JsonValue,
    pub cited_by: Vec<WorkNode>,
    pub cites: Vec<WorkNode>,
    pub related: Vec<WorkNode>,
}

impl SnowballResult {
    /// Total works across all trees, seed excluded
    pub fn len(&self) -> usize {
        fn count(nodes: &[WorkNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.cited_by) + count(&self.cites) + count(&self.related)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strip the `https://openalex.org/` prefix from an entity id
pub fn short_id(id: &str) -> &str {
    id.strip_prefix(OPENALEX_ID_PREFIX).unwrap_or(id)
}

impl OpenAlex {
    /// Snowball around a work to `depth` levels
    ///
    /// Cited-by lookups take the first page of citing works; references and
    /// related works are fetched one by one.
    pub async fn snowball(
        &self,
        id: &str,
        namespace: Option<ExternalId>,
        depth: u32,
    ) -> Result<SnowballResult> {
        if depth == 0 {
            return Err(Error::invalid_params("snowball depth must be at least 1"));
        }

        let seed = self.works().get_one(id, namespace).await?;
        let cited_by = self.expand(Relation::CitedBy, &seed, depth).await?;
        let cites = self.expand(Relation::Cites, &seed, depth).await?;
        let related = self.expand(Relation::Related, &seed, depth).await?;

        Ok(SnowballResult {
            seed,
            cited_by,
            cites,
            related,
        })
    }

    fn expand<'a>(
        &'a self,
        relation: Relation,
        work: &'a JsonValue,
        depth: u32,
    ) -> BoxFuture<'a, Result<Vec<WorkNode>>> {
        async move {
            let neighbours = self.neighbours(relation, work).await?;
            debug!(?relation, depth, found = neighbours.len(), "Expanded work");

            let mut nodes = Vec::with_capacity(neighbours.len());
            for neighbour in neighbours {
                let children = if depth > 1 {
                    self.expand(relation, &neighbour, depth - 1).await?
                } else {
                    Vec::new()
                };
                nodes.push(WorkNode {
                    work: neighbour,
                    children,
                });
            }
            Ok(nodes)
        }
        .boxed()
    }

    async fn neighbours(&self, relation: Relation, work: &JsonValue) -> Result<Vec<JsonValue>> {
        match relation {
            Relation::CitedBy => {
                let Some(id) = work.get("id").and_then(JsonValue::as_str) else {
                    return Ok(Vec::new());
                };
                let params = SearchParameters::new()
                    .filter(Filter::new().with("cites", short_id(id)))
                    .decode_abstracts(false);
                Ok(self.works().search_many(&params).await?.results)
            }
            Relation::Cites => self.fetch_listed(work, "referenced_works").await,
            Relation::Related => self.fetch_listed(work, "related_works").await,
        }
    }

    async fn fetch_listed(&self, work: &JsonValue, field: &str) -> Result<Vec<JsonValue>> {
        let ids: Vec<&str> = work
            .get(field)
            .and_then(JsonValue::as_array)
            .map(|ids| ids.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();

        let mut works = Vec::with_capacity(ids.len());
        for id in ids {
            works.push(self.works().get_one(short_id(id), None).await?);
        }
        Ok(works)
    }
}
