//! OpenAlex client
//!
//! [`OpenAlex`] owns the configuration and a shared [`Transport`]; entity
//! handles returned by [`OpenAlex::works`] and friends issue the requests.
//!
//! ```no_run
//! use openalex_sdk::{ClientConfig, Filter, OpenAlex, SearchField, SearchParameters};
//!
//! # async fn run() -> openalex_sdk::Result<()> {
//! let client = OpenAlex::new(ClientConfig::new().with_email("me@example.org"))?;
//! let params = SearchParameters::new()
//!     .search("coral reef")
//!     .search_field(SearchField::TitleAndAbstract)
//!     .filter(Filter::new().with("publication_year", ">2019"))
//!     .pages(1, 3)
//!     .per_page(100);
//! let page = client.works().search_many(&params).await?;
//! println!("{} of {} works", page.results.len(), page.meta.count);
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, Transport};
use crate::output::{ChunkedExporter, ExportSummary};
use crate::pagination::{PageFetcher, PaginationStrategy, ResultPage};
use crate::query::{QueryBuilder, SearchParameters};
use crate::types::{EntityType, ExternalId, JsonValue};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the OpenAlex API
#[derive(Clone)]
pub struct OpenAlex {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl OpenAlex {
    /// Create a client backed by [`HttpClient`]
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(HttpClientConfig::from(&config.http))?;
        Ok(Self {
            config,
            transport: Arc::new(http),
        })
    }

    /// Create a client from `OPENALEX_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Handle for any entity collection
    pub fn entity(&self, entity: EntityType) -> Entities<'_> {
        Entities {
            client: self,
            entity,
        }
    }

    pub fn works(&self) -> Entities<'_> {
        self.entity(EntityType::Works)
    }

    pub fn authors(&self) -> Entities<'_> {
        self.entity(EntityType::Authors)
    }

    pub fn sources(&self) -> Entities<'_> {
        self.entity(EntityType::Sources)
    }

    pub fn institutions(&self) -> Entities<'_> {
        self.entity(EntityType::Institutions)
    }

    pub fn topics(&self) -> Entities<'_> {
        self.entity(EntityType::Topics)
    }

    pub(crate) fn url_for(&self, path: &str) -> QueryBuilder {
        QueryBuilder::with_path(self.config.base_url(), path)
            .auth_params(self.config.auth_params())
    }
}

impl std::fmt::Debug for OpenAlex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlex")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Entity Handle
// ============================================================================

/// Requests against one entity collection
#[derive(Debug, Clone, Copy)]
pub struct Entities<'a> {
    client: &'a OpenAlex,
    entity: EntityType,
}

impl Entities<'_> {
    pub fn entity_type(&self) -> EntityType {
        self.entity
    }

    /// Fetch one entity by OpenAlex id, or by external id in `namespace`
    pub async fn get_one(&self, id: &str, namespace: Option<ExternalId>) -> Result<JsonValue> {
        if id.trim().is_empty() {
            return Err(Error::invalid_params("id must not be empty"));
        }

        let key = match namespace {
            Some(ns) if !self.entity.supports_external_id(ns) => {
                return Err(Error::UnsupportedExternalId {
                    entity: self.entity.to_string(),
                    namespace: ns.to_string(),
                });
            }
            Some(ns) => ns.qualify(id),
            None => id.to_string(),
        };

        let url = self
            .client
            .url_for(&format!("{}/{key}", self.entity.path()))
            .build()
            .url();
        debug!(entity = %self.entity, id = %key, "Fetching entity");
        self.client.transport.get_json(&url).await
    }

    /// Run a list request
    ///
    /// Results are also written to the requested JSON/CSV destinations. For
    /// a chunked export the returned page carries the final meta and no
    /// records; see [`export_chunks`](Self::export_chunks) for the summary.
    pub async fn search_many(&self, params: &SearchParameters) -> Result<ResultPage> {
        let (page, _) = self.run(params).await?;
        Ok(page)
    }

    /// Run a chunked all-pages export and report the chunks written
    pub async fn export_chunks(&self, params: &SearchParameters) -> Result<ExportSummary> {
        if !params.validate(self.entity)?.is_chunked() {
            return Err(Error::invalid_params(
                "export_chunks requires retrieve_all_pages and chunk_size",
            ));
        }
        let (_, summary) = self.run(params).await?;
        summary.ok_or_else(|| Error::output("Chunked export produced no summary"))
    }

    async fn run(&self, params: &SearchParameters) -> Result<(ResultPage, Option<ExportSummary>)> {
        let strategy = params.validate(self.entity)?;
        let query = params.query(&self.client.config, self.entity);
        let fetcher = PageFetcher::new(self.client.transport.as_ref(), &query)
            .decode_abstracts(params.decode_abstracts);

        info!(entity = %self.entity, ?strategy, url = %query, "Searching");

        match strategy {
            PaginationStrategy::AllPages {
                chunk_size: Some(chunk_size),
            } => {
                let exporter = ChunkedExporter::new(&params.export_target(), chunk_size)?;
                let (page, summary) = fetcher.fetch_all_chunked(exporter).await?;
                Ok((page, Some(summary)))
            }
            strategy => {
                let page = fetcher.fetch(strategy).await?;
                params.export_target().write(&page)?;
                Ok((page, None))
            }
        }
    }

    /// Type-ahead suggestions for `query`
    pub async fn autocomplete(&self, query: &str) -> Result<ResultPage> {
        if query.trim().is_empty() {
            return Err(Error::invalid_params("autocomplete query must not be empty"));
        }

        let url = self
            .client
            .url_for(&format!("autocomplete/{}", self.entity.path()))
            .param("q", query)
            .build()
            .url();
        ResultPage::from_json(self.client.transport.get_json(&url).await?)
    }

    /// N-grams of a work's full text
    pub async fn ngrams(&self, id: &str) -> Result<JsonValue> {
        if self.entity != EntityType::Works {
            return Err(Error::invalid_params(format!(
                "ngrams are only available for works, not {}",
                self.entity
            )));
        }
        if id.trim().is_empty() {
            return Err(Error::invalid_params("id must not be empty"));
        }

        let url = self.client.url_for(&format!("works/{id}/ngrams")).build().url();
        self.client.transport.get_json(&url).await
    }
}
