//! Red List API HTTP client

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::credential;
use crate::error::Result;
use crate::options;
use crate::paginate::{combine, fetch_pages, Progress, RECORD_FIELD};
use crate::parse::{parse, Parsed};
use crate::request::{self, TransportOptions, DEFAULT_BASE_URL};
use crate::response::classify;
use crate::transport::Transport;
use crate::types::{AssessmentQuery, Credential, PageSelection, Query};
use crate::validation;

/// Settings for a [`RedListClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Explicit API key; highest priority credential source
    pub key: Option<String>,
    /// Options file consulted when no key is given or set in the environment
    pub options_path: Option<PathBuf>,
    pub transport: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: None,
            options_path: options::default_path(),
            transport: TransportOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_options_path(mut self, path: Option<PathBuf>) -> Self {
        self.options_path = path;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.transport.proxy = Some(proxy.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for the IUCN Red List API
///
/// Every call resolves its API key afresh (argument, `IUCN_REDLIST_KEY`,
/// options file) and paged queries are walked strictly one page at a time.
pub struct RedListClient {
    transport: Transport,
    config: ClientConfig,
}

impl RedListClient {
    /// Client with default settings; the key comes from the environment or options file
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client using an explicit API key
    pub fn with_key(key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::default().with_key(key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        // Fail early on a bad base URL rather than on the first request.
        url::Url::parse(&config.base_url)?;
        let transport = Transport::new(&config.transport)?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn credential(&self) -> Result<Credential> {
        credential::resolve(self.config.key.as_deref(), self.config.options_path.as_deref())
    }

    /// GET one page of `path` and return the classified raw body
    pub async fn get(&self, path: &str, query: &Query) -> Result<String> {
        let credential = self.credential()?;
        let request = request::build(
            &self.config.base_url,
            path,
            &credential,
            query,
            &self.config.transport,
        )?;
        debug!(path, "GET");
        let raw = self.transport.execute(&request).await?;
        classify(raw.status, raw.body)
    }

    /// Walk every page of `path`, returning the raw pages to combine
    pub async fn get_all(&self, path: &str, query: &Query, quiet: bool) -> Result<Vec<String>> {
        let mut progress = Progress::stderr(quiet);
        fetch_pages(
            |page| {
                let query = query.with_page(page);
                async move { self.get(path, &query).await }
            },
            RECORD_FIELD,
            &mut progress,
        )
        .await
    }

    /// Fetch a paged endpoint and decode the (combined) result
    pub async fn fetch_paged(
        &self,
        path: &str,
        query: &Query,
        pages: PageSelection,
        quiet: bool,
        flatten: bool,
    ) -> Result<Parsed> {
        match pages {
            PageSelection::All => {
                let bodies = self.get_all(path, query, quiet).await?;
                combine(&bodies, flatten, RECORD_FIELD)
            }
            PageSelection::Page(n) => {
                let n = validation::page_number(n)?;
                let body = self.get(path, &query.with_page(n)).await?;
                parse(&body, flatten)
            }
        }
    }

    /// Fetch an assessment-listing endpoint with the usual filters
    pub async fn fetch_assessments(&self, path: &str, q: &AssessmentQuery) -> Result<Parsed> {
        if let Some(year) = q.year_published {
            validation::year("year_published", year)?;
        }
        if let Some(scope) = q.scope_code.as_deref() {
            validation::non_empty("scope_code", scope)?;
        }
        self.fetch_paged(path, &q.to_query(), q.pages, q.quiet, q.flatten)
            .await
    }

    /// Fetch an unpaged endpoint and decode it
    pub async fn fetch(&self, path: &str, query: &Query, flatten: bool) -> Result<Parsed> {
        let body = self.get(path, query).await?;
        parse(&body, flatten)
    }
}
