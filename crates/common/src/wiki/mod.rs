//! Wikipedia API client abstraction
//!
//! The [`WikiClient`] trait covers the three calls the service makes against the
//! MediaWiki Action API:
//! - full-text search (`list=search`)
//! - page details (`prop=links|categories|info|extracts`)
//! - open-search title suggestions (`action=opensearch`)

pub mod models;

pub use models::{PageDetail, PageDetailsResponse, PageRef, SearchHit, SearchResponse};

use crate::config::WikipediaConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Trait for the upstream encyclopedia API
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Full-text search for `term`, at most `limit` hits
    async fn search(&self, term: &str, limit: u32) -> Result<SearchResponse>;

    /// Links, categories, canonical URL and intro extract of one page
    async fn page_details(&self, page_id: u64) -> Result<PageDetailsResponse>;

    /// Title suggestions for `term`, at most `limit` entries
    async fn suggest(&self, term: &str, limit: u32) -> Result<Vec<String>>;
}

/// MediaWiki Action API client over HTTP
pub struct HttpWikiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpWikiClient {
    /// Create a new client from configuration
    pub fn new(config: &WikipediaConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api_endpoint.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let start = Instant::now();
        let result = self.send::<T>(params).await;
        metrics::record_wiki_request(kind, start.elapsed().as_secs_f64(), result.is_ok());

        if let Err(e) = &result {
            tracing::warn!(kind, error = %e, "Wikipedia request failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<T> {
        let response = self.client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                code: status.as_u16().to_string(),
                info: body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

fn check_embedded_error(error: Option<&models::WikiApiError>) -> Result<()> {
    match error {
        Some(e) => Err(AppError::Upstream {
            code: e.code.clone(),
            info: e.info.clone(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl WikiClient for HttpWikiClient {
    async fn search(&self, term: &str, limit: u32) -> Result<SearchResponse> {
        let params = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", term.to_string()),
            ("srlimit", limit.to_string()),
            ("format", "json".to_string()),
            ("utf8", "1".to_string()),
        ];

        let response: SearchResponse = self.get_json("search", &params).await?;
        check_embedded_error(response.error.as_ref())?;
        Ok(response)
    }

    async fn page_details(&self, page_id: u64) -> Result<PageDetailsResponse> {
        let params = [
            ("action", "query".to_string()),
            ("pageids", page_id.to_string()),
            ("prop", "links|categories|info|extracts".to_string()),
            ("pllimit", "max".to_string()),
            ("cllimit", "max".to_string()),
            ("inprop", "url".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("format", "json".to_string()),
            ("utf8", "1".to_string()),
        ];

        let response: PageDetailsResponse = self.get_json("page", &params).await?;
        check_embedded_error(response.error.as_ref())?;
        Ok(response)
    }

    async fn suggest(&self, term: &str, limit: u32) -> Result<Vec<String>> {
        let params = [
            ("action", "opensearch".to_string()),
            ("search", term.to_string()),
            ("limit", limit.to_string()),
            ("format", "json".to_string()),
        ];

        let response: serde_json::Value = self.get_json("suggest", &params).await?;
        Ok(parse_suggestions(&response))
    }
}

/// Titles from an open-search document `[term, [titles], [descriptions], [urls]]`.
///
/// Anything that does not have that shape yields no suggestions.
pub fn parse_suggestions(doc: &serde_json::Value) -> Vec<String> {
    doc.get(1)
        .and_then(|titles| titles.as_array())
        .map(|titles| {
            titles
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
