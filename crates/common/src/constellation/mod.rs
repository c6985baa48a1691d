//! Constellation service
//!
//! Orchestrates one request end to end: topic search with the wildcard and
//! suggestion fallbacks, sequential detail collection, graph assembly and the
//! static layout. Also serves the plain search and page lookups.

use crate::config::{AppConfig, WikipediaConfig};
use crate::errors::{AppError, Result};
use crate::graph::{assign_layout, build_graph, Canvas, DetailMap, Graph, RadialLayout};
use crate::metrics;
use crate::wiki::{PageDetailsResponse, SearchHit, SearchResponse, WikiClient};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;
use validator::Validate;

/// Longest topic accepted, in characters
pub const MAX_TOPIC_LEN: usize = 300;
const MAX_TOPIC_LEN_U64: u64 = MAX_TOPIC_LEN as u64;

#[derive(Debug, Validate)]
struct TopicInput {
    #[validate(length(min = 1, max = MAX_TOPIC_LEN_U64))]
    topic: String,
}

/// Trim and validate a user supplied topic
pub fn validate_topic(raw: &str) -> Result<String> {
    let input = TopicInput { topic: raw.trim().to_string() };
    input.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
    })?;
    Ok(input.topic)
}

/// Search, detail and graph service shared by all handlers
#[derive(Clone)]
pub struct ConstellationService {
    client: Arc<dyn WikiClient>,
    wiki: WikipediaConfig,
    layout: RadialLayout,
    default_canvas: Canvas,
}

impl ConstellationService {
    pub fn new(client: Arc<dyn WikiClient>, config: &AppConfig) -> Self {
        Self {
            client,
            wiki: config.wikipedia.clone(),
            layout: RadialLayout::from(&config.layout),
            default_canvas: Canvas {
                width: config.layout.width,
                height: config.layout.height,
            },
        }
    }

    /// Canvas used when a request does not size its own
    pub fn default_canvas(&self) -> Canvas {
        self.default_canvas
    }

    fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.wiki.detail_delay_ms)
    }

    /// Plain topic search. The response must carry `query.search`.
    #[instrument(skip(self))]
    pub async fn search(&self, topic: &str) -> Result<SearchResponse> {
        let topic = validate_topic(topic)?;
        tracing::info!(%topic, "Searching for topic");

        let response = self.client.search(&topic, self.wiki.search_limit).await?;
        let Some(hits) = response.hits() else {
            tracing::error!(%topic, "Invalid or empty response from Wikipedia search API");
            return Err(AppError::InvalidUpstream { context: "search".to_string() });
        };

        tracing::info!(%topic, results = hits.len(), "Search completed");
        Ok(response)
    }

    /// Page details lookup. The response must carry `query.pages`.
    #[instrument(skip(self))]
    pub async fn page(&self, page_id: u64) -> Result<PageDetailsResponse> {
        tracing::info!(page_id, "Fetching page details");

        let response = self.client.page_details(page_id).await?;
        if response.pages().is_none() {
            tracing::error!(page_id, "Invalid or empty response from Wikipedia page API");
            return Err(AppError::InvalidUpstream { context: "page".to_string() });
        }

        Ok(response)
    }

    /// Build the laid-out constellation for `topic`
    #[instrument(skip(self))]
    pub async fn build(&self, topic: &str, canvas: Option<Canvas>) -> Result<Graph> {
        let start = Instant::now();
        let result = self.build_graph_for(topic, canvas.unwrap_or(self.default_canvas)).await;

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(graph) => {
                metrics::record_build(elapsed, "success", graph.nodes.len(), graph.links.len());
                tracing::info!(
                    %topic,
                    nodes = graph.nodes.len(),
                    links = graph.links.len(),
                    latency_ms = (elapsed * 1000.0) as u64,
                    "Constellation built"
                );
            }
            Err(e) if e.is_client_error() => metrics::record_build(elapsed, "rejected", 0, 0),
            Err(_) => metrics::record_build(elapsed, "error", 0, 0),
        }

        result
    }

    async fn build_graph_for(&self, topic: &str, canvas: Canvas) -> Result<Graph> {
        let topic = validate_topic(topic)?;
        tracing::info!(%topic, "Building constellation data");

        let hits = self.resolve_hits(&topic).await?;
        tracing::info!(%topic, results = hits.len(), "Found search results");

        let details = self.collect_details(&hits).await;
        let mut graph = build_graph(&hits, &details);
        self.lay_out(&mut graph, canvas);

        Ok(graph)
    }

    /// Direct search, then wildcard retry, then suggestions
    async fn resolve_hits(&self, topic: &str) -> Result<Vec<SearchHit>> {
        let limit = self.wiki.constellation_limit;

        let direct = self.client.search(topic, limit).await?;
        if !direct.is_empty() {
            return Ok(direct.into_hits());
        }

        tracing::info!(%topic, "No results found, trying alternative search");

        // Length in UTF-16 code units, as browsers count it
        if topic.encode_utf16().count() < self.wiki.min_topic_len {
            return Err(AppError::TopicTooShort { min_len: self.wiki.min_topic_len });
        }

        let wildcard = self.client.search(&format!("{}*", topic), limit).await?;
        if !wildcard.is_empty() {
            let hits = wildcard.into_hits();
            tracing::info!(%topic, results = hits.len(), "Found results using wildcard search");
            return Ok(hits);
        }

        tracing::info!(%topic, "Trying opensearch for suggestions");
        let suggestions = self.client.suggest(topic, self.wiki.suggestion_limit).await?;
        Err(AppError::NoResults { suggestions })
    }

    /// Fetch details one page at a time, pausing between requests.
    /// Failed pages are logged and left out.
    async fn collect_details(&self, hits: &[SearchHit]) -> DetailMap {
        let mut details = DetailMap::new();
        let delay = self.detail_delay();

        for (i, hit) in hits.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.client.page_details(hit.pageid).await {
                Ok(response) => match response.into_first_page() {
                    Some((page_id, page)) if page.is_missing() => {
                        tracing::debug!(page_id, "Page is missing upstream, skipping");
                    }
                    Some((page_id, page)) => {
                        details.insert(page_id, page);
                    }
                    None => {
                        tracing::warn!(page_id = hit.pageid, "Page details response had no pages");
                    }
                },
                Err(e) => {
                    tracing::error!(page_id = hit.pageid, error = %e, "Error fetching page");
                }
            }
        }

        details
    }

    fn lay_out(&self, graph: &mut Graph, canvas: Canvas) {
        let mut rng = rand::thread_rng();
        assign_layout(&mut graph.nodes, canvas, &self.layout, &mut rng);
    }
}
