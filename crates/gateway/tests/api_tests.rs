//! Router-level tests against a scripted Wikipedia client

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use constellation_common::{
    config::{AppConfig, RuntimeEnv},
    errors::{AppError, Result},
    wiki::{PageDetail, PageDetailsResponse, PageRef, SearchHit, SearchResponse, WikiClient},
};
use constellation_gateway::{create_router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeWiki {
    searches: HashMap<String, Vec<SearchHit>>,
    pages: HashMap<u64, PageDetail>,
    suggestions: Vec<String>,
    search_fails: bool,
    malformed: bool,
    queried: Mutex<Vec<String>>,
}

#[async_trait]
impl WikiClient for FakeWiki {
    async fn search(&self, term: &str, _limit: u32) -> Result<SearchResponse> {
        self.queried.lock().unwrap().push(term.to_string());
        if self.search_fails {
            return Err(AppError::Upstream {
                code: "ratelimited".into(),
                info: "You've exceeded your rate limit".into(),
            });
        }
        if self.malformed {
            return Ok(SearchResponse::default());
        }
        Ok(SearchResponse::from_hits(
            self.searches.get(term).cloned().unwrap_or_default(),
        ))
    }

    async fn page_details(&self, page_id: u64) -> Result<PageDetailsResponse> {
        if self.malformed {
            return Ok(PageDetailsResponse::default());
        }
        match self.pages.get(&page_id) {
            Some(page) => Ok(PageDetailsResponse::from_page(page_id, page.clone())),
            None => Err(AppError::Upstream {
                code: "nosuchpageid".into(),
                info: format!("There is no page with ID {}.", page_id),
            }),
        }
    }

    async fn suggest(&self, _term: &str, _limit: u32) -> Result<Vec<String>> {
        Ok(self.suggestions.clone())
    }
}

fn page(title: &str, links: &[&str]) -> PageDetail {
    PageDetail {
        title: title.to_string(),
        links: Some(links.iter().map(|t| PageRef::new(*t)).collect()),
        fullurl: Some(format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_"))),
        extract: Some(format!("{} is a page.", title)),
        ..PageDetail::default()
    }
}

fn solar_wiki() -> FakeWiki {
    let mut wiki = FakeWiki::default();
    wiki.searches.insert(
        "solar system".into(),
        vec![
            SearchHit::new(10, "Solar System", "The <span class=\"searchmatch\">Solar System</span> is"),
            SearchHit::new(20, "Sun", "The star at the center"),
            SearchHit::new(30, "Jupiter", "The largest planet"),
        ],
    );
    wiki.pages.insert(10, page("Solar System", &["Sun", "Jupiter", "Milky Way"]));
    wiki.pages.insert(20, page("Sun", &["Solar System"]));
    wiki.pages.insert(30, page("Jupiter", &[]));
    wiki
}

fn app_with(wiki: FakeWiki, environment: RuntimeEnv) -> (Router, Arc<FakeWiki>) {
    let mut config = AppConfig::default();
    config.wikipedia.detail_delay_ms = 0;
    config.server.environment = environment;

    let wiki = Arc::new(wiki);
    let state = AppState::new(config, wiki.clone(), None);
    (create_router(state), wiki)
}

fn app(wiki: FakeWiki) -> Router {
    app_with(wiki, RuntimeEnv::Development).0
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(FakeWiki::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_constellation_graph() {
    let (status, body) = get(app(solar_wiki()), "/api/constellation/solar%20system").await;
    assert_eq!(status, StatusCode::OK);

    let nodes = body["nodes"].as_array().unwrap();
    let links = body["links"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(links.len(), 3);

    let ids: Vec<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    for link in links {
        assert!(ids.contains(&link["source"].as_str().unwrap()));
        assert!(ids.contains(&link["target"].as_str().unwrap()));
        assert_eq!(link["value"], 1);
    }

    let top = &nodes[0];
    assert_eq!(top["snippet"], "The Solar System is");
    assert_eq!(top["url"], "https://en.wikipedia.org/wiki/Solar_System");
    assert_eq!(top["importance"], 101.5);
    assert_eq!(top["x"], 400.0);
    assert_eq!(top["y"], 300.0);
}

#[tokio::test]
async fn test_constellation_custom_canvas() {
    let (status, body) = get(
        app(solar_wiki()),
        "/api/constellation/solar%20system?width=1000&height=1000",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"][0]["x"], 500.0);
    assert_eq!(body["nodes"][0]["y"], 500.0);
}

#[tokio::test]
async fn test_constellation_bad_canvas_uses_default() {
    let (status, body) = get(
        app(solar_wiki()),
        "/api/constellation/solar%20system?width=wide&height=-1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"][0]["x"], 400.0);
    assert_eq!(body["nodes"][0]["y"], 300.0);
}

#[tokio::test]
async fn test_constellation_fallback_star() {
    let mut wiki = FakeWiki::default();
    wiki.searches.insert(
        "moons".into(),
        vec![
            SearchHit::new(1, "Moon", ""),
            SearchHit::new(2, "Europa", ""),
            SearchHit::new(3, "Titan", ""),
            SearchHit::new(4, "Io", ""),
        ],
    );
    for (id, title) in [(1, "Moon"), (2, "Europa"), (3, "Titan"), (4, "Io")] {
        wiki.pages.insert(id, page(title, &["Planet"]));
    }

    let (status, body) = get(app(wiki), "/api/constellation/moons").await;
    assert_eq!(status, StatusCode::OK);

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 3);
    assert!(links.iter().all(|l| l["source"] == "1"));
}

#[tokio::test]
async fn test_constellation_wildcard_retry() {
    let mut wiki = FakeWiki::default();
    wiki.searches.insert("exoplan*".into(), vec![SearchHit::new(5, "Exoplanet", "")]);
    wiki.pages.insert(5, page("Exoplanet", &[]));

    let (router, wiki) = app_with(wiki, RuntimeEnv::Development);
    let (status, body) = get(router, "/api/constellation/exoplan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"][0]["title"], "Exoplanet");
    assert_eq!(body["links"].as_array().unwrap().len(), 0);
    assert_eq!(*wiki.queried.lock().unwrap(), vec!["exoplan", "exoplan*"]);
}

#[tokio::test]
async fn test_constellation_suggestions() {
    let wiki = FakeWiki {
        suggestions: vec!["Andromeda Galaxy".into(), "Andromeda (constellation)".into()],
        ..FakeWiki::default()
    };

    let (status, body) = get(app(wiki), "/api/constellation/andromedda").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No results found for this topic");
    assert_eq!(body["suggestions"][0], "Andromeda Galaxy");
}

#[tokio::test]
async fn test_constellation_no_suggestions() {
    let (status, body) = get(app(FakeWiki::default()), "/api/constellation/zzzzqx").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No results found for this topic" }));
}

#[tokio::test]
async fn test_constellation_short_topic() {
    let (status, body) = get(app(FakeWiki::default()), "/api/constellation/qz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Search term is too short");
    assert_eq!(body["message"], "Please try a longer, more specific search term");
}

#[tokio::test]
async fn test_constellation_upstream_failure_dev_and_prod() {
    let failing = || FakeWiki { search_fails: true, ..FakeWiki::default() };

    let (router, _) = app_with(failing(), RuntimeEnv::Development);
    let (status, body) = get(router, "/api/constellation/comets").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to build constellation data");
    assert!(body["message"].as_str().unwrap().contains("ratelimited"));
    assert!(body["stack"].is_string());

    let (router, _) = app_with(failing(), RuntimeEnv::Production);
    let (status, body) = get(router, "/api/constellation/comets").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("stack").is_none());
}

#[tokio::test]
async fn test_search_passthrough() {
    let (status, body) = get(app(solar_wiki()), "/api/search/solar%20system").await;
    assert_eq!(status, StatusCode::OK);
    let hits = body["query"]["search"].as_array().unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[1]["pageid"], 20);
}

#[tokio::test]
async fn test_search_invalid_upstream() {
    let wiki = FakeWiki { malformed: true, ..FakeWiki::default() };
    let (status, body) = get(app(wiki), "/api/search/anything").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Invalid response from Wikipedia API" }));
}

#[tokio::test]
async fn test_search_upstream_error() {
    let wiki = FakeWiki { search_fails: true, ..FakeWiki::default() };
    let (status, body) = get(app(wiki), "/api/search/anything").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch data from Wikipedia");
}

#[tokio::test]
async fn test_search_passthrough_keeps_upstream_fields() {
    let mut hit = SearchHit::new(42, "Pulsar", "A rotating neutron star");
    hit.extra.insert("titlesnippet".into(), json!("<span class=\"searchmatch\">Pulsar</span>"));
    let mut wiki = FakeWiki::default();
    wiki.searches.insert("pulsar".into(), vec![hit]);

    let (status, body) = get(app(wiki), "/api/search/pulsar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["query"]["search"][0]["titlesnippet"],
        "<span class=\"searchmatch\">Pulsar</span>"
    );
}

#[tokio::test]
async fn test_page_details() {
    let (status, body) = get(app(solar_wiki()), "/api/page/20").await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["query"]["pages"]["20"];
    assert_eq!(page["title"], "Sun");
    assert_eq!(page["links"][0]["title"], "Solar System");
}

#[tokio::test]
async fn test_page_errors() {
    let (status, body) = get(app(solar_wiki()), "/api/page/999").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch page details from Wikipedia");

    let (status, _) = get(app(solar_wiki()), "/api/page/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let response = app(FakeWiki::default())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let response = app(FakeWiki::default())
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
