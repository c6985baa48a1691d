//! Wire types for the MediaWiki Action API
//!
//! Only the fields the service consumes are typed. Everything is optional or
//! defaulted so that partial documents still deserialize, and every struct
//! keeps the fields it does not model in `extra` so that passthrough
//! responses reach the caller unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Error object MediaWiki embeds in a 200 response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WikiApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `action=query&list=search` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batchcomplete: Option<Value>,

    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchQuery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WikiApiError>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchinfo: Option<SearchInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<SearchHit>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchInfo {
    #[serde(default)]
    pub totalhits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One search result record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    #[serde(default)]
    pub ns: i64,
    #[serde(default)]
    pub title: String,
    pub pageid: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub wordcount: u64,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub timestamp: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchHit {
    pub fn new(pageid: u64, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            pageid,
            title: title.into(),
            snippet: snippet.into(),
            ..Self::default()
        }
    }
}

impl SearchResponse {
    /// Hits of a well-formed response, `None` when `query.search` is absent
    pub fn hits(&self) -> Option<&[SearchHit]> {
        self.query.as_ref()?.search.as_deref()
    }

    /// True when the response carries no usable hits
    pub fn is_empty(&self) -> bool {
        self.hits().map_or(true, |hits| hits.is_empty())
    }

    /// Consume the response, keeping only the hits
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.query.and_then(|q| q.search).unwrap_or_default()
    }

    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            query: Some(SearchQuery {
                searchinfo: Some(SearchInfo {
                    totalhits: hits.len() as u64,
                    ..SearchInfo::default()
                }),
                search: Some(hits),
                ..SearchQuery::default()
            }),
            ..Self::default()
        }
    }
}

/// `action=query&pageids=…&prop=links|categories|info|extracts` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batchcomplete: Option<Value>,

    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<PagesQuery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WikiApiError>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<BTreeMap<String, PageDetail>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to another page (outbound link or category)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageRef {
    #[serde(default)]
    pub ns: i64,
    #[serde(default)]
    pub title: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageRef {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Detail record for a single page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub ns: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<PageRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<PageRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonicalurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageDetail {
    pub fn links(&self) -> &[PageRef] {
        self.links.as_deref().unwrap_or(&[])
    }

    pub fn link_count(&self) -> usize {
        self.links().len()
    }

    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }
}

impl PageDetailsResponse {
    /// Pages of a well-formed response, `None` when `query.pages` is absent
    pub fn pages(&self) -> Option<&BTreeMap<String, PageDetail>> {
        self.query.as_ref()?.pages.as_ref()
    }

    /// First page entry keyed by its numeric id.
    ///
    /// Entries whose key is not a page id (e.g. `"-1"` for missing pages) are ignored.
    pub fn into_first_page(self) -> Option<(u64, PageDetail)> {
        self.query?
            .pages?
            .into_iter()
            .find_map(|(key, page)| key.parse::<u64>().ok().map(|id| (id, page)))
    }

    pub fn from_page(page_id: u64, page: PageDetail) -> Self {
        let mut pages = BTreeMap::new();
        pages.insert(page_id.to_string(), page);
        Self {
            query: Some(PagesQuery {
                pages: Some(pages),
                ..PagesQuery::default()
            }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let raw = r#"{
            "batchcomplete": "",
            "continue": {"sroffset": 10, "continue": "-||"},
            "query": {
                "searchinfo": {"totalhits": 4821},
                "search": [
                    {"ns": 0, "title": "Nebula", "pageid": 21296, "size": 51234,
                     "wordcount": 6012, "snippet": "A <span class=\"searchmatch\">nebula</span> is",
                     "timestamp": "2024-01-01T00:00:00Z"}
                ]
            }
        }"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        let hits = resp.hits().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pageid, 21296);
        assert_eq!(hits[0].title, "Nebula");
        assert!(!resp.is_empty());
    }

    #[test]
    fn test_search_response_without_query() {
        let resp: SearchResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(resp.hits().is_none());
        assert!(resp.is_empty());
        assert!(resp.into_hits().is_empty());
    }

    #[test]
    fn test_upstream_error_document() {
        let raw = r#"{"error": {"code": "nosrsearch", "info": "The \"srsearch\" parameter must be set."}}"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.error.unwrap().code, "nosrsearch");
    }

    #[test]
    fn test_parse_page_details() {
        let raw = r#"{
            "batchcomplete": "",
            "query": {"pages": {"21296": {
                "pageid": 21296, "ns": 0, "title": "Nebula",
                "links": [{"ns": 0, "title": "Star"}, {"ns": 0, "title": "Supernova"}],
                "categories": [{"ns": 14, "title": "Category:Nebulae"}],
                "extract": "A nebula is a distinct luminescent part of interstellar medium.",
                "fullurl": "https://en.wikipedia.org/wiki/Nebula"
            }}}
        }"#;
        let resp: PageDetailsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.pages().unwrap().len(), 1);

        let (id, page) = resp.into_first_page().unwrap();
        assert_eq!(id, 21296);
        assert_eq!(page.link_count(), 2);
        assert_eq!(page.links()[1].title, "Supernova");
        assert_eq!(page.fullurl.as_deref(), Some("https://en.wikipedia.org/wiki/Nebula"));
    }

    #[test]
    fn test_missing_page_is_skipped() {
        let raw = r#"{"query": {"pages": {"-1": {"ns": 0, "title": "Nope", "missing": ""}}}}"#;
        let resp: PageDetailsResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.pages().is_some());
        assert!(resp.into_first_page().is_none());
    }

    #[test]
    fn test_search_response_keeps_unmodelled_fields() {
        let raw = serde_json::json!({
            "batchcomplete": "",
            "warnings": {"main": {"*": "Unrecognized parameter: foo."}},
            "query": {
                "searchinfo": {
                    "totalhits": 12,
                    "suggestion": "nebula",
                    "suggestionsnippet": "nebula"
                },
                "search": [{
                    "ns": 0, "title": "Nebula", "pageid": 21296, "size": 51234,
                    "wordcount": 6012, "snippet": "A nebula is",
                    "titlesnippet": "<span class=\"searchmatch\">Nebula</span>",
                    "timestamp": "2024-01-01T00:00:00Z"
                }]
            }
        });

        let resp: SearchResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(resp.hits().unwrap()[0].pageid, 21296);
        assert_eq!(serde_json::to_value(&resp).unwrap(), raw);
    }

    #[test]
    fn test_page_details_keep_unmodelled_fields() {
        let raw = serde_json::json!({
            "batchcomplete": "",
            "query": {"pages": {"21296": {
                "pageid": 21296, "ns": 0, "title": "Nebula",
                "contentmodel": "wikitext",
                "pagelanguage": "en",
                "touched": "2024-05-01T12:00:00Z",
                "length": 51234,
                "links": [{"ns": 0, "title": "Star"}],
                "extract": "A nebula is a cloud.",
                "fullurl": "https://en.wikipedia.org/wiki/Nebula",
                "editurl": "https://en.wikipedia.org/w/index.php?title=Nebula&action=edit",
                "canonicalurl": "https://en.wikipedia.org/wiki/Nebula"
            }}}
        });

        let resp: PageDetailsResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(resp.pages().unwrap()["21296"].link_count(), 1);
        assert_eq!(serde_json::to_value(&resp).unwrap(), raw);
    }

    #[test]
    fn test_missing_page_by_id() {
        let raw = r#"{"query": {"pages": {"404": {"pageid": 404, "ns": 0, "missing": ""}}}}"#;
        let resp: PageDetailsResponse = serde_json::from_str(raw).unwrap();
        let (id, page) = resp.into_first_page().unwrap();
        assert_eq!(id, 404);
        assert!(page.is_missing());
    }

    #[test]
    fn test_page_without_links() {
        let page = PageDetail::default();
        assert_eq!(page.link_count(), 0);
        assert!(page.links().is_empty());
        assert!(!page.is_missing());
    }
}
