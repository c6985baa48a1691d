//! Graph assembly from search hits and detail records

use super::{calculate_importance, importance_order, Graph, Link, Node};
use crate::wiki::{PageDetail, SearchHit};
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Detail records keyed by page id
pub type DetailMap = BTreeMap<u64, PageDetail>;

static SPAN_TAG: OnceLock<Regex> = OnceLock::new();

/// Remove the `<span class="searchmatch">` highlight markup from a search snippet
pub fn strip_highlight(snippet: &str) -> String {
    SPAN_TAG
        .get_or_init(|| Regex::new(r"</?span[^>]*>").expect("span pattern is valid"))
        .replace_all(snippet, "")
        .into_owned()
}

fn fallback_url(page_id: u64) -> String {
    format!("https://en.wikipedia.org/?curid={}", page_id)
}

/// Build the constellation graph.
///
/// Hits keep their search order; `rank` for importance is the position in
/// `hits`, including hits skipped for lack of a detail record.
pub fn build_graph(hits: &[SearchHit], details: &DetailMap) -> Graph {
    let nodes = build_nodes(hits, details);

    let raw_links = derive_links(&nodes, details);
    let raw_count = raw_links.len();

    let mut graph = Graph { nodes, links: Vec::with_capacity(raw_count) };
    for link in raw_links {
        if graph.contains_node(&link.source) && graph.contains_node(&link.target) {
            graph.links.push(link);
        }
    }

    let dropped = raw_count - graph.links.len();
    if dropped > 0 {
        tracing::warn!(dropped, "Dropped links referencing unknown nodes");
    }

    if graph.links.is_empty() && graph.nodes.len() > 1 {
        graph.links = fallback_links(&graph.nodes);
        tracing::info!(links = graph.links.len(), "No links found, created fallback star");
    }

    tracing::debug!(nodes = graph.nodes.len(), links = graph.links.len(), "Graph built");
    graph
}

fn build_nodes(hits: &[SearchHit], details: &DetailMap) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(hits.len());

    for (rank, hit) in hits.iter().enumerate() {
        let Some(detail) = details.get(&hit.pageid) else {
            tracing::debug!(page_id = hit.pageid, title = %hit.title, "No detail record, skipping hit");
            continue;
        };

        nodes.push(Node {
            id: hit.pageid.to_string(),
            title: hit.title.clone(),
            snippet: strip_highlight(&hit.snippet),
            url: detail
                .fullurl
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| fallback_url(hit.pageid)),
            extract: detail.extract.clone().unwrap_or_default(),
            importance: calculate_importance(rank, detail.link_count()),
            ..Node::default()
        });
    }

    nodes
}

/// Title matching: every outbound link whose title equals a node's title
/// becomes a link from the detail page to the first such node.
fn derive_links(nodes: &[Node], details: &DetailMap) -> Vec<Link> {
    let mut links = Vec::new();

    for (page_id, detail) in details {
        let source = page_id.to_string();
        for outbound in detail.links() {
            if let Some(target) = nodes.iter().find(|n| n.title == outbound.title) {
                links.push(Link::new(source.clone(), target.id.clone()));
            }
        }
    }

    links
}

/// Star from the most important node to every other node
fn fallback_links(nodes: &[Node]) -> Vec<Link> {
    let order = importance_order(nodes);
    let Some((&center, rest)) = order.split_first() else {
        return Vec::new();
    };

    rest.iter()
        .map(|&i| Link::new(nodes[center].id.clone(), nodes[i].id.clone()))
        .collect()
}
