//! Constellation graph
//!
//! Turns search hits and page detail records into a node-link graph:
//! importance scoring, title-based link matching, the fallback star topology
//! and the static radial layout.

mod builder;
mod importance;
mod layout;

pub use builder::{build_graph, strip_highlight, DetailMap};
pub use importance::calculate_importance;
pub use layout::{assign_layout, node_radius, Canvas, RadialLayout};

use serde::{Deserialize, Serialize};

/// Strength of every link, genuine or fallback
pub const DEFAULT_LINK_VALUE: u32 = 1;

/// A page in the constellation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Page id as a decimal string
    pub id: String,

    pub title: String,

    /// Search snippet without highlight markup
    pub snippet: String,

    /// Canonical page URL
    pub url: String,

    /// Plain-text intro, empty when unavailable
    pub extract: String,

    pub importance: f64,

    pub x: f64,
    pub y: f64,

    /// Visual size derived from importance
    pub radius: f64,
}

/// Directed edge between two nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: u32,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: DEFAULT_LINK_VALUE,
        }
    }
}

/// Node-link document returned to clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Index of the node with the highest importance; ties keep the earlier node
    pub fn most_important(&self) -> Option<usize> {
        importance_order(&self.nodes).first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Node indices ordered by importance, highest first, stable on ties
pub(crate) fn importance_order(nodes: &[Node]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[b].importance.total_cmp(&nodes[a].importance));
    order
}
