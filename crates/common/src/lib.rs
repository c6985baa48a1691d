//! Constellation Common Library
//!
//! Shared code for the Constellation services including:
//! - Wikipedia API client abstraction and wire types
//! - Graph building, importance scoring and static layout
//! - The constellation service tying them together
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod constellation;
pub mod errors;
pub mod graph;
pub mod metrics;
pub mod wiki;

// Re-export commonly used types
pub use config::AppConfig;
pub use constellation::ConstellationService;
pub use errors::{AppError, Result};
pub use graph::{Graph, Link, Node};
pub use wiki::{HttpWikiClient, WikiClient};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
