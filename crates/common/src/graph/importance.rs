//! Importance scoring

const BASE_IMPORTANCE: f64 = 100.0;
const RANK_FACTOR: f64 = 5.0;
const LINKS_FACTOR: f64 = 0.5;
const MIN_IMPORTANCE: f64 = 10.0;

/// Importance of a page from its zero-based search rank and outbound link count.
///
/// `max(10, 100 - 5 * rank + 0.5 * link_count)`
pub fn calculate_importance(search_rank: usize, links_count: usize) -> f64 {
    let raw = BASE_IMPORTANCE - search_rank as f64 * RANK_FACTOR + links_count as f64 * LINKS_FACTOR;
    raw.max(MIN_IMPORTANCE)
}
