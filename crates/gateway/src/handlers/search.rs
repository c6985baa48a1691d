//! Topic search handler

use axum::{
    extract::{Path, State},
    Json,
};
use constellation_common::wiki::SearchResponse;

use crate::error::{ApiError, SEARCH_FAILED};
use crate::AppState;

/// Search Wikipedia for a topic and return the upstream search document
pub async fn search(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    state
        .service
        .search(&topic)
        .await
        .map(Json)
        .map_err(|e| state.fail(SEARCH_FAILED, e))
}
