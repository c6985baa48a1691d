//! Page details handler

use axum::{
    extract::{Path, State},
    Json,
};
use constellation_common::wiki::PageDetailsResponse;

use crate::error::{ApiError, PAGE_FAILED};
use crate::AppState;

/// Links, categories, canonical URL and intro extract of one page.
///
/// A non-numeric id is rejected by the extractor with 400.
pub async fn page_details(
    State(state): State<AppState>,
    Path(page_id): Path<u64>,
) -> Result<Json<PageDetailsResponse>, ApiError> {
    state
        .service
        .page(page_id)
        .await
        .map(Json)
        .map_err(|e| state.fail(PAGE_FAILED, e))
}
