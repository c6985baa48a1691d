//! Constellation handler

use axum::{
    extract::{Path, Query, State},
    Json,
};
use constellation_common::graph::{Canvas, Graph};
use serde::Deserialize;

use crate::error::{ApiError, CONSTELLATION_FAILED};
use crate::AppState;

/// Optional canvas size for the layout, kept raw so bad values fall back
#[derive(Debug, Default, Deserialize)]
pub struct CanvasParams {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl CanvasParams {
    /// Requested canvas, falling back per dimension. Unparsable, non-positive
    /// or non-finite sizes are ignored.
    pub fn resolve(&self, default: Canvas) -> Canvas {
        let valid = |v: &Option<String>| {
            v.as_deref()
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
        };
        Canvas {
            width: valid(&self.width).unwrap_or(default.width),
            height: valid(&self.height).unwrap_or(default.height),
        }
    }
}

/// Search, fetch details, build and lay out the graph for a topic
pub async fn constellation(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(params): Query<CanvasParams>,
) -> Result<Json<Graph>, ApiError> {
    let canvas = params.resolve(state.service.default_canvas());

    state
        .service
        .build(&topic, Some(canvas))
        .await
        .map(Json)
        .map_err(|e| state.fail(CONSTELLATION_FAILED, e))
}
