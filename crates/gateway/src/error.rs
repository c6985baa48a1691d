//! Request-boundary error rendering

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use constellation_common::errors::{AppError, ErrorResponse};

/// Summary for failures of `/api/search/{topic}`
pub const SEARCH_FAILED: &str = "Failed to fetch data from Wikipedia";

/// Summary for failures of `/api/page/{page_id}`
pub const PAGE_FAILED: &str = "Failed to fetch page details from Wikipedia";

/// Summary for failures of `/api/constellation/{topic}`
pub const CONSTELLATION_FAILED: &str = "Failed to build constellation data";

/// An [`AppError`] caught at a handler, with what the handler was doing
#[derive(Debug)]
pub struct ApiError {
    summary: &'static str,
    source: AppError,
    expose_details: bool,
}

impl ApiError {
    pub fn new(summary: &'static str, source: AppError, expose_details: bool) -> Self {
        Self {
            summary,
            source,
            expose_details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status_code();
        let code = self.source.code();

        // Log based on severity
        if self.source.is_server_error() {
            tracing::error!(
                error = %self.source,
                code = code.as_code(),
                status = status.as_u16(),
                summary = self.summary,
                "Server error"
            );
        } else {
            tracing::info!(
                error = %self.source,
                code = code.as_code(),
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse::from_error(self.summary, &self.source, self.expose_details);
        (status, Json(body)).into_response()
    }
}
