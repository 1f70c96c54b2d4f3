//! HTTP request handlers for the bjerknes API.
//!
//! Every handler tags its log lines with a fresh `request_id` and answers
//! failures with `{"error", "request_id"}`.

pub mod chart;
pub mod colortables;
pub mod heartbeat;
pub mod metadata;

pub use chart::chart_handler;
pub use colortables::{colortable_handler, colortables_handler};
pub use heartbeat::heartbeat_handler;
pub use metadata::metadata_handler;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::error::BjerknesError;
use crate::logging::log_request_error;
use crate::render::OutputFormat;

/// Status code for an error: 404 for missing data, 400 for bad input, 500
/// otherwise.
pub fn status_for(error: &BjerknesError) -> StatusCode {
    match error {
        BjerknesError::DataNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed request and build its JSON response.
pub(crate) fn error_response(
    error: &BjerknesError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) -> Response {
    log_request_error(error, endpoint, request_id, params);
    (
        status_for(error),
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

pub(crate) fn image_response(bytes: Vec<u8>, format: OutputFormat) -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(format.content_type()),
        )],
        Bytes::from(bytes),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        let missing = BjerknesError::DataNotFound {
            message: "x".into(),
        };
        assert_eq!(status_for(&missing), StatusCode::NOT_FOUND);
        let table = BjerknesError::UnknownColorTable { name: "x".into() };
        assert_eq!(status_for(&table), StatusCode::BAD_REQUEST);
        let render = BjerknesError::Render {
            message: "x".into(),
        };
        assert_eq!(status_for(&render), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
