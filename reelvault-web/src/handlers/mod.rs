//! HTTP request handlers organized by functionality

pub mod edit;
pub mod files;
pub mod status;
pub mod streaming;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

// Re-export handler functions
pub use edit::{EditVideoRequest, edit_video};
pub use files::{FilesQuery, delete_file, list_files};
pub use status::api_status;
pub use streaming::stream_video;

/// JSON error response `{"error": <message>}`.
///
/// Every failure a handler reports goes through here (or the details
/// variant below) so clients always get a JSON body, never a bare
/// status line.
pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// JSON error response `{"error": <message>, "details": <details>}`.
///
/// Used where a downstream message is intentionally passed through to
/// the client, e.g. the media engine's own failure text.
pub(crate) fn api_error_with_details(
    status: StatusCode,
    message: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (
        status,
        Json(json!({ "error": message.into(), "details": details.into() })),
    )
        .into_response()
}
