//! Edit submission handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use reelvault_core::ReelvaultError;
use reelvault_core::editing::{EditingError, Segment};
use reelvault_core::library::LibraryError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::{api_error, api_error_with_details};
use crate::server::AppState;

/// Body of `POST /api/edit-video`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditVideoRequest {
    /// Library-relative path of the source video.
    pub video_path: String,
    /// Ordered segments to retain; order defines concatenation order.
    pub segments: Vec<Segment>,
}

/// `POST /api/edit-video` - trim the named source to the requested
/// segments and concatenate them into a new file under `edited/`.
///
/// Blocks until the media engine completes. On success the response
/// carries the generated output file name, ready for a follow-up
/// listing or streaming request.
pub async fn edit_video(
    State(state): State<AppState>,
    payload: Result<Json<EditVideoRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {rejection}"),
            );
        }
    };

    match state
        .orchestrator
        .submit_edit(&request.video_path, request.segments)
        .await
    {
        Ok(outcome) => Json(json!({
            "success": true,
            "output": outcome.output_file_name,
        }))
        .into_response(),
        Err(ReelvaultError::Library(LibraryError::AccessDenied)) => {
            api_error(StatusCode::FORBIDDEN, "Access denied")
        }
        Err(ReelvaultError::Library(LibraryError::NotFound { .. })) => {
            api_error(StatusCode::NOT_FOUND, "Video not found")
        }
        Err(ReelvaultError::Editing(EditingError::InvalidSegments { reason })) => {
            api_error(StatusCode::BAD_REQUEST, format!("Invalid segments: {reason}"))
        }
        Err(ReelvaultError::Editing(EditingError::EngineFailed { reason })) => {
            error!("Error processing video {}: {reason}", request.video_path);
            // Engine message passes through verbatim as `details`.
            api_error_with_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process video",
                reason,
            )
        }
        Err(e) => {
            error!("Error processing video request {}: {e}", request.video_path);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process video request",
            )
        }
    }
}
