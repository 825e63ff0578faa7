//! Range-based video streaming handler.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use reelvault_core::library::LibraryError;
use reelvault_core::streaming::FileStreamer;
use serde::Deserialize;
use tracing::{debug, error};

use super::api_error;
use crate::server::AppState;

/// Query parameters for the `/api/video` endpoint.
#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    /// Library-relative path of the file to stream.
    pub path: Option<String>,
}

/// `GET /api/video?path=<rel>` - stream a file, honoring `Range` headers.
///
/// Responds 206 with a `Content-Range` window when the client sends a
/// satisfiable range, 200 with the full content otherwise. The body is
/// produced incrementally; a slow client throttles the disk reads.
pub async fn stream_video(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(path) = query.path else {
        return api_error(StatusCode::BAD_REQUEST, "Missing path parameter");
    };

    let file = match state.library.resolve_file(&path).await {
        Ok(file) => file,
        Err(LibraryError::AccessDenied) => {
            return api_error(StatusCode::FORBIDDEN, "Access denied");
        }
        Err(LibraryError::NotFound { .. }) => {
            return api_error(StatusCode::NOT_FOUND, "Video not found");
        }
        Err(e) => {
            error!("Error resolving video {path}: {e}");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to stream video");
        }
    };

    debug!(
        "Streaming {path} (range: {:?})",
        headers.get(axum::http::header::RANGE)
    );

    match FileStreamer::open(file).stream_response(&headers).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error streaming video {path}: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to stream video")
        }
    }
}
