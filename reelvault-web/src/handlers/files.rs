//! Directory listing and deletion handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use reelvault_core::library::LibraryError;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::api_error;
use crate::server::AppState;

/// Query parameters for the `/api/files` endpoints.
#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    /// Library-relative path; defaults to the root for listings.
    pub path: Option<String>,
}

/// `GET /api/files?path=<rel>` - list the direct children of a directory.
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> Response {
    let path = query.path.unwrap_or_else(|| "/".to_string());

    match state.library.list_directory(&path).await {
        Ok(entries) => Json(entries).into_response(),
        Err(LibraryError::AccessDenied) => api_error(StatusCode::FORBIDDEN, "Access denied"),
        Err(LibraryError::NotFound { .. }) => {
            api_error(StatusCode::NOT_FOUND, "Directory not found")
        }
        Err(e) => {
            // Cause stays in the server log; the client gets an opaque error.
            error!("Error reading directory {path}: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read directory")
        }
    }
}

/// `DELETE /api/files?path=<rel>` - delete a file or directory tree.
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> Response {
    let Some(path) = query.path else {
        return api_error(StatusCode::BAD_REQUEST, "Missing path parameter");
    };

    match state.library.delete_entry(&path).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(LibraryError::AccessDenied) => api_error(StatusCode::FORBIDDEN, "Access denied"),
        Err(LibraryError::NotFound { .. }) => api_error(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            error!("Error deleting {path}: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete entry")
        }
    }
}
