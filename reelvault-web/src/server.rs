//! Reelvault JSON API server.
//!
//! Wires the library and edit orchestrator into an axum router and runs
//! it on the configured bind address.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use reelvault_core::config::ReelvaultConfig;
use reelvault_core::editing::{EditOrchestrator, FfmpegMediaEngine, MediaEngine};
use reelvault_core::library::VideoLibrary;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::handlers::{api_status, delete_file, edit_video, list_files, stream_video};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Sandboxed library the file and streaming endpoints serve from.
    pub library: Arc<VideoLibrary>,
    /// Edit pipeline the edit endpoint submits to.
    pub orchestrator: Arc<EditOrchestrator>,
    /// Startup instant, for the status endpoint's uptime.
    pub server_started_at: std::time::Instant,
}

impl AppState {
    /// Creates state over an already-constructed library and orchestrator.
    pub fn new(library: Arc<VideoLibrary>, orchestrator: Arc<EditOrchestrator>) -> Self {
        Self {
            library,
            orchestrator,
            server_started_at: std::time::Instant::now(),
        }
    }
}

/// Builds the API router.
///
/// Exposed separately from [`run_server`] so tests can drive the exact
/// production routing without binding a socket.
pub fn build_router(state: AppState, assets_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        // JSON API endpoints
        .route("/api/files", get(list_files).delete(delete_file))
        .route("/api/video", get(stream_video))
        .route("/api/edit-video", post(edit_video))
        .route("/api/status", get(api_status));

    // Optional bundled frontend; the UI is an external consumer of the API.
    if let Some(dir) = assets_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}

/// Runs the server until the process exits.
///
/// # Errors
///
/// Returns an error if the library root cannot be opened or the listener
/// cannot bind.
pub async fn run_server(config: ReelvaultConfig) -> Result<(), Box<dyn std::error::Error>> {
    let library = Arc::new(VideoLibrary::new(&config.library)?);

    let engine: Arc<dyn MediaEngine> =
        Arc::new(FfmpegMediaEngine::new(config.editing.ffmpeg_binary.clone()));
    if !engine.is_available() {
        tracing::warn!(
            "ffmpeg not available at {}; edit requests will fail",
            config.editing.ffmpeg_binary.display()
        );
    }

    let orchestrator = Arc::new(EditOrchestrator::new(
        Arc::clone(&library),
        engine,
        &config.editing,
    ));

    let state = AppState::new(library, orchestrator);
    let app = build_router(state, config.server.assets_dir.as_deref());

    let bind_address = config.server.bind_address();
    println!("Reelvault media server running on http://{bind_address}");
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
