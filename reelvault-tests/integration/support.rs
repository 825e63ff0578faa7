//! Shared fixtures for driving the API in-process.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use reelvault_core::config::{EditingConfig, LibraryConfig};
use reelvault_core::editing::{EditOrchestrator, MediaEngine, SimulationMediaEngine};
use reelvault_core::library::VideoLibrary;
use reelvault_web::{AppState, build_router};
use tempfile::TempDir;
use tower::ServiceExt;

/// One API instance over a scratch library root.
pub struct TestApp {
    pub router: Router,
    pub root: TempDir,
    pub engine: Arc<SimulationMediaEngine>,
}

impl TestApp {
    /// App whose media engine succeeds on every plan.
    pub fn new() -> Self {
        Self::with_engine(SimulationMediaEngine::new())
    }

    /// App whose media engine fails every plan with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self::with_engine(SimulationMediaEngine::failing(reason))
    }

    fn with_engine(engine: SimulationMediaEngine) -> Self {
        let root = TempDir::new().unwrap();
        let engine = Arc::new(engine);

        let library = Arc::new(
            VideoLibrary::new(&LibraryConfig {
                root_dir: root.path().to_path_buf(),
                output_dir_name: "edited",
            })
            .unwrap(),
        );
        let orchestrator = Arc::new(EditOrchestrator::new(
            Arc::clone(&library),
            Arc::clone(&engine) as Arc<dyn MediaEngine>,
            &EditingConfig::default(),
        ));
        let router = build_router(AppState::new(library, orchestrator), None);

        Self {
            router,
            root,
            engine,
        }
    }

    /// Writes a file under the library root.
    pub fn write_file(&self, relative: &str, contents: &[u8]) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Sends one request through the production router.
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET helper.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST helper with a JSON body.
    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// DELETE helper.
    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Collects a response body.
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

/// Collects and parses a JSON response body.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
