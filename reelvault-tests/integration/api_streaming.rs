//! Range-based streaming over the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use crate::support::{TestApp, body_bytes, body_json};

fn fixture_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

async fn ranged_get(app: &TestApp, uri: &str, range: &str) -> axum::http::Response<Body> {
    app.request(
        Request::builder()
            .uri(uri)
            .header(header::RANGE, range)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_full_request_streams_whole_file() {
    let app = TestApp::new();
    let contents = fixture_bytes(150);
    app.write_file("clip.mp4", &contents);

    let response = app.get("/api/video?path=/clip.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "150"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    assert_eq!(
        response.headers().get(header::ACCEPT_RANGES).unwrap(),
        "bytes"
    );
    assert_eq!(body_bytes(response).await, contents);
}

#[tokio::test]
async fn test_range_request_returns_exact_window() {
    let app = TestApp::new();
    let contents = fixture_bytes(150);
    app.write_file("clip.mp4", &contents);

    let response = ranged_get(&app, "/api/video?path=/clip.mp4", "bytes=0-99").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "100"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 0-99/150"
    );
    assert_eq!(body_bytes(response).await, contents[..100]);
}

#[tokio::test]
async fn test_open_ended_range_runs_to_eof() {
    let app = TestApp::new();
    app.write_file("clip.mp4", &fixture_bytes(150));

    let response = ranged_get(&app, "/api/video?path=/clip.mp4", "bytes=100-").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 100-149/150"
    );
    assert_eq!(body_bytes(response).await.len(), 50);
}

#[tokio::test]
async fn test_unsatisfiable_range_is_416() {
    let app = TestApp::new();
    app.write_file("clip.mp4", &fixture_bytes(150));

    let response = ranged_get(&app, "/api/video?path=/clip.mp4", "bytes=500-600").await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes */150"
    );
}

#[tokio::test]
async fn test_malformed_range_degrades_to_full_content() {
    let app = TestApp::new();
    app.write_file("clip.mp4", &fixture_bytes(80));

    let response = ranged_get(&app, "/api/video?path=/clip.mp4", "bytes=oops").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.len(), 80);
}

#[tokio::test]
async fn test_missing_video_is_404() {
    let app = TestApp::new();

    let response = app.get("/api/video?path=/missing.mp4").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Video not found");
}

#[tokio::test]
async fn test_traversal_is_denied() {
    let app = TestApp::new();

    let response = app.get("/api/video?path=/../../etc/passwd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Access denied");
}

#[tokio::test]
async fn test_missing_path_parameter_is_bad_request() {
    let app = TestApp::new();

    let response = app.get("/api/video").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
