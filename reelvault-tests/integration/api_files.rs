//! Directory listing and deletion over the HTTP API.

use axum::http::StatusCode;

use crate::support::{TestApp, body_json};

#[tokio::test]
async fn test_list_empty_root_returns_empty_array() {
    let app = TestApp::new();

    let response = app.get("/api/files?path=/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_defaults_to_root_without_path() {
    let app = TestApp::new();
    app.write_file("clip.mp4", b"data");

    let response = app.get("/api/files").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "clip.mp4");
}

#[tokio::test]
async fn test_list_entries_carry_rooted_paths_and_metadata() {
    let app = TestApp::new();
    app.write_file("movies/clip.mp4", b"0123456789");

    let response = app.get("/api/files?path=/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let entry = &json[0];
    assert_eq!(entry["name"], "clip.mp4");
    assert_eq!(entry["path"], "/movies/clip.mp4");
    assert_eq!(entry["isDirectory"], false);
    assert_eq!(entry["size"], 10);
    assert!(entry["modifiedTime"].is_string());

    // The returned path round-trips into a follow-up request.
    let response = app.get("/api/video?path=/movies/clip.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_traversal_is_denied() {
    let app = TestApp::new();

    let response = app.get("/api/files?path=/../..").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Access denied");
}

#[tokio::test]
async fn test_list_missing_directory_is_404() {
    let app = TestApp::new();

    let response = app.get("/api/files?path=/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_file() {
    let app = TestApp::new();
    app.write_file("old.mp4", b"data");

    let response = app.delete("/api/files?path=/old.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
    assert!(!app.root.path().join("old.mp4").exists());
}

#[tokio::test]
async fn test_delete_directory_tree() {
    let app = TestApp::new();
    app.write_file("shows/season1/e01.mp4", b"data");

    let response = app.delete("/api/files?path=/shows").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.root.path().join("shows").exists());
}

#[tokio::test]
async fn test_delete_traversal_is_denied_and_mutates_nothing() {
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("keep.txt"), b"x").unwrap();
    let outside_name = outside.path().file_name().unwrap().to_str().unwrap();

    let app = TestApp::new();
    let response = app
        .delete(&format!("/api/files?path=/../{outside_name}"))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(outside.path().join("keep.txt").exists());
}

#[tokio::test]
async fn test_delete_without_path_is_bad_request() {
    let app = TestApp::new();

    let response = app.delete("/api/files").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
