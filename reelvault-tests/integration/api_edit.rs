//! Edit submission over the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::support::{TestApp, body_json};

fn edit_body(video_path: &str, segments: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "videoPath": video_path,
        "segments": segments
            .iter()
            .map(|(start, end)| json!({ "startTime": start, "endTime": end }))
            .collect::<Vec<_>>(),
    })
}

fn assert_output_name(name: &str, basename: &str) {
    let rest = name
        .strip_prefix("edited_")
        .unwrap_or_else(|| panic!("bad output name: {name}"));
    let (millis, suffix) = rest.split_once('_').unwrap();
    assert!(!millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(suffix, basename);
}

#[tokio::test]
async fn test_edit_success_names_and_writes_output() {
    let app = TestApp::new();
    app.write_file("clip.mp4", b"source");

    let response = app
        .post_json(
            "/api/edit-video",
            &edit_body("/clip.mp4", &[("0", "5"), ("10", "20")]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let output = body["output"].as_str().unwrap();
    assert_output_name(output, "clip.mp4");
    assert!(app.root.path().join("edited").join(output).exists());
}

#[tokio::test]
async fn test_edit_builds_one_trim_pair_per_segment() {
    let app = TestApp::new();
    app.write_file("clip.mp4", b"source");

    let response = app
        .post_json(
            "/api/edit-video",
            &edit_body("/clip.mp4", &[("0", "5"), ("10.5", "20"), ("30", "31")]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let plans = app.engine.executed_plans();
    assert_eq!(plans.len(), 1);

    let rendered = plans[0].graph.filter_complex();
    assert_eq!(rendered.matches("[0:v]trim=").count(), 3);
    assert_eq!(rendered.matches("[0:a]atrim=").count(), 3);
    assert!(rendered.contains("concat=n=3:v=1:a=1[outv][outa]"));
}

#[tokio::test]
async fn test_successive_edits_get_distinct_output_names() {
    let app = TestApp::new();
    app.write_file("clip.mp4", b"source");

    let first = body_json(
        app.post_json("/api/edit-video", &edit_body("/clip.mp4", &[("0", "5")]))
            .await,
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    let second = body_json(
        app.post_json("/api/edit-video", &edit_body("/clip.mp4", &[("0", "5")]))
            .await,
    )
    .await;

    assert_ne!(first["output"], second["output"]);
}

#[tokio::test]
async fn test_engine_failure_is_500_with_details_and_no_success() {
    let app = TestApp::failing("Invalid data found when processing input");
    app.write_file("clip.mp4", b"source");

    let response = app
        .post_json("/api/edit-video", &edit_body("/clip.mp4", &[("0", "5")]))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body.get("success").is_none());
    assert_eq!(body["error"], "Failed to process video");
    assert_eq!(body["details"], "Invalid data found when processing input");
}

#[tokio::test]
async fn test_edit_traversal_is_denied_before_engine_runs() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/edit-video", &edit_body("/../escape.mp4", &[("0", "5")]))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Access denied");
    assert!(app.engine.executed_plans().is_empty());
    assert!(!app.root.path().join("edited").exists());
}

#[tokio::test]
async fn test_edit_missing_source_is_404() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/edit-video", &edit_body("/missing.mp4", &[("0", "5")]))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_empty_segments_is_400() {
    let app = TestApp::new();
    app.write_file("clip.mp4", b"source");

    let response = app
        .post_json("/api/edit-video", &edit_body("/clip.mp4", &[]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.engine.executed_plans().is_empty());
}

#[tokio::test]
async fn test_edit_malformed_body_is_400() {
    let app = TestApp::new();

    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/api/edit-video")
                .header("content-type", "application/json")
                .body(Body::from("{\"videoPath\": 42}"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
