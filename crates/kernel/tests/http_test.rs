#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP surface over the assembled block registry.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, body_json, body_string};

#[tokio::test]
async fn health_reports_block_count() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({"status": "healthy", "block_types": 4}));
}

#[tokio::test]
async fn lists_block_types_sorted() {
    let app = TestApp::new();

    let response = app.get("/block-types").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "wp-bootstrap-blocks/button",
            "wp-bootstrap-blocks/column",
            "wp-bootstrap-blocks/container",
            "wp-bootstrap-blocks/row",
        ]
    );
}

#[tokio::test]
async fn get_block_type_shows_resolved_defaults() {
    let app = TestApp::new();

    let response = app.get("/block-types/wp-bootstrap-blocks/column").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["template"], "column");
    assert_eq!(body["default_attributes"]["sizeXs"], 12);
    assert_eq!(body["attributes"]["sizeXs"]["type"], "number");
    assert_eq!(body["attributes"]["sizeXs"]["default"], 12);
    assert_eq!(body["attributes"]["sizeSm"]["default"], 0);
}

#[tokio::test]
async fn unknown_block_type_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/block-types/wp-bootstrap-blocks/carousel").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response).await;
    assert!(body.contains("wp-bootstrap-blocks/carousel"), "{body}");
}

#[tokio::test]
async fn renders_block_from_request() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/block-renderer/wp-bootstrap-blocks/column",
            &json!({"attributes": {"sizeMd": 6}, "content": "<p>hi</p>"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rendered = body["rendered"].as_str().unwrap();
    assert!(rendered.contains(r#"class="col-12 col-md-6""#), "{rendered}");
    assert!(rendered.contains("<p>hi</p>"), "{rendered}");
}

#[tokio::test]
async fn render_request_body_fields_are_optional() {
    let app = TestApp::new();

    let response = app
        .post_json("/block-renderer/wp-bootstrap-blocks/row", &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["rendered"].as_str().unwrap().contains(r#"class="row""#));
}

#[tokio::test]
async fn rendering_unknown_block_is_not_found() {
    let app = TestApp::new();

    let response = app
        .post_json("/block-renderer/other/thing", &json!({"attributes": {}}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
