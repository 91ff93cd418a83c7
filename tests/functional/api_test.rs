//! Functional tests for the studio HTTP API

use std::sync::Arc;

use ad_studio::api::routes::create_router;
use ad_studio::backend::GeminiBackend;
use ad_studio::config::Settings;
use ad_studio::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

use crate::support::*;

fn app(settings: Settings) -> Router {
    let backend = GeminiBackend::new(&settings.gemini).unwrap();
    create_router(Arc::new(AppState::new(settings, Arc::new(backend))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn upload(slot: &str, content_type: &str, data: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/studio/images/{}", slot))
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(data))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_and_options() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(settings_in(dir.path(), "http://127.0.0.1:9"));

    let (status, _) = send(&app, empty(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, options) = send_json(&app, empty(Method::GET, "/api/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(options["background_styles"].as_array().unwrap().len(), 5);
    assert_eq!(options["background_styles"][1]["value"], json!("Ngoài trời"));
    assert_eq!(options["aspect_ratios"][2], json!({ "value": "9:16", "label": "Dọc" }));
    assert_eq!(options["max_file_size_mb"], json!(20));
    assert_eq!(options["max_prompt_words"], json!(100));
}

#[tokio::test]
async fn test_oversized_upload_keeps_prior_selection() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(settings_in(dir.path(), "http://127.0.0.1:9"));

    let (status, snapshot) = send_json(&app, upload("model", "image/png", PNG.to_vec())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["model_image"]["size_bytes"], json!(PNG.len()));

    let mut oversized = PNG.to_vec();
    oversized.resize(20 * 1024 * 1024 + 1, 0);
    let (status, error) = send_json(&app, upload("model", "image/png", oversized)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error["error"]["message"], json!("File size should not exceed 20MB"));

    let (_, snapshot) = send_json(&app, empty(Method::GET, "/api/studio")).await;
    assert_eq!(snapshot["model_image"]["size_bytes"], json!(PNG.len()));
    assert!(snapshot["error"].is_null());
}

#[tokio::test]
async fn test_body_over_transport_cap_gets_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path(), "http://127.0.0.1:9");
    settings.limits.max_file_size_mb = 1;
    settings.limits.max_upload_body_mb = 2;
    let app = app(settings);

    let mut oversized = PNG.to_vec();
    oversized.resize(3 * 1024 * 1024, 0);
    let (status, error) = send_json(&app, upload("product", "image/png", oversized)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error["error"]["message"], json!("File size should not exceed 1MB"));
    assert_eq!(error["error"]["code"], json!("file_too_large"));

    let (_, snapshot) = send_json(&app, empty(Method::GET, "/api/studio")).await;
    assert!(snapshot["product_image"].is_null());
}

#[tokio::test]
async fn test_preview_and_bad_slot() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(settings_in(dir.path(), "http://127.0.0.1:9"));

    let (status, _) = send(&app, empty(Method::GET, "/api/studio/images/product")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, upload("product", "image/jpeg", JPEG.to_vec())).await;
    let response = app
        .clone()
        .oneshot(empty(Method::GET, "/api/studio/images/product"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/jpeg");

    let (status, _) = send(&app, upload("logo", "image/png", PNG.to_vec())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, upload("model", "image/gif", b"GIF89a-----".to_vec())).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_long_prompt_disables_generate() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(settings_in(dir.path(), "http://127.0.0.1:9"));

    send(&app, upload("model", "image/png", PNG.to_vec())).await;
    send(&app, upload("product", "image/png", PNG.to_vec())).await;

    let (_, snapshot) = send_json(&app, empty(Method::GET, "/api/studio")).await;
    assert_eq!(snapshot["can_generate"], json!(true));

    let prompt = vec!["word"; 101].join(" ");
    let (_, snapshot) = send_json(
        &app,
        json_request(Method::PUT, "/api/studio/prompt", json!({ "prompt": prompt })),
    )
    .await;
    assert_eq!(snapshot["word_count"], json!(101));
    assert_eq!(snapshot["can_generate"], json!(false));

    let (status, _) = send(&app, empty(Method::POST, "/api/studio/generate")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_generate_result_download_and_reset() {
    let server = MockServer::start().await;
    mock_gemini(&server, image_response()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = app(settings_in(dir.path(), &format!("{}/v1beta", server.uri())));

    let (_, saved) = send_json(&app, empty(Method::POST, "/api/studio/download")).await;
    assert!(saved["saved"].is_null());

    send(&app, upload("model", "image/png", PNG.to_vec())).await;
    send(&app, upload("product", "image/jpeg", JPEG.to_vec())).await;
    let (_, snapshot) = send_json(
        &app,
        json_request(
            Method::PUT,
            "/api/studio/settings",
            json!({ "background": "Luxury", "aspect_ratio": "16:9" }),
        ),
    )
    .await;
    assert_eq!(snapshot["background"], json!("Luxury"));
    assert_eq!(snapshot["aspect_ratio"], json!("16:9"));

    let (status, snapshot) = send_json(&app, empty(Method::POST, "/api/studio/generate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["phase"], json!("success"));
    assert!(snapshot["error"].is_null());
    assert_eq!(
        snapshot["result"]["data_uri"],
        json!(format!("data:image/png;base64,{}", GENERATED_B64))
    );
    assert_eq!(snapshot["can_download"], json!(true));

    let (status, bytes) = send(&app, empty(Method::GET, "/api/studio/result")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"generated");

    let (_, snapshot) = send_json(
        &app,
        json_request(Method::POST, "/api/studio/zoom", json!({ "open": true })),
    )
    .await;
    assert_eq!(snapshot["zoomed"], json!(true));

    let (_, saved) = send_json(&app, empty(Method::POST, "/api/studio/download")).await;
    assert!(saved["saved"].as_str().unwrap().ends_with("ai_quang_cao_4k.png"));

    let (_, snapshot) = send_json(&app, empty(Method::POST, "/api/studio/reset")).await;
    assert!(snapshot["model_image"].is_null());
    assert!(snapshot["product_image"].is_null());
    assert!(snapshot["result"].is_null());
    assert_eq!(snapshot["zoomed"], json!(false));
    assert_eq!(snapshot["prompt"], json!(ad_studio::studio::DEFAULT_PROMPT));
    assert_eq!(snapshot["background"], json!("Studio"));
    assert_eq!(snapshot["phase"], json!("idle"));

    let (status, _) = send(&app, empty(Method::GET, "/api/studio/result")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
