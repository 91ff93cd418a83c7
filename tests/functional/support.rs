//! Shared fixtures for functional tests

use std::path::Path;
use std::sync::Arc;

use ad_studio::backend::{GeminiBackend, GeneratedImage, GenerationService};
use ad_studio::config::Settings;
use ad_studio::error::Result;
use ad_studio::studio::{GenerationRequest, ImageSlot, Studio};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
pub const TEST_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image-preview:generateContent";
/// base64 of "generated"
pub const GENERATED_B64: &str = "Z2VuZXJhdGVk";

pub fn settings_in(dir: &Path, api_base: &str) -> Settings {
    let mut settings = Settings::default();
    settings.gemini.api_base = api_base.to_string();
    settings.gemini.api_key = Some(TEST_KEY.to_string());
    settings.gemini.timeout_ms = 5000;
    settings.storage.upload_dir = dir.join("uploads").to_string_lossy().to_string();
    settings.storage.download_dir = dir.join("downloads").to_string_lossy().to_string();
    settings
}

pub fn gemini_studio(settings: &Settings) -> Studio {
    let backend = GeminiBackend::new(&settings.gemini).unwrap();
    Studio::new(settings, Arc::new(backend))
}

pub async fn mock_gemini(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn image_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here is your ad." },
                { "inlineData": { "mimeType": "image/png", "data": GENERATED_B64 } }
            ]},
            "finishReason": "STOP"
        }]
    }))
}

pub async fn select_both(studio: &Studio) {
    studio
        .input
        .select_image(ImageSlot::Model, PNG, Some("image/png"), Some("model.png".into()))
        .await
        .unwrap();
    studio
        .input
        .select_image(ImageSlot::Product, JPEG, Some("image/jpeg"), Some("product.jpg".into()))
        .await
        .unwrap();
}

/// Service that blocks until released, to hold a request in flight
pub struct GatedService {
    pub gate: Arc<Notify>,
}

#[async_trait]
impl GenerationService for GatedService {
    fn name(&self) -> &str {
        "gated"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedImage> {
        self.gate.notified().await;
        Ok(GeneratedImage {
            media_type: "image/png".to_string(),
            b64_data: GENERATED_B64.to_string(),
        })
    }
}

/// Service that must never be reached
pub struct UnreachableService;

#[async_trait]
impl GenerationService for UnreachableService {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedImage> {
        panic!("generation service should not be called");
    }
}

/// Poll until the studio reports an in-flight request
pub async fn wait_for_loading(studio: &Studio) {
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !studio.state().loading {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("request never entered the loading state");
}
