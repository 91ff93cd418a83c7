//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::backend::prompt::build_instruction;
use crate::backend::traits::{GeneratedImage, GenerationService};
use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::studio::types::{EncodedImage, GenerationRequest};

const INVALID_KEY_MARKERS: [&str; 2] = ["API key not valid", "API_KEY_INVALID"];
const TEXT_EXCERPT_CHARS: usize = 200;

/// Gemini-backed composite image generator
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiBackend {
    /// Create a new Gemini backend from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let model = config.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        let endpoint = format!(
            "{}/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            model_path
        );

        Ok(Self {
            client,
            endpoint,
            model: model.to_string(),
            api_key: config.resolve_api_key(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn inline_part(image: &EncodedImage) -> RequestPart<'_> {
    RequestPart::InlineData {
        inline_data: InlineDataRef {
            mime_type: &image.media_type,
            data: &image.base64,
        },
    }
}

fn build_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let instruction = build_instruction(&request.prompt, request.background, request.aspect_ratio);
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: vec![
                inline_part(&request.model_image),
                inline_part(&request.product_image),
                RequestPart::Text { text: instruction },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        },
    }
}

/// Map a non-success upstream reply onto the error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> AppError {
    let (message, api_status) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.to_string(), None),
    };

    if INVALID_KEY_MARKERS
        .iter()
        .any(|marker| message.contains(marker) || body.contains(marker))
    {
        return AppError::InvalidCredential(message);
    }

    AppError::BackendError(format!(
        "Gemini returned {}{}: {}",
        status,
        api_status.map(|s| format!(" ({})", s)).unwrap_or_default(),
        message
    ))
}

/// Take the first inline image of the first candidate
fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AppError::NoImageReturned(
            block_reason.map(|reason| format!("blocked: {}", reason)),
        ));
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut texts = Vec::new();
    for part in parts {
        if let Some(inline) = part.inline_data {
            if !inline.data.is_empty() {
                return Ok(GeneratedImage {
                    media_type: inline.mime_type,
                    b64_data: inline.data,
                });
            }
        }
        if let Some(text) = part.text {
            texts.push(text);
        }
    }

    let text = texts.join(" ");
    let detail = if !text.trim().is_empty() {
        Some(format!("response text: {}", excerpt(text.trim())))
    } else if let Some(reason) = block_reason {
        Some(format!("blocked: {}", reason))
    } else {
        candidate
            .finish_reason
            .map(|reason| format!("finish reason: {}", reason))
    };

    Err(AppError::NoImageReturned(detail))
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= TEXT_EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(TEXT_EXCERPT_CHARS).collect();
    format!("{}…", cut)
}

#[async_trait]
impl GenerationService for GeminiBackend {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("No Gemini API key configured");
            return Err(AppError::InvalidCredential(
                "no API key configured".to_string(),
            ));
        };

        debug!(endpoint = %self.endpoint, "Sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "Gemini request failed");
                if e.is_connect() || e.is_timeout() {
                    AppError::BackendError(format!("Connection failed to {}: {}", self.endpoint, e))
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            error!(status = %status, error = %err, "Gemini returned an error");
            return Err(err);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::BackendError(format!("Failed to parse response: {}", e))
        })?;

        let image = extract_image(body).map_err(|e| {
            error!(error = %e, "Gemini response carried no image");
            e
        })?;

        info!(
            model = %self.model,
            media_type = %image.media_type,
            bytes_b64 = image.b64_data.len(),
            "Composite image generated"
        );

        Ok(image)
    }
}
