//! Common error types for the ad studio

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const MISSING_IMAGES_MESSAGE: &str = "Vui lòng tải lên cả ảnh người mẫu và sản phẩm.";
pub const INVALID_KEY_MESSAGE: &str = "The configured API key is invalid. Please check your API key.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";
pub const NO_IMAGE_MESSAGE: &str =
    "AI did not return an image. It might have responded with text only.";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("File size should not exceed {limit_mb}MB")]
    FileTooLarge { limit_mb: u64, size_bytes: u64 },

    #[error("Unsupported image type: {0}. Only JPG and PNG images are supported")]
    UnsupportedImageType(String),

    #[error("Prompt must contain between 1 and {max} words (got {count})")]
    PromptWordCount { count: usize, max: usize },

    #[error("{}", MISSING_IMAGES_MESSAGE)]
    MissingImages,

    #[error("A generation request is already in progress")]
    GenerationInFlight,

    #[error("No generated image available")]
    NoResult,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to encode image: {0}")]
    Encoding(String),

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("{}{}", NO_IMAGE_MESSAGE, detail_suffix(.0))]
    NoImageReturned(Option<String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

impl AppError {
    /// The single line shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredential(_) => INVALID_KEY_MESSAGE.to_string(),
            AppError::HttpClient(_) | AppError::BackendError(_) => {
                GENERATION_FAILED_MESSAGE.to_string()
            }
            AppError::Encoding(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
            AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Error response format
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, "backend_error", None),
            AppError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "validation_error", Some("file_too_large")),
            AppError::UnsupportedImageType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "validation_error", Some("unsupported_image_type")),
            AppError::PromptWordCount { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", Some("prompt_word_count")),
            AppError::MissingImages => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", Some("missing_images")),
            AppError::GenerationInFlight => (StatusCode::CONFLICT, "validation_error", Some("generation_in_flight")),
            AppError::NoResult => (StatusCode::NOT_FOUND, "not_found_error", Some("no_result")),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found_error", None),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error", None),
            AppError::Encoding(_) => (StatusCode::INTERNAL_SERVER_ERROR, "encoding_error", None),
            AppError::InvalidCredential(_) => (StatusCode::BAD_GATEWAY, "backend_error", Some("invalid_api_key")),
            AppError::BackendError(_) => (StatusCode::BAD_GATEWAY, "backend_error", None),
            AppError::NoImageReturned(_) => (StatusCode::BAD_GATEWAY, "backend_error", Some("no_image_returned")),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.user_message(),
                r#type: error_type.to_string(),
                code: code.map(|c| c.to_string()),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
