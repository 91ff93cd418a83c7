//! Route handlers, one per user action

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

use crate::api::models::{
    DownloadResponse, OptionItem, OptionsResponse, PromptUpdate, SettingsUpdate, StudioSnapshot,
    ZoomRequest,
};
use crate::error::{AppError, Result};
use crate::studio::{AspectRatio, BackgroundStyle, ImageSlot, DEFAULT_PROMPT};
use crate::AppState;

const FILE_NAME_HEADER: &str = "x-file-name";

fn snapshot(state: &AppState) -> Json<StudioSnapshot> {
    Json(StudioSnapshot::from_state(
        &state.studio.state(),
        state.settings.limits.max_prompt_words,
    ))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        background_styles: BackgroundStyle::ALL
            .iter()
            .map(|s| OptionItem {
                value: s.value(),
                label: s.label(),
            })
            .collect(),
        aspect_ratios: AspectRatio::ALL
            .iter()
            .map(|r| OptionItem {
                value: r.value(),
                label: r.label(),
            })
            .collect(),
        max_file_size_mb: state.settings.limits.max_file_size_mb,
        max_prompt_words: state.settings.limits.max_prompt_words,
        default_prompt: DEFAULT_PROMPT,
    })
}

pub async fn get_studio(State(state): State<Arc<AppState>>) -> Json<StudioSnapshot> {
    snapshot(&state)
}

pub async fn put_image(
    State(state): State<Arc<AppState>>,
    Path(slot): Path<String>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<StudioSnapshot>> {
    let slot: ImageSlot = slot.parse()?;
    let body = body.map_err(|rejection| body_rejection(&state, &headers, rejection))?;
    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state
        .studio
        .input
        .select_image(slot, &body, declared, file_name)
        .await?;

    Ok(snapshot(&state))
}

/// Bodies cut off by the transport limit get the same answer as an
/// oversized file that made it through.
fn body_rejection(state: &AppState, headers: &HeaderMap, rejection: BytesRejection) -> AppError {
    if rejection.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::InvalidRequest(rejection.body_text());
    }
    let size_bytes = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    warn!(size_bytes, "Upload body exceeds transport limit");
    AppError::FileTooLarge {
        limit_mb: state.settings.limits.max_file_size_mb,
        size_bytes,
    }
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(slot): Path<String>,
) -> Result<Response> {
    let slot: ImageSlot = slot.parse()?;
    let image = state
        .studio
        .state()
        .image(slot)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no {} image selected", slot)))?;

    let bytes = fs::read(&image.path).await?;
    debug!(slot = %slot, size = bytes.len(), "Serving preview");

    Ok(([(header::CONTENT_TYPE, image.media_type)], bytes).into_response())
}

pub async fn put_prompt(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PromptUpdate>,
) -> Json<StudioSnapshot> {
    state.studio.input.set_prompt(update.prompt);
    snapshot(&state)
}

pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Json<StudioSnapshot> {
    if let Some(background) = update.background {
        state.studio.input.set_background(background);
    }
    if let Some(aspect_ratio) = update.aspect_ratio {
        state.studio.input.set_aspect_ratio(aspect_ratio);
    }
    snapshot(&state)
}

pub async fn generate(State(state): State<Arc<AppState>>) -> Result<Json<StudioSnapshot>> {
    state.studio.orchestrator.submit().await?;
    Ok(snapshot(&state))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Json<StudioSnapshot> {
    state.studio.input.reset().await;
    snapshot(&state)
}

pub async fn zoom(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ZoomRequest>,
) -> Json<StudioSnapshot> {
    if request.open {
        state.studio.presenter.open_zoom();
    } else {
        state
            .studio
            .presenter
            .close_zoom(request.reason.unwrap_or_default());
    }
    snapshot(&state)
}

pub async fn result(State(state): State<Arc<AppState>>) -> Result<Response> {
    let (media_type, bytes) = state.studio.presenter.result_image()?;
    Ok(([(header::CONTENT_TYPE, media_type)], bytes).into_response())
}

pub async fn download(State(state): State<Arc<AppState>>) -> Result<Json<DownloadResponse>> {
    let saved = state.studio.presenter.download().await?;
    Ok(Json(DownloadResponse {
        saved: saved.map(|p| p.to_string_lossy().to_string()),
    }))
}
