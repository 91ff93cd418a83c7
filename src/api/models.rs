//! Request and response bodies of the studio API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::response::base64;
use crate::studio::input::{can_generate, word_count};
use crate::studio::{AspectRatio, BackgroundStyle, CloseReason, ImageFile, Phase, StudioState};

#[derive(Debug, Serialize)]
pub struct ImageView {
    pub media_type: String,
    pub size_bytes: u64,
    pub file_name: Option<String>,
    pub preview_url: String,
}

impl From<&ImageFile> for ImageView {
    fn from(image: &ImageFile) -> Self {
        Self {
            media_type: image.media_type.clone(),
            size_bytes: image.size_bytes,
            file_name: image.file_name.clone(),
            preview_url: image.preview_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    pub media_type: Option<String>,
    pub url: String,
    pub data_uri: String,
    pub generated_at: DateTime<Utc>,
}

/// Everything a client needs to render the studio
#[derive(Debug, Serialize)]
pub struct StudioSnapshot {
    pub model_image: Option<ImageView>,
    pub product_image: Option<ImageView>,
    pub prompt: String,
    pub word_count: usize,
    pub max_prompt_words: usize,
    pub background: BackgroundStyle,
    pub aspect_ratio: AspectRatio,
    pub phase: Phase,
    pub loading: bool,
    pub can_generate: bool,
    pub can_download: bool,
    pub error: Option<String>,
    pub result: Option<ResultView>,
    pub zoomed: bool,
}

impl StudioSnapshot {
    pub fn from_state(state: &StudioState, max_prompt_words: usize) -> Self {
        let result = state.result.as_ref().map(|r| ResultView {
            media_type: base64::media_type_of(&r.data_uri).map(str::to_string),
            url: "/api/studio/result".to_string(),
            data_uri: r.data_uri.clone(),
            generated_at: r.generated_at,
        });

        Self {
            model_image: state.model_image.as_ref().map(ImageView::from),
            product_image: state.product_image.as_ref().map(ImageView::from),
            prompt: state.prompt.clone(),
            word_count: word_count(&state.prompt),
            max_prompt_words,
            background: state.background,
            aspect_ratio: state.aspect_ratio,
            phase: state.phase(),
            loading: state.loading,
            can_generate: can_generate(state, max_prompt_words),
            can_download: state.result.is_some() && !state.loading,
            error: state.error.clone(),
            zoomed: state.zoomed && result.is_some(),
            result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptionItem {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub background_styles: Vec<OptionItem>,
    pub aspect_ratios: Vec<OptionItem>,
    pub max_file_size_mb: u64,
    pub max_prompt_words: usize,
    pub default_prompt: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PromptUpdate {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub background: Option<BackgroundStyle>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub open: bool,
    #[serde(default)]
    pub reason: Option<CloseReason>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub saved: Option<String>,
}
