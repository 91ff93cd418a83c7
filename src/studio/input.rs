//! Input collection: source images, prompt and presentation options

use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::LimitsConfig;
use crate::error::{AppError, Result};
use crate::response::file::{detect_media_type, extension_for, FileHandler};
use crate::studio::types::{AspectRatio, BackgroundStyle, ImageFile, ImageSlot, StudioState};
use crate::studio::SharedState;

const SUPPORTED_MEDIA_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Count whitespace-separated words of the trimmed prompt
pub fn word_count(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}

/// Whether a prompt may be submitted under the given word ceiling
pub fn prompt_within_limit(prompt: &str, max_words: usize) -> bool {
    (1..=max_words).contains(&word_count(prompt))
}

/// Submission gate: both images, a prompt in bounds, nothing in flight
pub fn can_generate(state: &StudioState, max_words: usize) -> bool {
    state.model_image.is_some()
        && state.product_image.is_some()
        && !state.loading
        && prompt_within_limit(&state.prompt, max_words)
}

/// Pick the media type for an upload.
///
/// A declared JPEG/PNG type wins; otherwise the bytes are sniffed.
pub fn resolve_media_type(declared: Option<&str>, data: &[u8]) -> Result<&'static str> {
    let declared = declared.map(|raw| {
        let essence = raw.split(';').next().unwrap_or(raw).trim().to_ascii_lowercase();
        if essence == "image/jpg" {
            "image/jpeg".to_string()
        } else {
            essence
        }
    });

    if let Some(declared) = declared.as_deref() {
        if let Some(supported) = SUPPORTED_MEDIA_TYPES.iter().find(|t| **t == declared) {
            return Ok(*supported);
        }
    }

    detect_media_type(data).ok_or_else(|| {
        AppError::UnsupportedImageType(declared.unwrap_or_else(|| "unknown".to_string()))
    })
}

/// Accepts and validates the user's selections
pub struct InputCollector {
    state: SharedState,
    uploads: FileHandler,
    limits: LimitsConfig,
}

impl InputCollector {
    pub fn new(state: SharedState, uploads: FileHandler, limits: LimitsConfig) -> Self {
        Self {
            state,
            uploads,
            limits,
        }
    }

    /// Select an image for a slot, replacing any previous selection.
    ///
    /// Rejected files leave the state and the upload directory untouched.
    pub async fn select_image(
        &self,
        slot: ImageSlot,
        data: &[u8],
        declared_type: Option<&str>,
        file_name: Option<String>,
    ) -> Result<ImageFile> {
        let size_bytes = data.len() as u64;
        if size_bytes > self.limits.max_file_size_bytes() {
            warn!(slot = %slot, size_bytes, "Rejected oversized image");
            return Err(AppError::FileTooLarge {
                limit_mb: self.limits.max_file_size_mb,
                size_bytes,
            });
        }
        if data.is_empty() {
            return Err(AppError::InvalidRequest("Image file is empty".to_string()));
        }

        let media_type = resolve_media_type(declared_type, data).map_err(|e| {
            warn!(slot = %slot, declared = ?declared_type, "Rejected unsupported image");
            e
        })?;

        let path = self.uploads.save_raw(data, extension_for(media_type)).await?;

        let image = ImageFile {
            path,
            media_type: media_type.to_string(),
            size_bytes,
            file_name,
            preview_url: format!("/api/studio/images/{}", slot),
        };

        let (previous, loading) = {
            let mut state = self.state.write();
            let previous = state.image_mut(slot).replace(image.clone());
            (previous, state.loading)
        };
        info!(slot = %slot, media_type, size_bytes, "Image selected");

        // A pending request may still read the old file; startup cleanup takes it then.
        if let Some(previous) = previous.filter(|_| !loading) {
            discard_upload(previous.path).await;
        }

        Ok(image)
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) -> usize {
        let prompt = prompt.into();
        let count = word_count(&prompt);
        self.state.write().prompt = prompt;
        debug!(words = count, "Prompt updated");
        count
    }

    pub fn set_background(&self, background: BackgroundStyle) {
        self.state.write().background = background;
    }

    pub fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        self.state.write().aspect_ratio = aspect_ratio;
    }

    pub fn can_generate(&self) -> bool {
        can_generate(&self.state.read(), self.limits.max_prompt_words)
    }

    /// Restore every field to its initial value and discard the uploads.
    ///
    /// An in-flight request keeps running; its outcome is dropped on arrival
    /// and its source files are left for startup cleanup.
    pub async fn reset(&self) {
        let (discarded, was_loading) = {
            let mut state = self.state.write();
            let epoch = state.epoch.wrapping_add(1);
            let was_loading = state.loading;
            let discarded: Vec<PathBuf> = [state.model_image.take(), state.product_image.take()]
                .into_iter()
                .flatten()
                .map(|image| image.path)
                .collect();
            *state = StudioState {
                epoch,
                ..StudioState::default()
            };
            info!(epoch, abandoned_request = was_loading, "Studio reset");
            (discarded, was_loading)
        };

        if !was_loading {
            for path in discarded {
                discard_upload(path).await;
            }
        }
    }
}

async fn discard_upload(path: PathBuf) {
    match fs::remove_file(&path).await {
        Ok(()) => debug!(path = ?path, "Removed discarded upload"),
        Err(e) => warn!(path = ?path, error = %e, "Failed to remove discarded upload"),
    }
}
