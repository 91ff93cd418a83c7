//! Domain types shared by the studio components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_PROMPT: &str =
    "Người mẫu mặc váy trắng cầm sản phẩm mỹ phẩm trong studio sang trọng";

/// Which of the two source images a selection fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Model,
    Product,
}

impl ImageSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Model => "model",
            ImageSlot::Product => "product",
        }
    }
}

impl FromStr for ImageSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" => Ok(ImageSlot::Model),
            "product" => Ok(ImageSlot::Product),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown image slot '{}'. Must be 'model' or 'product'",
                other
            ))),
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background style inserted into the generation instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundStyle {
    #[default]
    Studio,
    #[serde(rename = "Ngoài trời")]
    Outdoor,
    Luxury,
    Tropical,
    Minimalist,
}

impl BackgroundStyle {
    pub const ALL: [BackgroundStyle; 5] = [
        BackgroundStyle::Studio,
        BackgroundStyle::Outdoor,
        BackgroundStyle::Luxury,
        BackgroundStyle::Tropical,
        BackgroundStyle::Minimalist,
    ];

    /// Value as it appears on the wire and in the instruction text
    pub fn value(&self) -> &'static str {
        match self {
            BackgroundStyle::Studio => "Studio",
            BackgroundStyle::Outdoor => "Ngoài trời",
            BackgroundStyle::Luxury => "Luxury",
            BackgroundStyle::Tropical => "Tropical",
            BackgroundStyle::Minimalist => "Minimalist",
        }
    }

    pub fn label(&self) -> &'static str {
        self.value()
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Output aspect ratio inserted into the generation instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Vuông",
            AspectRatio::Landscape => "Ngang",
            AspectRatio::Portrait => "Dọc",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// A selected source image, stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub media_type: String,
    pub size_bytes: u64,
    pub file_name: Option<String>,
    pub preview_url: String,
}

/// Image payload ready for transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub base64: String,
    pub media_type: String,
}

/// Everything one submission sends to the generation service
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model_image: EncodedImage,
    pub product_image: EncodedImage,
    pub prompt: String,
    pub background: BackgroundStyle,
    pub aspect_ratio: AspectRatio,
}

/// A generated composite image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub data_uri: String,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrator phase, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// The whole mutable state of one studio session
#[derive(Debug, Clone)]
pub struct StudioState {
    pub model_image: Option<ImageFile>,
    pub product_image: Option<ImageFile>,
    pub prompt: String,
    pub background: BackgroundStyle,
    pub aspect_ratio: AspectRatio,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
    pub loading: bool,
    pub zoomed: bool,
    /// Bumped on every reset; outcomes tagged with an older epoch are dropped.
    pub epoch: u64,
}

impl Default for StudioState {
    fn default() -> Self {
        Self {
            model_image: None,
            product_image: None,
            prompt: DEFAULT_PROMPT.to_string(),
            background: BackgroundStyle::default(),
            aspect_ratio: AspectRatio::default(),
            result: None,
            error: None,
            loading: false,
            zoomed: false,
            epoch: 0,
        }
    }
}

impl StudioState {
    pub fn image(&self, slot: ImageSlot) -> Option<&ImageFile> {
        match slot {
            ImageSlot::Model => self.model_image.as_ref(),
            ImageSlot::Product => self.product_image.as_ref(),
        }
    }

    pub fn image_mut(&mut self, slot: ImageSlot) -> &mut Option<ImageFile> {
        match slot {
            ImageSlot::Model => &mut self.model_image,
            ImageSlot::Product => &mut self.product_image,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Submitting
        } else if self.result.is_some() {
            Phase::Success
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }
}
