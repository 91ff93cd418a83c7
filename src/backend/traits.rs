//! Common traits and types for image generation services

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::response::base64;
use crate::studio::types::GenerationRequest;

/// Image payload returned by a generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Media type reported by the service
    pub media_type: String,

    /// Base64 encoded image data
    pub b64_data: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        base64::data_uri(&self.media_type, &self.b64_data)
    }
}

/// Trait for composite image generation services
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Get the service name
    fn name(&self) -> &str;

    /// Produce one composite image from the request
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;
}
