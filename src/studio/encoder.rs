//! Image file to transport encoding

use tokio::fs;
use tracing::{debug, error};

use crate::error::{AppError, Result};
use crate::response::base64;
use crate::studio::types::{EncodedImage, ImageFile};

/// Read a stored image and encode it as base64 with its media type
pub async fn encode(image: &ImageFile) -> Result<EncodedImage> {
    let bytes = fs::read(&image.path).await.map_err(|e| {
        error!(path = ?image.path, error = %e, "Failed to read image for encoding");
        AppError::Encoding(format!("{}: {}", image.path.display(), e))
    })?;

    debug!(path = ?image.path, size = bytes.len(), "Encoded image");

    Ok(EncodedImage {
        base64: base64::encode(&bytes),
        media_type: image.media_type.clone(),
    })
}

/// Encode the model and product images concurrently
pub async fn encode_pair(
    model: &ImageFile,
    product: &ImageFile,
) -> Result<(EncodedImage, EncodedImage)> {
    futures::future::try_join(encode(model), encode(product)).await
}
