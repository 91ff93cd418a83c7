//! Result presentation: zoom overlay and local download

use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::response::base64;
use crate::response::file::FileHandler;
use crate::studio::SharedState;

/// What closed the zoom overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseReason {
    #[default]
    Button,
    Backdrop,
}

pub struct ResultPresenter {
    state: SharedState,
    downloads: FileHandler,
    download_file_name: String,
}

impl ResultPresenter {
    pub fn new(state: SharedState, downloads: FileHandler, download_file_name: String) -> Self {
        Self {
            state,
            downloads,
            download_file_name,
        }
    }

    /// Open the overlay; a no-op without a result. Returns the new zoom state.
    pub fn open_zoom(&self) -> bool {
        let mut state = self.state.write();
        state.zoomed = state.result.is_some();
        state.zoomed
    }

    pub fn close_zoom(&self, reason: CloseReason) {
        self.state.write().zoomed = false;
        debug!(?reason, "Zoom closed");
    }

    /// Decoded result bytes with their media type
    pub fn result_image(&self) -> Result<(String, Vec<u8>)> {
        let data_uri = self
            .state
            .read()
            .result
            .as_ref()
            .map(|r| r.data_uri.clone())
            .ok_or(AppError::NoResult)?;

        let media_type = base64::media_type_of(&data_uri)
            .unwrap_or("image/png")
            .to_string();
        let bytes = base64::decode(&data_uri)?;
        Ok((media_type, bytes))
    }

    /// Save the result under the fixed download name.
    ///
    /// Returns `None` without touching the filesystem when there is nothing
    /// to save or a request is pending.
    pub async fn download(&self) -> Result<Option<PathBuf>> {
        let data_uri = {
            let state = self.state.read();
            if state.loading {
                return Ok(None);
            }
            match state.result.as_ref() {
                Some(result) => result.data_uri.clone(),
                None => return Ok(None),
            }
        };

        let bytes = base64::decode(&data_uri)?;
        let path = self
            .downloads
            .save_named(&self.download_file_name, &bytes)
            .await?;

        info!(path = ?path, size = bytes.len(), "Result downloaded");
        Ok(Some(path))
    }
}
