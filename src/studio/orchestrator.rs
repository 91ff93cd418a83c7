//! Submission lifecycle: one in-flight generation at a time

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::traits::GenerationService;
use crate::error::{AppError, Result};
use crate::studio::encoder;
use crate::studio::input::word_count;
use crate::studio::types::{GenerationRequest, GenerationResult};
use crate::studio::SharedState;

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A result was stored
    Succeeded,
    /// The user-visible error line that was stored
    Failed(String),
    /// A reset happened while the request was in flight; nothing was stored
    Discarded,
}

/// Clears `loading` if a submission is dropped before it stores an outcome.
///
/// Only acts while the epoch it was armed with is still current.
struct InFlightGuard {
    state: SharedState,
    epoch: u64,
    armed: bool,
}

impl InFlightGuard {
    fn new(state: SharedState, epoch: u64) -> Self {
        Self {
            state,
            epoch,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.write();
        if state.epoch == self.epoch && state.loading {
            state.loading = false;
            warn!(epoch = self.epoch, "Submission dropped before completion");
        }
    }
}

pub struct Orchestrator {
    state: SharedState,
    service: Arc<dyn GenerationService>,
    max_prompt_words: usize,
}

impl Orchestrator {
    pub fn new(
        state: SharedState,
        service: Arc<dyn GenerationService>,
        max_prompt_words: usize,
    ) -> Self {
        Self {
            state,
            service,
            max_prompt_words,
        }
    }

    /// Run one submission to completion.
    ///
    /// `Err` means the submission was refused before entering the loading
    /// state; service failures are reported through `SubmitOutcome::Failed`.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (model, product, prompt, background, aspect_ratio, epoch) = {
            let mut state = self.state.write();

            if state.loading {
                warn!("Submission rejected: a request is already in flight");
                return Err(AppError::GenerationInFlight);
            }

            let count = word_count(&state.prompt);
            if count == 0 || count > self.max_prompt_words {
                return Err(AppError::PromptWordCount {
                    count,
                    max: self.max_prompt_words,
                });
            }

            let (Some(model), Some(product)) =
                (state.model_image.clone(), state.product_image.clone())
            else {
                state.error = Some(AppError::MissingImages.user_message());
                return Err(AppError::MissingImages);
            };

            state.error = None;
            state.result = None;
            state.zoomed = false;
            state.loading = true;

            (
                model,
                product,
                state.prompt.clone(),
                state.background,
                state.aspect_ratio,
                state.epoch,
            )
        };

        let mut guard = InFlightGuard::new(self.state.clone(), epoch);

        info!(
            service = %self.service.name(),
            background = %background,
            aspect_ratio = %aspect_ratio,
            words = word_count(&prompt),
            "Generation started"
        );

        let outcome = async {
            let (model_image, product_image) = encoder::encode_pair(&model, &product).await?;
            let request = GenerationRequest {
                model_image,
                product_image,
                prompt,
                background,
                aspect_ratio,
            };
            self.service.generate(&request).await
        }
        .await;

        guard.disarm();
        let mut state = self.state.write();
        if state.epoch != epoch {
            debug!(epoch, current = state.epoch, "Discarding outcome of abandoned request");
            return Ok(SubmitOutcome::Discarded);
        }

        state.loading = false;
        match outcome {
            Ok(image) => {
                state.result = Some(GenerationResult {
                    data_uri: image.data_uri(),
                    generated_at: Utc::now(),
                });
                state.error = None;
                info!("Generation succeeded");
                Ok(SubmitOutcome::Succeeded)
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, "Generation failed");
                state.result = None;
                state.error = Some(message.clone());
                Ok(SubmitOutcome::Failed(message))
            }
        }
    }
}
