//! The ad studio session: input collection, encoding, orchestration and
//! result presentation over one shared state.

pub mod encoder;
pub mod input;
pub mod orchestrator;
pub mod presenter;
pub mod types;

use parking_lot::RwLock;
use std::sync::Arc;

use crate::backend::traits::GenerationService;
use crate::config::Settings;
use crate::response::file::FileHandler;

pub use input::InputCollector;
pub use orchestrator::{Orchestrator, SubmitOutcome};
pub use presenter::{CloseReason, ResultPresenter};
pub use types::{
    AspectRatio, BackgroundStyle, EncodedImage, GenerationRequest, GenerationResult, ImageFile,
    ImageSlot, Phase, StudioState, DEFAULT_PROMPT,
};

/// State shared by the studio components. Never held across an `.await`.
pub type SharedState = Arc<RwLock<StudioState>>;

/// One studio session wired from settings and a generation service
pub struct Studio {
    state: SharedState,
    pub input: InputCollector,
    pub orchestrator: Orchestrator,
    pub presenter: ResultPresenter,
}

impl Studio {
    pub fn new(settings: &Settings, service: Arc<dyn GenerationService>) -> Self {
        let state: SharedState = Arc::new(RwLock::new(StudioState::default()));

        let input = InputCollector::new(
            state.clone(),
            FileHandler::new(&settings.storage.upload_dir),
            settings.limits.clone(),
        );
        let orchestrator = Orchestrator::new(
            state.clone(),
            service,
            settings.limits.max_prompt_words,
        );
        let presenter = ResultPresenter::new(
            state.clone(),
            FileHandler::new(&settings.storage.download_dir),
            settings.storage.download_file_name.clone(),
        );

        Self {
            state,
            input,
            orchestrator,
            presenter,
        }
    }

    /// Copy of the current state
    pub fn state(&self) -> StudioState {
        self.state.read().clone()
    }

    pub fn can_generate(&self) -> bool {
        self.input.can_generate()
    }
}
