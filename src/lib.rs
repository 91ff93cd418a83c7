//! AI Ad Studio
//!
//! Combines a model photo and a product photo into one advertising image
//! through Gemini, with the submission lifecycle, validation and result
//! handling served over HTTP.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod response;
pub mod studio;

pub use error::{AppError, Result};

use std::sync::Arc;

use studio::Studio;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub studio: Arc<Studio>,
}

impl AppState {
    pub fn new(settings: config::Settings, service: Arc<dyn backend::GenerationService>) -> Self {
        let studio = Studio::new(&settings, service);
        Self {
            settings: Arc::new(settings),
            studio: Arc::new(studio),
        }
    }
}
