//! Backend module - generation service trait, Gemini client, instruction text

pub mod gemini;
pub mod prompt;
pub mod traits;

pub use gemini::GeminiBackend;
pub use traits::{GeneratedImage, GenerationService};
