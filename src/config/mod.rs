//! Configuration module

pub mod settings;

pub use settings::{
    GeminiConfig, LimitsConfig, LoggingConfig, ServerConfig, Settings, StorageConfig,
};
