pub mod settings;

pub use settings::{LlmConfig, ServerConfig, Settings};
