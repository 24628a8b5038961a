//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod profiles;
pub mod providers;
pub mod search;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDebateConfig, FileGenerationConfig, FileOpenAiConfig,
    FileOutputConfig, FileSearchConfig,
};
pub use profiles::TomlProfileStore;
pub use providers::{OfflineLanguageModel, OpenAiLanguageModel};
#[cfg(feature = "web-tools")]
pub use search::DuckDuckGoSearch;
