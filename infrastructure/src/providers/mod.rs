//! Language model adapters
//!
//! - [`OpenAiLanguageModel`] talks to any OpenAI-compatible chat endpoint
//! - [`OfflineLanguageModel`] never answers, so every turn uses its fallback

mod offline;
mod openai;

pub use offline::OfflineLanguageModel;
pub use openai::OpenAiLanguageModel;
