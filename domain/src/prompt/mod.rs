//! Prompt domain
//!
//! Templates for every delegated generation step, plus the fixed moderator
//! script and fallback utterances.

mod script;
mod template;

pub use script::{ModeratorScript, fallback_utterance};
pub use template::DebatePromptTemplate;
