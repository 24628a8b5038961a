//! Configuration file loading for agora
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Environment: `AGORA_<SECTION>__<KEY>` (e.g. `AGORA_GENERATION__MODEL`)
//! 3. Project root: `./agora.toml` or `./.agora.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agora/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDebateConfig, FileExchangesConfig, FileGenerationConfig, FileLoggingConfig,
    FileOpenAiConfig, FileOutputConfig, FileProfilesConfig, FileProvidersConfig,
    FileSearchConfig,
};
pub use loader::ConfigLoader;
