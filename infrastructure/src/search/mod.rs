//! Search provider adapters

#[cfg(feature = "web-tools")]
mod duckduckgo;

#[cfg(feature = "web-tools")]
pub use duckduckgo::DuckDuckGoSearch;
