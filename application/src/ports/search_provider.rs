//! Search provider port
//!
//! One interface over interchangeable retrieval back ends (web, corpora,
//! indexes). Results come back ordered by the provider's own relevance.

use agora_domain::EvidenceSnippet;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name recorded as the snippet source
    fn name(&self) -> &str;

    /// Up to `k` snippets for `query`
    async fn search(&self, query: &str, k: usize) -> Result<Vec<EvidenceSnippet>, SearchError>;
}
