//! Web search through the DuckDuckGo Instant Answer API
//!
//! The API needs no key and returns abstracts, answers, definitions and
//! related topics rather than full result listings. Each populated section
//! becomes one [`EvidenceSnippet`], ranked in that order.

use agora_application::{SearchError, SearchProvider};
use agora_domain::EvidenceSnippet;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

const PROVIDER_NAME: &str = "duckduckgo";

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agora/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<EvidenceSnippet>, SearchError> {
        let response = self
            .client
            .get(DDG_API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::RequestFailed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        let snippets = snippets_from_response(&body, k);
        debug!(query, count = snippets.len(), "DuckDuckGo search completed");
        Ok(snippets)
    }
}

/// Turn an Instant Answer response into ranked snippets
fn snippets_from_response(data: &Value, k: usize) -> Vec<EvidenceSnippet> {
    let mut snippets = Vec::new();
    let text = |key: &str| data[key].as_str().filter(|s| !s.is_empty());

    if let Some(abstract_text) = text("AbstractText") {
        let source = text("AbstractURL")
            .or_else(|| text("AbstractSource"))
            .unwrap_or(PROVIDER_NAME);
        snippets.push(EvidenceSnippet::new(abstract_text, source, 1.0));
    }

    if let Some(answer) = text("Answer") {
        snippets.push(EvidenceSnippet::new(answer, PROVIDER_NAME, 0.9));
    }

    if let Some(definition) = text("Definition") {
        let source = text("DefinitionSource").unwrap_or(PROVIDER_NAME);
        snippets.push(EvidenceSnippet::new(definition, source, 0.8));
    }

    // Nested topic groups have no "Text" and are skipped
    if let Some(topics) = data["RelatedTopics"].as_array() {
        let related = topics
            .iter()
            .filter_map(|t| {
                let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
                let url = t["FirstURL"].as_str().unwrap_or(PROVIDER_NAME);
                Some((text, url))
            })
            .enumerate()
            .map(|(i, (text, url))| {
                let relevance = (0.6 - 0.05 * i as f64).max(0.1);
                EvidenceSnippet::new(text, url, relevance)
            });
        snippets.extend(related);
    }

    snippets.truncate(k);
    snippets
}
