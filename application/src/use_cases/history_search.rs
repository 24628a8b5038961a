//! Dialogue history search
//!
//! A [`SearchProvider`] over the debaters' own transcript, so earlier turns
//! can be quoted back as evidence. Each search works on a snapshot taken when
//! the provider is built; the orchestrator builds a fresh one per turn.

use crate::ports::search_provider::{SearchError, SearchProvider};
use agora_domain::core::string::truncate_str;
use agora_domain::strategy::rag::term_overlap;
use agora_domain::{EvidenceSnippet, Role, TurnRecord};
use async_trait::async_trait;

/// Longest excerpt of one turn handed out as a snippet
pub const HISTORY_SNIPPET_BYTES: usize = 400;

pub struct HistorySearch {
    turns: Vec<TurnRecord>,
}

impl HistorySearch {
    /// Moderator turns are scripted and never returned
    pub fn new(turns: impl IntoIterator<Item = TurnRecord>) -> Self {
        Self {
            turns: turns
                .into_iter()
                .filter(|r| r.role != Role::Moderator && !r.text.trim().is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl SearchProvider for HistorySearch {
    fn name(&self) -> &str {
        "history"
    }

    /// Turns sharing key terms with `query`, scored by the overlap ratio
    ///
    /// Equal scores put the more recent turn first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<EvidenceSnippet>, SearchError> {
        let mut scored: Vec<(f64, &TurnRecord)> = self
            .turns
            .iter()
            .rev()
            .map(|r| (term_overlap(query, &r.text), r))
            .filter(|(overlap, _)| *overlap > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(overlap, r)| {
                EvidenceSnippet::new(
                    format!(
                        "{}: {}",
                        r.speaker_id,
                        truncate_str(r.text.trim(), HISTORY_SNIPPET_BYTES)
                    ),
                    self.name(),
                    overlap,
                )
            })
            .collect())
    }
}
