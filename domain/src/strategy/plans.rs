//! Maneuver plans and the maneuver log
//!
//! A plan is everything text generation needs to realize one move: the chosen
//! strategy, what it targets, whether retrieval was spent and what came back,
//! and a short rhetorical payload.

use crate::argument::entities::ScoredArgument;
use crate::debate::stage::Stage;
use crate::strategy::kinds::{AttackStrategy, DefenseStrategy, FollowupStrategy, StrategyKind};
use crate::strategy::rag::RagDecision;
use serde::{Deserialize, Serialize};

/// One retrieved snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub content: String,
    pub source: String,
    pub relevance: f64,
}

impl EvidenceSnippet {
    pub fn new(content: impl Into<String>, source: impl Into<String>, relevance: f64) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            relevance: if relevance.is_nan() { 0.0 } else { relevance },
        }
    }
}

/// Merge snippets from independent retrieval tasks.
///
/// Sorted by relevance descending; ties keep the order in which the task
/// results were passed, so the merge is deterministic for a fixed input order.
/// Duplicate contents keep their most relevant copy, in the position of the
/// first one; the result is truncated to `limit`.
pub fn merge_snippets(batches: Vec<Vec<EvidenceSnippet>>, limit: usize) -> Vec<EvidenceSnippet> {
    let mut merged: Vec<EvidenceSnippet> = Vec::new();
    for snippet in batches.into_iter().flatten() {
        if snippet.content.trim().is_empty() {
            continue;
        }
        match merged.iter_mut().find(|s| s.content == snippet.content) {
            Some(existing) if snippet.relevance > existing.relevance => *existing = snippet,
            Some(_) => {}
            None => merged.push(snippet),
        }
    }
    merged.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    merged.truncate(limit);
    merged
}

/// Approach and talking points handed to text generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhetoricalPayload {
    pub approach: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl RhetoricalPayload {
    /// Fixed-shape payload used when the planning reply cannot be read
    pub fn fallback<K: StrategyKind>(strategy: K, target: &str) -> Self {
        Self {
            approach: strategy.description().to_string(),
            key_points: vec![format!("Address directly: {}", target)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPlan {
    pub strategy: AttackStrategy,
    pub target_speaker: String,
    pub target: ScoredArgument,
    pub rag_decision: RagDecision,
    pub evidence: Vec<EvidenceSnippet>,
    pub payload: RhetoricalPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensePlan {
    pub strategy: DefenseStrategy,
    /// The attack being answered
    pub context: String,
    pub rag_decision: RagDecision,
    pub evidence: Vec<EvidenceSnippet>,
    pub payload: RhetoricalPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupPlan {
    pub strategy: FollowupStrategy,
    /// The defense being pressed
    pub context: String,
    pub rag_decision: RagDecision,
    pub evidence: Vec<EvidenceSnippet>,
    pub payload: RhetoricalPayload,
}

/// Category of a speaker's move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManeuverKind {
    Opening,
    Attack,
    Defense,
    Followup,
    Conclusion,
}

impl ManeuverKind {
    /// Next move in the attack → defense → follow-up cycle
    ///
    /// `previous` is the opponent's move this turn answers, if any.
    pub fn answering(previous: Option<ManeuverKind>) -> ManeuverKind {
        match previous {
            Some(ManeuverKind::Attack) => ManeuverKind::Defense,
            Some(ManeuverKind::Defense) => ManeuverKind::Followup,
            _ => ManeuverKind::Attack,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManeuverKind::Opening => "opening",
            ManeuverKind::Attack => "attack",
            ManeuverKind::Defense => "defense",
            ManeuverKind::Followup => "followup",
            ManeuverKind::Conclusion => "conclusion",
        }
    }
}

/// A realized move with its strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "lowercase")]
pub enum Maneuver {
    Opening,
    Attack(AttackStrategy),
    Defense(DefenseStrategy),
    Followup(FollowupStrategy),
    Conclusion,
}

impl Maneuver {
    pub fn kind(&self) -> ManeuverKind {
        match self {
            Maneuver::Opening => ManeuverKind::Opening,
            Maneuver::Attack(_) => ManeuverKind::Attack,
            Maneuver::Defense(_) => ManeuverKind::Defense,
            Maneuver::Followup(_) => ManeuverKind::Followup,
            Maneuver::Conclusion => ManeuverKind::Conclusion,
        }
    }

    pub fn strategy_name(&self) -> Option<&'static str> {
        match self {
            Maneuver::Attack(s) => Some(s.as_str()),
            Maneuver::Defense(s) => Some(s.as_str()),
            Maneuver::Followup(s) => Some(s.as_str()),
            Maneuver::Opening | Maneuver::Conclusion => None,
        }
    }
}

impl std::fmt::Display for Maneuver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.strategy_name() {
            Some(name) => write!(f, "{}:{}", self.kind().as_str(), name),
            None => write!(f, "{}", self.kind().as_str()),
        }
    }
}

/// Log entry tying a maneuver to the turn that realized it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverRecord {
    /// Index of the turn in the speaking history
    pub turn_index: usize,
    pub speaker_id: String,
    pub stage: Stage,
    pub maneuver: Maneuver,
    pub used_rag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maneuver_cycle() {
        assert_eq!(ManeuverKind::answering(None), ManeuverKind::Attack);
        assert_eq!(
            ManeuverKind::answering(Some(ManeuverKind::Attack)),
            ManeuverKind::Defense
        );
        assert_eq!(
            ManeuverKind::answering(Some(ManeuverKind::Defense)),
            ManeuverKind::Followup
        );
        assert_eq!(
            ManeuverKind::answering(Some(ManeuverKind::Followup)),
            ManeuverKind::Attack
        );
        assert_eq!(
            ManeuverKind::answering(Some(ManeuverKind::Opening)),
            ManeuverKind::Attack
        );
    }

    #[test]
    fn test_merge_snippets_sorted_dedup_truncated() {
        let web = vec![
            EvidenceSnippet::new("a", "web", 0.4),
            EvidenceSnippet::new("b", "web", 0.9),
        ];
        let history = vec![
            EvidenceSnippet::new("c", "history", 0.9),
            EvidenceSnippet::new("a", "history", 0.8),
            EvidenceSnippet::new("", "history", 1.0),
        ];
        let merged = merge_snippets(vec![web, history], 2);
        let contents: Vec<_> = merged.iter().map(|s| s.content.as_str()).collect();
        // Equal relevance keeps batch order
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[test]
    fn test_merge_snippets_keeps_most_relevant_duplicate() {
        let first = vec![
            EvidenceSnippet::new("x", "web", 0.1),
            EvidenceSnippet::new("y", "web", 0.5),
        ];
        let second = vec![EvidenceSnippet::new("x", "history", 0.9)];
        let merged = merge_snippets(vec![first, second], 5);
        let ranked: Vec<_> = merged
            .iter()
            .map(|s| (s.content.as_str(), s.source.as_str(), s.relevance))
            .collect();
        assert_eq!(ranked, vec![("x", "history", 0.9), ("y", "web", 0.5)]);

        // A weaker copy never displaces the stronger one
        let merged = merge_snippets(
            vec![
                vec![EvidenceSnippet::new("x", "web", 0.9)],
                vec![EvidenceSnippet::new("x", "history", 0.2)],
            ],
            5,
        );
        assert_eq!(merged, vec![EvidenceSnippet::new("x", "web", 0.9)]);
    }

    #[test]
    fn test_maneuver_display() {
        assert_eq!(
            Maneuver::Attack(AttackStrategy::TemporalDelay).to_string(),
            "attack:temporal_delay"
        );
        assert_eq!(Maneuver::Opening.to_string(), "opening");
    }

    #[test]
    fn test_fallback_payload_uses_description() {
        let payload = RhetoricalPayload::fallback(DefenseStrategy::Clarify, "the claim");
        assert_eq!(payload.approach, DefenseStrategy::Clarify.description());
        assert_eq!(payload.key_points.len(), 1);
    }
}
