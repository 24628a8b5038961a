//! Retrieval decision
//!
//! One multiplicative rule decides, at every juncture, whether a speaker spends
//! a search call before producing a maneuver:
//!
//! ```text
//! rag_score = strategy_weight × affinity × context_factor   (clamped to [0, 1])
//! use_rag   = rag_score ≥ threshold
//! ```
//!
//! | Juncture | strategy_weight | context_factor | threshold |
//! |----------|-----------------|----------------|-----------|
//! | Attack   | rag_stats · coefficients, or scalar | 0.5 base, + evidence/reasoning/assumptions, ≤ 1.0 | 0.3 |
//! | Defense  | scalar | 1.0 if the attack used retrieval, else 0.3 | 0.3 |
//! | Followup | scalar | 1.2 if the defense used retrieval, else 0.8 | 0.4 |

use crate::argument::entities::StructuredArgument;
use crate::philosopher::profile::PhilosopherProfile;
use crate::strategy::kinds::{AttackStrategy, DefenseStrategy, FollowupStrategy, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ATTACK_THRESHOLD: f64 = 0.3;
pub const DEFENSE_THRESHOLD: f64 = 0.3;
pub const FOLLOWUP_THRESHOLD: f64 = 0.4;

/// Reasoning longer than this (in characters) counts as developed
pub const REASONING_LENGTH_CUTOFF: usize = 100;

/// Maximum snippets handed to a maneuver
pub const MAX_RAG_RESULTS: usize = 5;

/// Maximum key terms in a generated query
pub const MAX_QUERY_TERMS: usize = 6;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "has", "have",
    "her", "his", "its", "our", "out", "was", "were", "with", "this", "that", "these", "those",
    "from", "they", "them", "their", "there", "then", "than", "what", "which", "who", "whom",
    "why", "how", "when", "where", "will", "would", "should", "could", "must", "may", "might",
    "into", "onto", "upon", "about", "because", "been", "being", "does", "did", "doing", "just",
    "only", "also", "very", "more", "most", "such", "some", "each", "other", "over", "under",
    "your", "yours", "mine", "itself", "himself", "herself", "therefore", "thus", "hence",
];

/// One named multiplicand of a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagFactor {
    pub name: String,
    pub value: f64,
}

/// Outcome of one retrieval decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagDecision {
    pub use_rag: bool,
    pub rag_score: f64,
    pub threshold: f64,
    pub contributing_factors: Vec<RagFactor>,
}

impl RagDecision {
    /// Decision for a speaker who never retrieves (humans, conclusions)
    pub fn declined() -> Self {
        Self {
            use_rag: false,
            rag_score: 0.0,
            threshold: 1.0,
            contributing_factors: Vec::new(),
        }
    }
}

/// The shared rule
///
/// The boundary is inclusive: a score equal to the threshold retrieves.
pub fn decide(
    strategy_weight: f64,
    affinity: f64,
    context_factor: f64,
    threshold: f64,
) -> RagDecision {
    let raw = strategy_weight * affinity * context_factor;
    let rag_score = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
    RagDecision {
        use_rag: rag_score >= threshold,
        rag_score,
        threshold,
        contributing_factors: vec![
            factor("strategy_weight", strategy_weight),
            factor("affinity", affinity),
            factor("context_factor", context_factor),
        ],
    }
}

fn factor(name: &str, value: f64) -> RagFactor {
    RagFactor {
        name: name.to_string(),
        value,
    }
}

/// Strategy weight for an attack
///
/// Profiles with research stats use the clamped dot product with the
/// strategy's coefficient vector; others use the strategy's scalar weight.
pub fn attack_strategy_weight(strategy: AttackStrategy, profile: &PhilosopherProfile) -> f64 {
    match &profile.rag_stats {
        Some(stats) => {
            let dot: f64 = stats
                .as_array()
                .iter()
                .zip(strategy.rag_coefficients())
                .map(|(stat, coefficient)| stat * coefficient)
                .sum();
            dot.clamp(0.0, 1.0)
        }
        None => strategy.rag_weight(),
    }
}

/// How much the targeted argument invites a sourced rebuttal
pub fn attack_context_factor(target: &StructuredArgument) -> f64 {
    let mut value: f64 = 0.5;
    if target.has_evidence() {
        value += 0.2;
    }
    if target.reasoning.chars().count() > REASONING_LENGTH_CUTOFF {
        value += 0.2;
    }
    if target.assumptions.len() >= 3 {
        value += 0.1;
    }
    value.min(1.0)
}

pub fn decide_attack(
    strategy: AttackStrategy,
    profile: &PhilosopherProfile,
    target: &StructuredArgument,
) -> RagDecision {
    decide(
        attack_strategy_weight(strategy, profile),
        profile.rag_affinity,
        attack_context_factor(target),
        ATTACK_THRESHOLD,
    )
}

pub fn decide_defense(
    strategy: DefenseStrategy,
    profile: &PhilosopherProfile,
    attack_used_rag: bool,
) -> RagDecision {
    let context_factor = if attack_used_rag { 1.0 } else { 0.3 };
    decide(
        strategy.rag_weight(),
        profile.rag_affinity,
        context_factor,
        DEFENSE_THRESHOLD,
    )
}

pub fn decide_followup(
    strategy: FollowupStrategy,
    profile: &PhilosopherProfile,
    defense_used_rag: bool,
) -> RagDecision {
    let context_factor = if defense_used_rag { 1.2 } else { 0.8 };
    decide(
        strategy.rag_weight(),
        profile.rag_affinity,
        context_factor,
        FOLLOWUP_THRESHOLD,
    )
}

/// Search query: the strategy prefix followed by the salient terms of `text`
pub fn build_query<K: StrategyKind>(strategy: K, text: &str) -> String {
    let terms = key_terms(text);
    if terms.is_empty() {
        strategy.query_prefix().to_string()
    } else {
        format!("{} {}", strategy.query_prefix(), terms.join(" "))
    }
}

/// Distinct lowercase terms of three or more letters, stop words removed
pub fn key_terms(text: &str) -> Vec<String> {
    terms(text).take(MAX_QUERY_TERMS).collect()
}

/// Share of the query's key terms that also occur in `text`, in `[0, 1]`
///
/// Every term of `text` counts, not only its leading key terms. An empty
/// query overlaps nothing.
pub fn term_overlap(query: &str, text: &str) -> f64 {
    let wanted = key_terms(query);
    if wanted.is_empty() {
        return 0.0;
    }
    let present: BTreeSet<String> = terms(text).collect();
    let hits = wanted.iter().filter(|t| present.contains(*t)).count();
    hits as f64 / wanted.len() as f64
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut seen = BTreeSet::new();
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|word| word.trim_matches('-').to_lowercase())
        .filter(|word| word.chars().count() >= 3 && !STOP_WORDS.contains(&word.as_str()))
        .filter(move |word| seen.insert(word.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::entities::ArgumentType;
    use crate::philosopher::profile::RagStats;

    #[test]
    fn test_decide_scenario() {
        let decision = decide(0.8, 0.7, 0.6, 0.3);
        assert!((decision.rag_score - 0.336).abs() < 1e-9);
        assert!(decision.use_rag);
        assert_eq!(decision.contributing_factors.len(), 3);
    }

    #[test]
    fn test_decide_boundary_is_inclusive() {
        let decision = decide(1.0, 1.0, 0.3, 0.3);
        assert_eq!(decision.rag_score, 0.3);
        assert!(decision.use_rag);

        let below = decide(1.0, 1.0, 0.29, 0.3);
        assert!(!below.use_rag);
    }

    #[test]
    fn test_score_in_unit_interval() {
        for w in [0.0, 0.25, 0.5, 1.0] {
            for a in [0.0, 0.4, 1.0] {
                for c in [0.0, 0.7, 1.0] {
                    let score = decide(w, a, c, 0.3).rag_score;
                    assert!((0.0..=1.0).contains(&score));
                }
            }
        }
        // Follow-up factor above 1 is clamped
        assert_eq!(decide(1.0, 1.0, 1.2, 0.4).rag_score, 1.0);
        assert_eq!(decide(f64::NAN, 1.0, 1.0, 0.4).rag_score, 0.0);
    }

    #[test]
    fn test_attack_context_factor() {
        let bare = StructuredArgument::new("claim", ArgumentType::Unknown);
        assert_eq!(attack_context_factor(&bare), 0.5);

        let rich = StructuredArgument::new("claim", ArgumentType::Empirical)
            .with_evidence("a study")
            .with_reasoning("r".repeat(REASONING_LENGTH_CUTOFF + 1))
            .with_assumption("a")
            .with_assumption("b")
            .with_assumption("c");
        assert_eq!(attack_context_factor(&rich), 1.0);
    }

    #[test]
    fn test_attack_weight_uses_stats_when_present() {
        let mut profile = PhilosopherProfile::neutral("x");
        assert_eq!(
            attack_strategy_weight(AttackStrategy::TemporalDelay, &profile),
            0.8
        );
        profile.rag_stats = Some(RagStats::new(1.0, 1.0, 1.0, 1.0, 1.0));
        let weight = attack_strategy_weight(AttackStrategy::TemporalDelay, &profile);
        assert!((weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_defense_and_followup_factors() {
        let mut profile = PhilosopherProfile::neutral("x");
        profile.rag_affinity = 0.5;
        // 0.8 × 0.5 × 1.0
        let with_rag = decide_defense(DefenseStrategy::Refute, &profile, true);
        assert!((with_rag.rag_score - 0.4).abs() < 1e-9);
        assert!(with_rag.use_rag);
        // 0.8 × 0.5 × 0.3
        let without = decide_defense(DefenseStrategy::Refute, &profile, false);
        assert!(!without.use_rag);

        // 0.8 × 0.5 × 1.2 = 0.48 ≥ 0.4
        assert!(decide_followup(FollowupStrategy::Deepen, &profile, true).use_rag);
        // 0.8 × 0.5 × 0.8 = 0.32 < 0.4
        assert!(!decide_followup(FollowupStrategy::Deepen, &profile, false).use_rag);
    }

    #[test]
    fn test_build_query() {
        let query = build_query(
            AttackStrategy::Clipping,
            "All swans are white, and therefore every swan we will ever see is white.",
        );
        assert_eq!(query, "counterexamples to swans white every swan ever see");
    }

    #[test]
    fn test_term_overlap_ratio() {
        let overlap = term_overlap(
            "free moral illusion",
            "Kant: the will is free only under the moral law",
        );
        assert!((overlap - 2.0 / 3.0).abs() < 1e-9);
        // Terms beyond the first six of the text still count
        let long = "one two three four five six seven eight nine ten eleven illusion";
        assert!((term_overlap("illusion", long) - 1.0).abs() < 1e-9);
        assert_eq!(term_overlap("the and", "the and"), 0.0);
        assert_eq!(term_overlap("free will", ""), 0.0);
    }

    #[test]
    fn test_key_terms_limit_and_empty() {
        let terms = key_terms("alpha beta gamma delta epsilon zeta eta theta iota");
        assert_eq!(terms.len(), MAX_QUERY_TERMS);
        assert_eq!(
            build_query(DefenseStrategy::Accept, "it is so"),
            "limits of"
        );
    }
}
