//! Candidate tables
//!
//! A candidate table maps a situational key to the strategies eligible for
//! the weighted draw. Keys are plain strings so tables can be swapped for
//! configuration-driven ones.
//!
//! | Family | Key shape | Example |
//! |--------|-----------|---------|
//! | Attack | claim heuristic or `type:<argument_type>` | `absolute_claim`, `type:empirical` |
//! | Defense | `<incoming attack>\|<rag\|norag>\|<emotion>` | `clipping\|rag\|neutral` |
//! | Followup | `<defense>\|<rag\|norag>\|<emotion>` | `refute\|norag\|agitated` |

use crate::argument::entities::{ArgumentType, StructuredArgument};
use crate::strategy::kinds::{
    AttackStrategy, DefenseStrategy, FollowupStrategy, StrategyFamily, StrategyKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Emotional register of a speaker, supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionState {
    #[default]
    Neutral,
    Confident,
    Defensive,
    Agitated,
}

impl EmotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionState::Neutral => "neutral",
            EmotionState::Confident => "confident",
            EmotionState::Defensive => "defensive",
            EmotionState::Agitated => "agitated",
        }
    }

    pub fn all() -> [EmotionState; 4] {
        [
            EmotionState::Neutral,
            EmotionState::Confident,
            EmotionState::Defensive,
            EmotionState::Agitated,
        ]
    }
}

/// Read-only lookup of eligible strategies
pub trait StrategyCandidateTable: Send + Sync {
    fn lookup(&self, family: StrategyFamily, context_key: &str) -> Option<&[String]>;
}

/// Default pair used when no key matches
pub fn default_candidates<K: StrategyKind>() -> [K; 2] {
    let names = match K::FAMILY {
        StrategyFamily::Attack => ["clipping", "conceptual_undermining"],
        StrategyFamily::Defense => ["clarify", "refute"],
        StrategyFamily::Followup => ["followup_question", "reattack"],
    };
    // Both names exist in every family's `all()`; the fallback keeps this total
    let pick = |name: &str| K::from_name(name).unwrap_or(K::all()[0]);
    [pick(names[0]), pick(names[1])]
}

/// Keys tried, in order, when attacking an argument
///
/// Claim heuristics come first because they are more specific than the
/// argument type.
pub fn attack_context_keys(argument: &StructuredArgument) -> Vec<String> {
    let claim = argument.claim.to_lowercase();
    let words: Vec<&str> = claim
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();
    let has_any = |cues: &[&str]| words.iter().any(|w| cues.contains(w));

    let mut keys = Vec::new();
    if has_any(&["all", "every", "always", "never", "none", "nobody", "everyone"]) {
        keys.push("absolute_claim".to_string());
    }
    if has_any(&["should", "ought", "must", "duty", "wrong"]) {
        keys.push("normative_claim".to_string());
    }
    if has_any(&["will", "future", "eventually", "soon"]) {
        keys.push("prediction".to_string());
    }
    if has_any(&["means", "defined", "definition", "essence"]) {
        keys.push("definition".to_string());
    }
    if argument.argument_type != ArgumentType::Unknown {
        keys.push(format!("type:{}", argument.argument_type.as_str()));
    }
    keys
}

/// Key for choosing a defense against an incoming attack
pub fn defense_context_key(
    incoming: AttackStrategy,
    attack_used_rag: bool,
    emotion: EmotionState,
) -> String {
    format!(
        "{}|{}|{}",
        incoming.as_str(),
        rag_flag(attack_used_rag),
        emotion.as_str()
    )
}

/// Key for choosing a follow-up after the opponent defended
pub fn followup_context_key(
    defense: DefenseStrategy,
    defense_used_rag: bool,
    emotion: EmotionState,
) -> String {
    format!(
        "{}|{}|{}",
        defense.as_str(),
        rag_flag(defense_used_rag),
        emotion.as_str()
    )
}

fn rag_flag(used: bool) -> &'static str {
    if used { "rag" } else { "norag" }
}

/// Built-in candidate table
#[derive(Debug, Clone)]
pub struct DefaultCandidateTable {
    entries: HashMap<(StrategyFamily, String), Vec<String>>,
}

impl Default for DefaultCandidateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCandidateTable {
    pub fn new() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        table.insert_attack_entries();
        table.insert_defense_entries();
        table.insert_followup_entries();
        table
    }

    /// Empty table: every lookup misses and the default pair is used
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert<K: StrategyKind>(&mut self, context_key: impl Into<String>, candidates: &[K]) {
        let mut names: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let name = candidate.as_str().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        self.entries.insert((K::FAMILY, context_key.into()), names);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_attack_entries(&mut self) {
        use AttackStrategy::*;
        let rows: [(&str, &[AttackStrategy]); 11] = [
            ("absolute_claim", &[Clipping, ReductiveParadox]),
            ("normative_claim", &[EthicalReversal, PhilosophicalReframing]),
            ("prediction", &[TemporalDelay, ReductiveParadox]),
            ("definition", &[ConceptualUndermining, FramingShift]),
            ("type:deductive", &[ReductiveParadox, ConceptualUndermining]),
            ("type:inductive", &[Clipping, TemporalDelay]),
            ("type:empirical", &[Clipping, FramingShift, TemporalDelay]),
            ("type:analogical", &[FramingShift, ConceptualUndermining]),
            ("type:ethical", &[EthicalReversal, PhilosophicalReframing]),
            ("type:conceptual", &[ConceptualUndermining, PhilosophicalReframing]),
            ("type:causal", &[ReductiveParadox, TemporalDelay]),
        ];
        for (key, candidates) in rows {
            self.insert(key, candidates);
        }
    }

    fn insert_defense_entries(&mut self) {
        use DefenseStrategy::*;
        for incoming in AttackStrategy::all() {
            let base: &[DefenseStrategy] = match incoming {
                AttackStrategy::Clipping => &[Clarify, Reframe],
                AttackStrategy::FramingShift => &[Reframe, CounterChallenge],
                AttackStrategy::ReductiveParadox => &[Refute, Clarify],
                AttackStrategy::ConceptualUndermining => &[Clarify, Refute],
                AttackStrategy::EthicalReversal => &[Reframe, Synthesis],
                AttackStrategy::TemporalDelay => &[Refute, Accept],
                AttackStrategy::PhilosophicalReframing => &[Synthesis, Reframe],
            };
            for rag in [true, false] {
                for emotion in EmotionState::all() {
                    let mut candidates = base.to_vec();
                    // Evidence-backed attacks call for a direct answer
                    candidates.push(if rag { Refute } else { CounterChallenge });
                    match emotion {
                        EmotionState::Neutral => {}
                        EmotionState::Confident => candidates.push(CounterChallenge),
                        EmotionState::Defensive => candidates.push(Clarify),
                        EmotionState::Agitated => candidates.push(Refute),
                    }
                    self.insert(defense_context_key(*incoming, rag, emotion), &candidates);
                }
            }
        }
    }

    fn insert_followup_entries(&mut self) {
        use FollowupStrategy::*;
        for defense in DefenseStrategy::all() {
            let base: &[FollowupStrategy] = match defense {
                DefenseStrategy::Refute => &[Reattack, Deepen],
                DefenseStrategy::Clarify => &[FollowupQuestion, Deepen],
                DefenseStrategy::Accept => &[Pivot, Synthesize],
                DefenseStrategy::Reframe => &[Reattack, Pivot],
                DefenseStrategy::CounterChallenge => &[CounterChallenge, Reattack],
                DefenseStrategy::Synthesis => &[Synthesize, FollowupQuestion],
            };
            for rag in [true, false] {
                for emotion in EmotionState::all() {
                    let mut candidates = base.to_vec();
                    candidates.push(if rag { Deepen } else { FollowupQuestion });
                    match emotion {
                        EmotionState::Neutral => {}
                        EmotionState::Confident => candidates.push(Reattack),
                        EmotionState::Defensive => candidates.push(Pivot),
                        EmotionState::Agitated => candidates.push(Synthesize),
                    }
                    self.insert(followup_context_key(*defense, rag, emotion), &candidates);
                }
            }
        }
    }
}

impl StrategyCandidateTable for DefaultCandidateTable {
    fn lookup(&self, family: StrategyFamily, context_key: &str) -> Option<&[String]> {
        self.entries
            .get(&(family, context_key.to_string()))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_keys_order() {
        let argument = StructuredArgument::new(
            "Every government must eventually protect all citizens",
            ArgumentType::Ethical,
        );
        let keys = attack_context_keys(&argument);
        assert_eq!(
            keys,
            vec![
                "absolute_claim",
                "normative_claim",
                "prediction",
                "type:ethical"
            ]
        );
    }

    #[test]
    fn test_attack_keys_for_unknown_plain_claim() {
        let argument = StructuredArgument::new("Cats are pleasant", ArgumentType::Unknown);
        assert!(attack_context_keys(&argument).is_empty());
    }

    #[test]
    fn test_defense_table_covers_every_context() {
        let table = DefaultCandidateTable::new();
        for incoming in AttackStrategy::all() {
            for rag in [true, false] {
                for emotion in EmotionState::all() {
                    let key = defense_context_key(*incoming, rag, emotion);
                    let candidates = table.lookup(StrategyFamily::Defense, &key).unwrap();
                    assert!(!candidates.is_empty());
                    for name in candidates {
                        assert!(DefenseStrategy::from_name(name).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn test_candidates_are_deduplicated() {
        let table = DefaultCandidateTable::new();
        let key = defense_context_key(AttackStrategy::ReductiveParadox, true, EmotionState::Agitated);
        let candidates = table.lookup(StrategyFamily::Defense, &key).unwrap();
        assert_eq!(candidates, ["refute", "clarify"]);
    }

    #[test]
    fn test_families_do_not_share_keys() {
        let table = DefaultCandidateTable::new();
        assert!(table.lookup(StrategyFamily::Attack, "type:empirical").is_some());
        assert!(table.lookup(StrategyFamily::Defense, "type:empirical").is_none());
    }

    #[test]
    fn test_default_pairs() {
        assert_eq!(
            default_candidates::<AttackStrategy>(),
            [AttackStrategy::Clipping, AttackStrategy::ConceptualUndermining]
        );
        assert_eq!(
            default_candidates::<DefenseStrategy>(),
            [DefenseStrategy::Clarify, DefenseStrategy::Refute]
        );
        assert_eq!(
            default_candidates::<FollowupStrategy>(),
            [FollowupStrategy::FollowupQuestion, FollowupStrategy::Reattack]
        );
    }
}
