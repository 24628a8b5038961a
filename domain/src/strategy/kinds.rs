//! Strategy families
//!
//! Every strategy carries the constants the RAG decision needs: a scalar
//! retrieval weight and, for attacks, a coefficient vector over the five
//! [`RagStats`](crate::philosopher::profile::RagStats) dimensions.

use serde::{Deserialize, Serialize};

/// Which family a strategy belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyFamily {
    Attack,
    Defense,
    Followup,
}

impl StrategyFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyFamily::Attack => "attack",
            StrategyFamily::Defense => "defense",
            StrategyFamily::Followup => "followup",
        }
    }
}

impl std::fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Common surface of the three strategy enums
pub trait StrategyKind: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    const FAMILY: StrategyFamily;

    /// Stable key used in candidate tables and profile weight tables
    fn as_str(&self) -> &'static str;

    fn all() -> &'static [Self];

    /// One-line instruction used in prompts and fallback plans
    fn description(&self) -> &'static str;

    /// Scalar retrieval weight of the strategy
    fn rag_weight(&self) -> f64;

    /// Prefix prepended to retrieval queries
    fn query_prefix(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        Self::all().iter().find(|k| k.as_str() == normalized).copied()
    }
}

/// Ways to attack an opponent's claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStrategy {
    Clipping,
    FramingShift,
    ReductiveParadox,
    ConceptualUndermining,
    EthicalReversal,
    TemporalDelay,
    PhilosophicalReframing,
}

impl AttackStrategy {
    /// Coefficients over (data_respect, conceptual_precision, systematic_logic,
    /// pragmatic_orientation, rhetorical_independence); each row sums to 1
    pub fn rag_coefficients(&self) -> [f64; 5] {
        match self {
            AttackStrategy::Clipping => [0.35, 0.25, 0.20, 0.10, 0.10],
            AttackStrategy::FramingShift => [0.10, 0.20, 0.10, 0.30, 0.30],
            AttackStrategy::ReductiveParadox => [0.10, 0.25, 0.45, 0.10, 0.10],
            AttackStrategy::ConceptualUndermining => [0.10, 0.50, 0.25, 0.05, 0.10],
            AttackStrategy::EthicalReversal => [0.15, 0.20, 0.15, 0.30, 0.20],
            AttackStrategy::TemporalDelay => [0.50, 0.10, 0.10, 0.25, 0.05],
            AttackStrategy::PhilosophicalReframing => [0.05, 0.30, 0.15, 0.10, 0.40],
        }
    }
}

impl StrategyKind for AttackStrategy {
    const FAMILY: StrategyFamily = StrategyFamily::Attack;

    fn as_str(&self) -> &'static str {
        match self {
            AttackStrategy::Clipping => "clipping",
            AttackStrategy::FramingShift => "framing_shift",
            AttackStrategy::ReductiveParadox => "reductive_paradox",
            AttackStrategy::ConceptualUndermining => "conceptual_undermining",
            AttackStrategy::EthicalReversal => "ethical_reversal",
            AttackStrategy::TemporalDelay => "temporal_delay",
            AttackStrategy::PhilosophicalReframing => "philosophical_reframing",
        }
    }

    fn all() -> &'static [Self] {
        &[
            AttackStrategy::Clipping,
            AttackStrategy::FramingShift,
            AttackStrategy::ReductiveParadox,
            AttackStrategy::ConceptualUndermining,
            AttackStrategy::EthicalReversal,
            AttackStrategy::TemporalDelay,
            AttackStrategy::PhilosophicalReframing,
        ]
    }

    fn description(&self) -> &'static str {
        match self {
            AttackStrategy::Clipping => {
                "Cut the claim down to size: find the counterexample that breaks its generality"
            }
            AttackStrategy::FramingShift => {
                "Move the discussion onto a frame where the claim loses its force"
            }
            AttackStrategy::ReductiveParadox => {
                "Follow the reasoning to its extreme and expose the absurd consequence"
            }
            AttackStrategy::ConceptualUndermining => {
                "Show that a key concept is vague, equivocal or circular"
            }
            AttackStrategy::EthicalReversal => {
                "Turn the claim's moral premise against its own conclusion"
            }
            AttackStrategy::TemporalDelay => {
                "Question whether the promised effects hold over time"
            }
            AttackStrategy::PhilosophicalReframing => {
                "Recast the issue in terms of a deeper philosophical question"
            }
        }
    }

    fn rag_weight(&self) -> f64 {
        match self {
            AttackStrategy::Clipping => 0.6,
            AttackStrategy::FramingShift => 0.5,
            AttackStrategy::ReductiveParadox => 0.5,
            AttackStrategy::ConceptualUndermining => 0.7,
            AttackStrategy::EthicalReversal => 0.4,
            AttackStrategy::TemporalDelay => 0.8,
            AttackStrategy::PhilosophicalReframing => 0.3,
        }
    }

    fn query_prefix(&self) -> &'static str {
        match self {
            AttackStrategy::Clipping => "counterexamples to",
            AttackStrategy::FramingShift => "alternative perspectives on",
            AttackStrategy::ReductiveParadox => "paradoxes of",
            AttackStrategy::ConceptualUndermining => "definition and ambiguity of",
            AttackStrategy::EthicalReversal => "ethical criticism of",
            AttackStrategy::TemporalDelay => "long-term evidence on",
            AttackStrategy::PhilosophicalReframing => "philosophy of",
        }
    }
}

/// Ways to answer an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseStrategy {
    Refute,
    Clarify,
    Accept,
    Reframe,
    CounterChallenge,
    Synthesis,
}

impl StrategyKind for DefenseStrategy {
    const FAMILY: StrategyFamily = StrategyFamily::Defense;

    fn as_str(&self) -> &'static str {
        match self {
            DefenseStrategy::Refute => "refute",
            DefenseStrategy::Clarify => "clarify",
            DefenseStrategy::Accept => "accept",
            DefenseStrategy::Reframe => "reframe",
            DefenseStrategy::CounterChallenge => "counter_challenge",
            DefenseStrategy::Synthesis => "synthesis",
        }
    }

    fn all() -> &'static [Self] {
        &[
            DefenseStrategy::Refute,
            DefenseStrategy::Clarify,
            DefenseStrategy::Accept,
            DefenseStrategy::Reframe,
            DefenseStrategy::CounterChallenge,
            DefenseStrategy::Synthesis,
        ]
    }

    fn description(&self) -> &'static str {
        match self {
            DefenseStrategy::Refute => "Reject the attack head-on and show where it fails",
            DefenseStrategy::Clarify => "Restate the original position so the attack misses",
            DefenseStrategy::Accept => "Concede the narrow point while keeping the main thesis",
            DefenseStrategy::Reframe => "Place the attack in a frame where it supports you",
            DefenseStrategy::CounterChallenge => "Answer with a challenge the attacker must meet",
            DefenseStrategy::Synthesis => "Absorb the objection into a stronger combined view",
        }
    }

    fn rag_weight(&self) -> f64 {
        match self {
            DefenseStrategy::Refute => 0.8,
            DefenseStrategy::Clarify => 0.4,
            DefenseStrategy::Accept => 0.2,
            DefenseStrategy::Reframe => 0.5,
            DefenseStrategy::CounterChallenge => 0.6,
            DefenseStrategy::Synthesis => 0.3,
        }
    }

    fn query_prefix(&self) -> &'static str {
        match self {
            DefenseStrategy::Refute => "evidence refuting",
            DefenseStrategy::Clarify => "precise meaning of",
            DefenseStrategy::Accept => "limits of",
            DefenseStrategy::Reframe => "broader context of",
            DefenseStrategy::CounterChallenge => "weaknesses of",
            DefenseStrategy::Synthesis => "reconciling views on",
        }
    }
}

/// Ways to press on after the opponent defended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowupStrategy {
    Reattack,
    FollowupQuestion,
    Pivot,
    Deepen,
    CounterChallenge,
    Synthesize,
}

impl StrategyKind for FollowupStrategy {
    const FAMILY: StrategyFamily = StrategyFamily::Followup;

    fn as_str(&self) -> &'static str {
        match self {
            FollowupStrategy::Reattack => "reattack",
            FollowupStrategy::FollowupQuestion => "followup_question",
            FollowupStrategy::Pivot => "pivot",
            FollowupStrategy::Deepen => "deepen",
            FollowupStrategy::CounterChallenge => "counter_challenge",
            FollowupStrategy::Synthesize => "synthesize",
        }
    }

    fn all() -> &'static [Self] {
        &[
            FollowupStrategy::Reattack,
            FollowupStrategy::FollowupQuestion,
            FollowupStrategy::Pivot,
            FollowupStrategy::Deepen,
            FollowupStrategy::CounterChallenge,
            FollowupStrategy::Synthesize,
        ]
    }

    fn description(&self) -> &'static str {
        match self {
            FollowupStrategy::Reattack => "Attack the same point again from a new angle",
            FollowupStrategy::FollowupQuestion => "Ask the question the defense left unanswered",
            FollowupStrategy::Pivot => "Shift to a neighbouring weakness",
            FollowupStrategy::Deepen => "Dig into the premise the defense relied on",
            FollowupStrategy::CounterChallenge => "Turn the defender's challenge back on them",
            FollowupStrategy::Synthesize => "Summarise what both sides now concede",
        }
    }

    fn rag_weight(&self) -> f64 {
        match self {
            FollowupStrategy::Reattack => 0.7,
            FollowupStrategy::FollowupQuestion => 0.4,
            FollowupStrategy::Pivot => 0.5,
            FollowupStrategy::Deepen => 0.8,
            FollowupStrategy::CounterChallenge => 0.6,
            FollowupStrategy::Synthesize => 0.3,
        }
    }

    fn query_prefix(&self) -> &'static str {
        match self {
            FollowupStrategy::Reattack => "criticism of",
            FollowupStrategy::FollowupQuestion => "open questions about",
            FollowupStrategy::Pivot => "related problems with",
            FollowupStrategy::Deepen => "foundations of",
            FollowupStrategy::CounterChallenge => "objections to",
            FollowupStrategy::Synthesize => "common ground on",
        }
    }
}
