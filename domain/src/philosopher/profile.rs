//! Philosopher profiles
//!
//! A profile is the static per-agent configuration of a debater: how much it
//! likes to reach for outside sources, how it weighs each strategy, and its
//! five-dimensional research temperament ([`RagStats`]).

use crate::strategy::kinds::{StrategyFamily, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Research temperament, each dimension in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RagStats {
    pub data_respect: f64,
    pub conceptual_precision: f64,
    pub systematic_logic: f64,
    pub pragmatic_orientation: f64,
    pub rhetorical_independence: f64,
}

impl RagStats {
    pub fn new(
        data_respect: f64,
        conceptual_precision: f64,
        systematic_logic: f64,
        pragmatic_orientation: f64,
        rhetorical_independence: f64,
    ) -> Self {
        Self {
            data_respect,
            conceptual_precision,
            systematic_logic,
            pragmatic_orientation,
            rhetorical_independence,
        }
    }

    /// Dimensions in coefficient order
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.data_respect,
            self.conceptual_precision,
            self.systematic_logic,
            self.pragmatic_orientation,
            self.rhetorical_independence,
        ]
    }
}

/// Static configuration of one debater (immutable per debate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhilosopherProfile {
    pub name: String,
    /// Persona line used in system prompts
    #[serde(default)]
    pub persona: String,
    pub rag_affinity: f64,
    #[serde(default)]
    pub strategy_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub defense_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub followup_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub rag_stats: Option<RagStats>,
}

impl PhilosopherProfile {
    /// Profile with no preferences: every strategy falls back to the default weight
    pub fn neutral(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persona: String::new(),
            rag_affinity: 0.5,
            strategy_weights: BTreeMap::new(),
            defense_weights: BTreeMap::new(),
            followup_weights: BTreeMap::new(),
            rag_stats: None,
        }
    }

    pub fn weights(&self, family: StrategyFamily) -> &BTreeMap<String, f64> {
        match family {
            StrategyFamily::Attack => &self.strategy_weights,
            StrategyFamily::Defense => &self.defense_weights,
            StrategyFamily::Followup => &self.followup_weights,
        }
    }

    /// Weight of a strategy in this profile, if the profile mentions it
    pub fn weight_of<K: StrategyKind>(&self, kind: K) -> Option<f64> {
        self.weights(K::FAMILY).get(kind.as_str()).copied()
    }

    /// Clamp every number into `[0, 1]`
    pub fn sanitized(mut self) -> Self {
        self.rag_affinity = unit(self.rag_affinity);
        for table in [
            &mut self.strategy_weights,
            &mut self.defense_weights,
            &mut self.followup_weights,
        ] {
            for weight in table.values_mut() {
                *weight = unit(*weight);
            }
        }
        if let Some(stats) = self.rag_stats.as_mut() {
            stats.data_respect = unit(stats.data_respect);
            stats.conceptual_precision = unit(stats.conceptual_precision);
            stats.systematic_logic = unit(stats.systematic_logic);
            stats.pragmatic_orientation = unit(stats.pragmatic_orientation);
            stats.rhetorical_independence = unit(stats.rhetorical_independence);
        }
        self
    }

    /// Built-in profile by key
    pub fn builtin(key: &str) -> Option<Self> {
        let profile = match key.trim().to_lowercase().as_str() {
            "socrates" => Self::build(
                "Socrates",
                "You question relentlessly and expose contradictions through patient inquiry.",
                0.3,
                &[
                    ("conceptual_undermining", 0.9),
                    ("reductive_paradox", 0.8),
                    ("clipping", 0.4),
                    ("philosophical_reframing", 0.6),
                ],
                &[("clarify", 0.8), ("counter_challenge", 0.9), ("accept", 0.5)],
                &[("followup_question", 0.9), ("deepen", 0.8), ("reattack", 0.3)],
                RagStats::new(0.2, 0.9, 0.7, 0.3, 0.9),
            ),
            "kant" => Self::build(
                "Immanuel Kant",
                "You argue from universal principles, duty and the limits of reason.",
                0.5,
                &[
                    ("ethical_reversal", 0.9),
                    ("conceptual_undermining", 0.7),
                    ("reductive_paradox", 0.6),
                ],
                &[("refute", 0.7), ("clarify", 0.8), ("synthesis", 0.4)],
                &[("deepen", 0.8), ("reattack", 0.6), ("synthesize", 0.3)],
                RagStats::new(0.4, 0.95, 0.95, 0.2, 0.6),
            ),
            "nietzsche" => Self::build(
                "Friedrich Nietzsche",
                "You unmask hidden values and attack comfortable moral certainties.",
                0.2,
                &[
                    ("framing_shift", 0.9),
                    ("ethical_reversal", 0.8),
                    ("philosophical_reframing", 0.7),
                    ("clipping", 0.3),
                ],
                &[("reframe", 0.9), ("counter_challenge", 0.8), ("accept", 0.1)],
                &[("reattack", 0.9), ("pivot", 0.6), ("counter_challenge", 0.7)],
                RagStats::new(0.1, 0.5, 0.3, 0.4, 1.0),
            ),
            "hume" => Self::build(
                "David Hume",
                "You rely on experience and evidence and distrust reason that outruns it.",
                0.8,
                &[
                    ("clipping", 0.9),
                    ("temporal_delay", 0.6),
                    ("conceptual_undermining", 0.5),
                ],
                &[("refute", 0.8), ("accept", 0.6), ("clarify", 0.5)],
                &[("deepen", 0.7), ("followup_question", 0.6), ("reattack", 0.5)],
                RagStats::new(0.95, 0.6, 0.6, 0.7, 0.5),
            ),
            "marx" => Self::build(
                "Karl Marx",
                "You read every question through material conditions and class interest.",
                0.7,
                &[
                    ("framing_shift", 0.8),
                    ("temporal_delay", 0.7),
                    ("ethical_reversal", 0.6),
                ],
                &[("reframe", 0.8), ("refute", 0.7), ("synthesis", 0.5)],
                &[("pivot", 0.7), ("reattack", 0.7), ("deepen", 0.5)],
                RagStats::new(0.8, 0.5, 0.7, 0.9, 0.6),
            ),
            "beauvoir" => Self::build(
                "Simone de Beauvoir",
                "You examine freedom, situation and the ethics of ambiguity.",
                0.6,
                &[
                    ("philosophical_reframing", 0.8),
                    ("ethical_reversal", 0.7),
                    ("framing_shift", 0.6),
                ],
                &[("synthesis", 0.7), ("reframe", 0.7), ("clarify", 0.6)],
                &[("deepen", 0.7), ("synthesize", 0.6), ("followup_question", 0.5)],
                RagStats::new(0.5, 0.8, 0.6, 0.6, 0.8),
            ),
            _ => return None,
        };
        Some(profile)
    }

    /// Keys accepted by [`PhilosopherProfile::builtin`]
    pub fn builtin_keys() -> &'static [&'static str] {
        &["socrates", "kant", "nietzsche", "hume", "marx", "beauvoir"]
    }

    fn build(
        name: &str,
        persona: &str,
        rag_affinity: f64,
        attack: &[(&str, f64)],
        defense: &[(&str, f64)],
        followup: &[(&str, f64)],
        rag_stats: RagStats,
    ) -> Self {
        let table = |entries: &[(&str, f64)]| {
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            name: name.to_string(),
            persona: persona.to_string(),
            rag_affinity,
            strategy_weights: table(attack),
            defense_weights: table(defense),
            followup_weights: table(followup),
            rag_stats: Some(rag_stats),
        }
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
