//! Argument entities and the fixed scoring formula

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weight of `logical_strength` in the overall score
pub const LOGIC_WEIGHT: f64 = 0.30;
/// Weight of `evidence_quality` in the overall score
pub const EVIDENCE_WEIGHT: f64 = 0.25;
/// Weight of `1 - vulnerability` in the overall score
pub const ROBUSTNESS_WEIGHT: f64 = 0.25;
/// Weight of `relevance` in the overall score
pub const RELEVANCE_WEIGHT: f64 = 0.20;

/// Neutral axis value used when a score reply cannot be read
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Kind of reasoning an argument relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    Deductive,
    Inductive,
    Empirical,
    Analogical,
    Ethical,
    Conceptual,
    Causal,
    #[default]
    Unknown,
}

impl ArgumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentType::Deductive => "deductive",
            ArgumentType::Inductive => "inductive",
            ArgumentType::Empirical => "empirical",
            ArgumentType::Analogical => "analogical",
            ArgumentType::Ethical => "ethical",
            ArgumentType::Conceptual => "conceptual",
            ArgumentType::Causal => "causal",
            ArgumentType::Unknown => "unknown",
        }
    }

    /// Lenient parse: anything unrecognised is `Unknown`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "deductive" | "logical" => ArgumentType::Deductive,
            "inductive" => ArgumentType::Inductive,
            "empirical" | "evidential" | "statistical" => ArgumentType::Empirical,
            "analogical" | "analogy" => ArgumentType::Analogical,
            "ethical" | "moral" | "normative" => ArgumentType::Ethical,
            "conceptual" | "definitional" => ArgumentType::Conceptual,
            "causal" => ArgumentType::Causal,
            _ => ArgumentType::Unknown,
        }
    }
}

impl std::fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claim extracted from an utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredArgument {
    pub claim: String,
    pub evidence: String,
    pub reasoning: String,
    pub assumptions: BTreeSet<String>,
    pub argument_type: ArgumentType,
}

impl StructuredArgument {
    pub fn new(claim: impl Into<String>, argument_type: ArgumentType) -> Self {
        Self {
            claim: claim.into(),
            evidence: String::new(),
            reasoning: String::new(),
            assumptions: BTreeSet::new(),
            argument_type,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.insert(assumption.into());
        self
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence.trim().is_empty()
    }
}

/// The four independently scored axes, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreAxes {
    pub logical_strength: f64,
    pub evidence_quality: f64,
    /// Higher means a more attractive attack target
    pub vulnerability: f64,
    pub relevance: f64,
}

impl Default for ScoreAxes {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ScoreAxes {
    pub fn new(
        logical_strength: f64,
        evidence_quality: f64,
        vulnerability: f64,
        relevance: f64,
    ) -> Self {
        Self {
            logical_strength: clamp_unit(logical_strength),
            evidence_quality: clamp_unit(evidence_quality),
            vulnerability: clamp_unit(vulnerability),
            relevance: clamp_unit(relevance),
        }
    }

    pub fn neutral() -> Self {
        Self::new(NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE)
    }

    /// Convex combination with vulnerability counted as a liability
    pub fn overall(&self) -> f64 {
        LOGIC_WEIGHT * self.logical_strength
            + EVIDENCE_WEIGHT * self.evidence_quality
            + ROBUSTNESS_WEIGHT * (1.0 - self.vulnerability)
            + RELEVANCE_WEIGHT * self.relevance
    }
}

/// A structured argument plus its scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArgument {
    pub argument: StructuredArgument,
    pub logical_strength: f64,
    pub evidence_quality: f64,
    pub vulnerability: f64,
    pub relevance: f64,
    pub overall_score: f64,
}

impl ScoredArgument {
    pub fn new(argument: StructuredArgument, axes: ScoreAxes) -> Self {
        Self {
            argument,
            logical_strength: axes.logical_strength,
            evidence_quality: axes.evidence_quality,
            vulnerability: axes.vulnerability,
            relevance: axes.relevance,
            overall_score: axes.overall(),
        }
    }

    pub fn axes(&self) -> ScoreAxes {
        ScoreAxes {
            logical_strength: self.logical_strength,
            evidence_quality: self.evidence_quality,
            vulnerability: self.vulnerability,
            relevance: self.relevance,
        }
    }

    /// Overall score recomputed from the stored axes
    pub fn recompute_overall(&self) -> f64 {
        self.axes().overall()
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL_SCORE
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_weights_sum_to_one() {
        let sum = LOGIC_WEIGHT + EVIDENCE_WEIGHT + ROBUSTNESS_WEIGHT + RELEVANCE_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overall_score_formula() {
        let axes = ScoreAxes::new(1.0, 0.0, 1.0, 0.5);
        // 0.30 + 0 + 0 + 0.10
        assert!((axes.overall() - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_overall_score_is_idempotent() {
        let argument = StructuredArgument::new("All swans are white", ArgumentType::Inductive);
        let scored = ScoredArgument::new(argument, ScoreAxes::new(0.7, 0.35, 0.9, 0.6));
        assert_eq!(scored.recompute_overall(), scored.overall_score);
        let again = ScoredArgument::new(scored.argument.clone(), scored.axes());
        assert_eq!(again.overall_score, scored.overall_score);
    }

    #[test]
    fn test_axes_are_clamped() {
        let axes = ScoreAxes::new(1.5, -0.2, f64::NAN, 0.3);
        assert_eq!(axes.logical_strength, 1.0);
        assert_eq!(axes.evidence_quality, 0.0);
        assert_eq!(axes.vulnerability, NEUTRAL_SCORE);
        let overall = axes.overall();
        assert!((0.0..=1.0).contains(&overall));
    }

    #[test]
    fn test_argument_type_lenient_parse() {
        assert_eq!(ArgumentType::parse_lenient("Moral"), ArgumentType::Ethical);
        assert_eq!(ArgumentType::parse_lenient("empirical"), ArgumentType::Empirical);
        assert_eq!(ArgumentType::parse_lenient("rhetorical"), ArgumentType::Unknown);
    }
}
