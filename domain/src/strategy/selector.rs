//! Weighted strategy selection
//!
//! All three selectors follow the same steps:
//!
//! 1. Build context keys for the situation
//! 2. Look the keys up in the candidate table (the default pair when nothing matches)
//! 3. Weight each candidate from the philosopher's table ([`DEFAULT_STRATEGY_WEIGHT`]
//!    when the profile does not mention it)
//! 4. Draw once against the cumulative distribution
//!
//! The random source is passed in, so a seeded RNG reproduces every draw.

use crate::argument::entities::StructuredArgument;
use crate::philosopher::profile::PhilosopherProfile;
use crate::strategy::candidates::{
    EmotionState, StrategyCandidateTable, attack_context_keys, default_candidates,
    defense_context_key, followup_context_key,
};
use crate::strategy::kinds::{AttackStrategy, DefenseStrategy, FollowupStrategy, StrategyKind};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Weight of a candidate the profile does not mention
pub const DEFAULT_STRATEGY_WEIGHT: f64 = 0.1;

/// Weight actually used for sampling: negative, NaN and infinite values count as zero
pub fn effective_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Pick one item given weights and a uniform draw in `[0, 1)`.
///
/// Weights go through [`effective_weight`]. When the total weight is zero the
/// first item is returned without sampling. Returns `None` only for an empty
/// slice.
pub fn weighted_choice<T>(weighted: &[(T, f64)], draw: f64) -> Option<&T> {
    let (first, _) = weighted.first()?;
    let total: f64 = weighted.iter().map(|(_, w)| effective_weight(*w)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(first);
    }

    let target = draw.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = first;
    for (item, w) in weighted {
        let w = effective_weight(*w);
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = item;
        if target < cumulative {
            return Some(item);
        }
    }
    // Rounding can leave `target` equal to the total
    Some(last_positive)
}

/// Result of one selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<K> {
    pub strategy: K,
    /// Table key that produced the candidates; `None` when the default pair was used
    pub context_key: Option<String>,
    /// Candidates with their normalized probabilities
    pub distribution: Vec<(K, f64)>,
}

impl<K: StrategyKind> Selection<K> {
    pub fn used_default_pair(&self) -> bool {
        self.context_key.is_none()
    }

    pub fn probability_of(&self, strategy: K) -> f64 {
        self.distribution
            .iter()
            .find(|(k, _)| *k == strategy)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }
}

/// Selects attack, defense and follow-up strategies
#[derive(Clone)]
pub struct StrategySelector {
    table: Arc<dyn StrategyCandidateTable>,
}

impl std::fmt::Debug for StrategySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategySelector").finish_non_exhaustive()
    }
}

impl StrategySelector {
    pub fn new(table: Arc<dyn StrategyCandidateTable>) -> Self {
        Self { table }
    }

    pub fn select_attack<R: Rng + ?Sized>(
        &self,
        profile: &PhilosopherProfile,
        target: &StructuredArgument,
        rng: &mut R,
    ) -> Selection<AttackStrategy> {
        let keys = attack_context_keys(target);
        let (candidates, context_key) = self.candidates::<AttackStrategy>(&keys);
        let claim = target.claim.to_lowercase();
        let weighted: Vec<(AttackStrategy, f64)> = candidates
            .into_iter()
            .map(|s| (s, weight_for(profile, s) * lexical_boost(s, &claim)))
            .collect();
        self.draw(weighted, context_key, rng)
    }

    /// `incoming` is `None` when the answered move has no known strategy
    pub fn select_defense<R: Rng + ?Sized>(
        &self,
        profile: &PhilosopherProfile,
        incoming: Option<AttackStrategy>,
        attack_used_rag: bool,
        emotion: EmotionState,
        rng: &mut R,
    ) -> Selection<DefenseStrategy> {
        let keys: Vec<String> = incoming
            .map(|attack| defense_context_key(attack, attack_used_rag, emotion))
            .into_iter()
            .collect();
        let (candidates, context_key) = self.candidates::<DefenseStrategy>(&keys);
        let weighted = candidates
            .into_iter()
            .map(|s| (s, weight_for(profile, s)))
            .collect();
        self.draw(weighted, context_key, rng)
    }

    pub fn select_followup<R: Rng + ?Sized>(
        &self,
        profile: &PhilosopherProfile,
        defense: Option<DefenseStrategy>,
        defense_used_rag: bool,
        emotion: EmotionState,
        rng: &mut R,
    ) -> Selection<FollowupStrategy> {
        let keys: Vec<String> = defense
            .map(|d| followup_context_key(d, defense_used_rag, emotion))
            .into_iter()
            .collect();
        let (candidates, context_key) = self.candidates::<FollowupStrategy>(&keys);
        let weighted = candidates
            .into_iter()
            .map(|s| (s, weight_for(profile, s)))
            .collect();
        self.draw(weighted, context_key, rng)
    }

    /// First key whose entry names at least one known strategy wins
    fn candidates<K: StrategyKind>(&self, keys: &[String]) -> (Vec<K>, Option<String>) {
        for key in keys {
            let Some(names) = self.table.lookup(K::FAMILY, key) else {
                continue;
            };
            let candidates: Vec<K> = names.iter().filter_map(|n| K::from_name(n)).collect();
            if !candidates.is_empty() {
                return (candidates, Some(key.clone()));
            }
        }
        debug!(family = %K::FAMILY, ?keys, "No candidate entry, using default pair");
        (default_candidates::<K>().to_vec(), None)
    }

    fn draw<K: StrategyKind, R: Rng + ?Sized>(
        &self,
        weighted: Vec<(K, f64)>,
        context_key: Option<String>,
        rng: &mut R,
    ) -> Selection<K> {
        let total: f64 = weighted.iter().map(|(_, w)| effective_weight(*w)).sum();
        let distribution: Vec<(K, f64)> = weighted
            .iter()
            .enumerate()
            .map(|(i, (k, w))| {
                let p = if total > 0.0 && total.is_finite() {
                    effective_weight(*w) / total
                } else if i == 0 {
                    1.0
                } else {
                    0.0
                };
                (*k, p)
            })
            .collect();

        let draw: f64 = rng.random();
        let strategy = weighted_choice(&weighted, draw)
            .copied()
            .unwrap_or(default_candidates::<K>()[0]);

        debug!(
            family = %K::FAMILY,
            strategy = strategy.as_str(),
            context_key = context_key.as_deref().unwrap_or("default"),
            "Strategy selected"
        );

        Selection {
            strategy,
            context_key,
            distribution,
        }
    }
}

fn weight_for<K: StrategyKind>(profile: &PhilosopherProfile, strategy: K) -> f64 {
    profile
        .weight_of(strategy)
        .unwrap_or(DEFAULT_STRATEGY_WEIGHT)
}

/// Small multiplicative nudge when the claim's wording suits a strategy
fn lexical_boost(strategy: AttackStrategy, claim: &str) -> f64 {
    let has_any = |cues: &[&str]| {
        claim
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| cues.contains(&w))
    };
    match strategy {
        AttackStrategy::Clipping if has_any(&["all", "every", "always", "never"]) => 1.3,
        AttackStrategy::ConceptualUndermining if has_any(&["means", "essence", "true", "real"]) => {
            1.4
        }
        AttackStrategy::EthicalReversal if has_any(&["should", "ought", "good", "right"]) => 1.3,
        AttackStrategy::TemporalDelay if has_any(&["will", "future", "soon", "progress"]) => 1.2,
        AttackStrategy::ReductiveParadox if has_any(&["therefore", "thus", "hence"]) => 1.2,
        AttackStrategy::FramingShift if has_any(&["society", "people", "we"]) => 1.1,
        AttackStrategy::PhilosophicalReframing if has_any(&["freedom", "truth", "nature"]) => 1.1,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::entities::ArgumentType;
    use crate::strategy::candidates::DefaultCandidateTable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selector() -> StrategySelector {
        StrategySelector::new(Arc::new(DefaultCandidateTable::new()))
    }

    #[test]
    fn test_all_zero_weights_return_first() {
        let weighted = vec![("A", 0.0), ("B", 0.0)];
        for draw in [0.0, 0.3, 0.999] {
            assert_eq!(weighted_choice(&weighted, draw), Some(&"A"));
        }
    }

    #[test]
    fn test_empty_list() {
        let weighted: Vec<(&str, f64)> = Vec::new();
        assert_eq!(weighted_choice(&weighted, 0.5), None);
    }

    #[test]
    fn test_zero_weight_items_never_drawn() {
        let weighted = vec![("A", 0.0), ("B", 1.0), ("C", 0.0)];
        for draw in [0.0, 0.5, 1.0] {
            assert_eq!(weighted_choice(&weighted, draw), Some(&"B"));
        }
    }

    #[test]
    fn test_weighted_draw_converges() {
        let weighted = vec![("A", 0.2), ("B", 0.3), ("C", 0.5)];
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..samples {
            let draw: f64 = rng.random();
            match *weighted_choice(&weighted, draw).unwrap() {
                "A" => counts[0] += 1,
                "B" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        for (count, expected) in counts.iter().zip([0.2, 0.3, 0.5]) {
            let observed = *count as f64 / samples as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "observed {} expected {}",
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_non_finite_weights_count_as_zero() {
        let weighted = vec![("A", f64::INFINITY), ("B", 1.0), ("C", f64::NAN)];
        for draw in [0.0, 0.5, 0.999] {
            assert_eq!(weighted_choice(&weighted, draw), Some(&"B"));
        }
        assert_eq!(effective_weight(f64::NEG_INFINITY), 0.0);
        assert_eq!(effective_weight(-0.5), 0.0);
        assert_eq!(effective_weight(0.25), 0.25);
    }

    #[test]
    fn test_infinite_profile_weight_keeps_distribution_finite() {
        let mut profile = PhilosopherProfile::neutral("x");
        profile
            .defense_weights
            .insert("clarify".to_string(), f64::INFINITY);
        let selector = StrategySelector::new(Arc::new(DefaultCandidateTable::empty()));
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            let selection = selector.select_defense(
                &profile,
                None,
                false,
                EmotionState::Neutral,
                &mut rng,
            );
            assert!(selection.distribution.iter().all(|(_, p)| p.is_finite()));
            assert_eq!(selection.probability_of(DefenseStrategy::Clarify), 0.0);
            assert_eq!(selection.probability_of(DefenseStrategy::Refute), 1.0);
            assert_eq!(selection.strategy, DefenseStrategy::Refute);
        }
    }

    #[test]
    fn test_attack_draws_follow_normalized_weights() {
        // clipping 0.3 boosted by "all", reductive_paradox at the default weight
        let mut profile = PhilosopherProfile::neutral("x");
        profile.strategy_weights.insert("clipping".to_string(), 0.3);
        let target = StructuredArgument::new("All men are mortal", ArgumentType::Unknown);
        let clipping_weight = 0.3 * 1.3;
        let expected = clipping_weight / (clipping_weight + DEFAULT_STRATEGY_WEIGHT);

        let selector = selector();
        let mut rng = StdRng::seed_from_u64(2024);
        let samples = 5_000;
        let mut clipping = 0usize;
        for _ in 0..samples {
            let selection = selector.select_attack(&profile, &target, &mut rng);
            assert_eq!(selection.context_key.as_deref(), Some("absolute_claim"));
            let p = selection.probability_of(AttackStrategy::Clipping);
            assert!((p - expected).abs() < 1e-9);
            match selection.strategy {
                AttackStrategy::Clipping => clipping += 1,
                AttackStrategy::ReductiveParadox => {}
                other => panic!("unexpected strategy {}", other.as_str()),
            }
        }
        let observed = clipping as f64 / samples as f64;
        assert!(
            (observed - expected).abs() < 0.03,
            "observed {} expected {}",
            observed,
            expected
        );
    }

    #[test]
    fn test_zero_weight_profile_on_default_pair() {
        let mut profile = PhilosopherProfile::neutral("x");
        profile.defense_weights.insert("clarify".to_string(), 0.0);
        profile.defense_weights.insert("refute".to_string(), 0.0);
        let selector = StrategySelector::new(Arc::new(DefaultCandidateTable::empty()));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let selection = selector.select_defense(
                &profile,
                Some(AttackStrategy::Clipping),
                false,
                EmotionState::Neutral,
                &mut rng,
            );
            assert!(selection.used_default_pair());
            assert_eq!(selection.strategy, DefenseStrategy::Clarify);
            assert_eq!(selection.probability_of(DefenseStrategy::Clarify), 1.0);
        }
    }

    #[test]
    fn test_selection_is_reproducible_with_seed() {
        let profile = PhilosopherProfile::builtin("nietzsche").unwrap();
        let target = StructuredArgument::new(
            "We should always tell the truth",
            ArgumentType::Ethical,
        );
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| selector().select_attack(&profile, &target, &mut rng).strategy)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_attack_selection_uses_table_and_profile() {
        let profile = PhilosopherProfile::builtin("kant").unwrap();
        let target = StructuredArgument::new("Pleasure is pleasant", ArgumentType::Ethical);
        let mut rng = StdRng::seed_from_u64(3);
        let selection = selector().select_attack(&profile, &target, &mut rng);
        assert_eq!(selection.context_key.as_deref(), Some("type:ethical"));
        // ethical_reversal 0.9 vs philosophical_reframing default 0.1
        let p = selection.probability_of(AttackStrategy::EthicalReversal);
        assert!((p - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_lexical_boost_nudges_without_filtering() {
        let profile = PhilosopherProfile::neutral("x");
        let target = StructuredArgument::new("All men are mortal", ArgumentType::Unknown);
        let mut rng = StdRng::seed_from_u64(3);
        let selection = selector().select_attack(&profile, &target, &mut rng);
        assert_eq!(selection.context_key.as_deref(), Some("absolute_claim"));
        let clipping = selection.probability_of(AttackStrategy::Clipping);
        let paradox = selection.probability_of(AttackStrategy::ReductiveParadox);
        assert!(clipping > paradox);
        assert!(paradox > 0.0);
    }

    #[test]
    fn test_unmapped_attack_uses_default_pair() {
        let profile = PhilosopherProfile::neutral("x");
        let target = StructuredArgument::new("Cats are pleasant", ArgumentType::Unknown);
        let mut rng = StdRng::seed_from_u64(11);
        let selection = selector().select_attack(&profile, &target, &mut rng);
        assert!(selection.used_default_pair());
        assert!(matches!(
            selection.strategy,
            AttackStrategy::Clipping | AttackStrategy::ConceptualUndermining
        ));
    }

    #[test]
    fn test_unknown_incoming_uses_default_pair() {
        let profile = PhilosopherProfile::neutral("x");
        let mut rng = StdRng::seed_from_u64(2);
        let selection =
            selector().select_followup(&profile, None, false, EmotionState::Neutral, &mut rng);
        assert!(selection.used_default_pair());
        assert!(matches!(
            selection.strategy,
            FollowupStrategy::FollowupQuestion | FollowupStrategy::Reattack
        ));
    }

    #[test]
    fn test_followup_selection_keyed_by_defense() {
        let profile = PhilosopherProfile::builtin("socrates").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let selection = selector().select_followup(
            &profile,
            Some(DefenseStrategy::Clarify),
            true,
            EmotionState::Confident,
            &mut rng,
        );
        assert_eq!(
            selection.context_key.as_deref(),
            Some("clarify|rag|confident")
        );
        let total: f64 = selection.distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
