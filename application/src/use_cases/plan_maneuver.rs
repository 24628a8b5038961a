//! Plan Maneuver use case
//!
//! Builds attack, defense, follow-up and opening plans once a strategy has
//! been chosen: spends the retrieval call when the RAG decision says so and
//! asks the model for a rhetorical payload, falling back to a fixed payload
//! when the reply is unusable.
//!
//! Retrieval fans out to every configured [`SearchProvider`] in parallel.
//! Each task returns its own snippets; the planner merges them
//! deterministically (relevance descending, then provider order).

use crate::ports::language_model::{GenerationConfig, LanguageModel};
use crate::ports::search_provider::SearchProvider;
use crate::use_cases::shared::generate_or_empty;
use agora_domain::strategy::plans::merge_snippets;
use agora_domain::strategy::rag::{self, build_query};
use agora_domain::{
    AttackPlan, AttackStrategy, DebatePromptTemplate, DefensePlan, DefenseStrategy,
    EvidenceSnippet, FollowupPlan, FollowupStrategy, ParseOutcome, PhilosopherProfile,
    RagDecision, RhetoricalPayload, Role, ScoredArgument, StrategyKind, parse_payload,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Core line and evidence for an opening argument
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningPreparation {
    pub core: RhetoricalPayload,
    pub evidence: Vec<EvidenceSnippet>,
}

/// Turns selected strategies into plans
pub struct ManeuverPlanner {
    model: Arc<dyn LanguageModel>,
    search_providers: Vec<Arc<dyn SearchProvider>>,
    config: GenerationConfig,
    max_results: usize,
    cancellation_token: Option<CancellationToken>,
}

impl ManeuverPlanner {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search_providers: Vec<Arc<dyn SearchProvider>>,
        config: &GenerationConfig,
        max_results: usize,
    ) -> Self {
        Self {
            model,
            search_providers,
            config: config.analytical(),
            max_results,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancellation_token = token;
        self
    }

    pub async fn plan_attack(
        &self,
        profile: &PhilosopherProfile,
        strategy: AttackStrategy,
        target_speaker: &str,
        target: ScoredArgument,
    ) -> AttackPlan {
        let rag_decision = rag::decide_attack(strategy, profile, &target.argument);
        let evidence = self
            .retrieve_if(&rag_decision, strategy, &target.argument.claim)
            .await;
        let payload = self
            .payload(profile, strategy, &target.argument.claim, &evidence)
            .await;
        AttackPlan {
            strategy,
            target_speaker: target_speaker.to_string(),
            target,
            rag_decision,
            evidence,
            payload,
        }
    }

    pub async fn plan_defense(
        &self,
        profile: &PhilosopherProfile,
        strategy: DefenseStrategy,
        context: &str,
        attack_used_rag: bool,
    ) -> DefensePlan {
        let rag_decision = rag::decide_defense(strategy, profile, attack_used_rag);
        let evidence = self.retrieve_if(&rag_decision, strategy, context).await;
        let payload = self.payload(profile, strategy, context, &evidence).await;
        DefensePlan {
            strategy,
            context: context.to_string(),
            rag_decision,
            evidence,
            payload,
        }
    }

    pub async fn plan_followup(
        &self,
        profile: &PhilosopherProfile,
        strategy: FollowupStrategy,
        context: &str,
        defense_used_rag: bool,
    ) -> FollowupPlan {
        let rag_decision = rag::decide_followup(strategy, profile, defense_used_rag);
        let evidence = self.retrieve_if(&rag_decision, strategy, context).await;
        let payload = self.payload(profile, strategy, context, &evidence).await;
        FollowupPlan {
            strategy,
            context: context.to_string(),
            rag_decision,
            evidence,
            payload,
        }
    }

    /// Prepare an opening argument
    ///
    /// The core-argument task and the retrieval tasks run concurrently and
    /// are joined before the utterance is generated.
    pub async fn prepare_opening(
        &self,
        profile: &PhilosopherProfile,
        role: Role,
        topic: &str,
    ) -> OpeningPreparation {
        let core_task = async {
            let reply = generate_or_empty(
                self.model.as_ref(),
                DebatePromptTemplate::planning_system(),
                &DebatePromptTemplate::opening_plan_prompt(&profile.name, role, topic),
                &self.config,
                &self.cancellation_token,
            )
            .await;
            parse_payload(&reply, || RhetoricalPayload {
                approach: format!("Argue {} the motion \"{}\"", side(role), topic),
                key_points: Vec::new(),
            })
            .into_inner()
        };
        let query = format!("{} {}", topic, profile.name);
        let (core, evidence) = tokio::join!(core_task, self.retrieve(&query));
        info!(
            debater = %profile.name,
            snippets = evidence.len(),
            "Opening prepared"
        );
        OpeningPreparation { core, evidence }
    }

    /// Query every provider in parallel and merge the results
    pub async fn retrieve(&self, query: &str) -> Vec<EvidenceSnippet> {
        if self.search_providers.is_empty() {
            return Vec::new();
        }

        let mut join_set = JoinSet::new();
        for (order, provider) in self.search_providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let query = query.to_string();
            let k = self.max_results;
            join_set.spawn(async move {
                let result = provider.search(&query, k).await;
                (order, provider.name().to_string(), result)
            });
        }

        let mut batches: Vec<(usize, Vec<EvidenceSnippet>)> = Vec::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((order, name, Ok(snippets))) => {
                    debug!(provider = %name, count = snippets.len(), "Search completed");
                    batches.push((order, snippets));
                }
                Ok((_, name, Err(e))) => {
                    warn!("Search provider {} failed: {}", name, e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        // Completion order is arbitrary; merge in provider order
        batches.sort_by_key(|(order, _)| *order);
        merge_snippets(
            batches.into_iter().map(|(_, s)| s).collect(),
            self.max_results,
        )
    }

    async fn retrieve_if<K: StrategyKind>(
        &self,
        decision: &RagDecision,
        strategy: K,
        text: &str,
    ) -> Vec<EvidenceSnippet> {
        debug!(
            strategy = strategy.as_str(),
            score = decision.rag_score,
            threshold = decision.threshold,
            use_rag = decision.use_rag,
            "RAG decision"
        );
        if !decision.use_rag {
            return Vec::new();
        }
        self.retrieve(&build_query(strategy, text)).await
    }

    async fn payload<K: StrategyKind>(
        &self,
        profile: &PhilosopherProfile,
        strategy: K,
        target: &str,
        evidence: &[EvidenceSnippet],
    ) -> RhetoricalPayload {
        let reply = generate_or_empty(
            self.model.as_ref(),
            DebatePromptTemplate::planning_system(),
            &DebatePromptTemplate::planning_prompt(&profile.name, strategy, target, evidence),
            &self.config,
            &self.cancellation_token,
        )
        .await;
        match parse_payload(&reply, || RhetoricalPayload::fallback(strategy, target)) {
            ParseOutcome::Parsed(payload) => payload,
            ParseOutcome::Fallback(payload) => {
                debug!(strategy = strategy.as_str(), "Plan fell back to fixed payload");
                payload
            }
        }
    }
}

fn side(role: Role) -> &'static str {
    match role {
        Role::Con => "against",
        _ => "for",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::test_support::{FixedSearch, ScriptedModel};
    use agora_domain::{ArgumentType, ScoreAxes, StructuredArgument};

    fn planner(model: ScriptedModel, search: Vec<Arc<dyn SearchProvider>>) -> ManeuverPlanner {
        ManeuverPlanner::new(Arc::new(model), search, &GenerationConfig::default(), 5)
    }

    fn eager_profile() -> PhilosopherProfile {
        let mut profile = PhilosopherProfile::neutral("Hume");
        profile.rag_affinity = 1.0;
        profile
    }

    #[tokio::test]
    async fn test_retrieve_merges_by_relevance_and_survives_failures() {
        let planner = planner(
            ScriptedModel::failing(),
            vec![
                Arc::new(FixedSearch::new("web", vec![("w1", 0.5), ("w2", 0.9)])),
                Arc::new(FixedSearch::failing("corpus")),
                Arc::new(FixedSearch::new("history", vec![("h1", 0.9), ("h2", 0.1)])),
            ],
        );
        let merged = planner.retrieve("free will").await;
        let contents: Vec<_> = merged.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["w2", "h1", "w1", "h2"]);
    }

    #[tokio::test]
    async fn test_retrieve_is_capped() {
        let many: Vec<(&str, f64)> = vec![("a", 0.1), ("b", 0.2), ("c", 0.3), ("d", 0.4)];
        let planner = ManeuverPlanner::new(
            Arc::new(ScriptedModel::failing()),
            vec![
                Arc::new(FixedSearch::new("one", many.clone())),
                Arc::new(FixedSearch::new("two", vec![("e", 0.5), ("f", 0.6)])),
            ],
            &GenerationConfig::default(),
            5,
        );
        assert_eq!(planner.retrieve("q").await.len(), 5);
    }

    #[tokio::test]
    async fn test_attack_plan_retrieves_when_decided() {
        let search = Arc::new(FixedSearch::new("web", vec![("Black swans exist", 0.8)]));
        let planner = planner(
            ScriptedModel::new(vec![
                r#"{"approach": "Point at black swans", "key_points": ["Australia"]}"#,
            ]),
            vec![search.clone()],
        );
        let target = ScoredArgument::new(
            StructuredArgument::new("All swans are white", ArgumentType::Inductive)
                .with_evidence("centuries of observation"),
            ScoreAxes::neutral(),
        );
        // 0.8 (temporal delay) × 1.0 × 0.7 ≥ 0.3
        let plan = planner
            .plan_attack(&eager_profile(), AttackStrategy::TemporalDelay, "kant", target)
            .await;
        assert!(plan.rag_decision.use_rag);
        assert_eq!(plan.evidence.len(), 1);
        assert_eq!(plan.payload.approach, "Point at black swans");
        let queries = search.queries.lock().unwrap();
        assert_eq!(queries[0], "long-term evidence on swans white");
    }

    #[tokio::test]
    async fn test_defense_plan_skips_retrieval_below_threshold() {
        let search = Arc::new(FixedSearch::new("web", vec![("x", 0.8)]));
        let planner = planner(ScriptedModel::failing(), vec![search.clone()]);
        let mut profile = PhilosopherProfile::neutral("Kant");
        profile.rag_affinity = 0.5;
        // 0.2 × 0.5 × 0.3 < 0.3
        let plan = planner
            .plan_defense(&profile, DefenseStrategy::Accept, "Your ethics is rigid", false)
            .await;
        assert!(!plan.rag_decision.use_rag);
        assert!(plan.evidence.is_empty());
        assert!(search.queries.lock().unwrap().is_empty());
        // Model failed, so the fixed payload is used
        assert_eq!(plan.payload.approach, DefenseStrategy::Accept.description());
    }

    #[tokio::test]
    async fn test_prepare_opening_joins_core_and_retrieval() {
        let planner = planner(
            ScriptedModel::new(vec![r#"{"approach": "Duty binds all", "key_points": ["a", "b"]}"#]),
            vec![Arc::new(FixedSearch::new("web", vec![("snippet", 0.4)]))],
        );
        let profile = PhilosopherProfile::builtin("kant").unwrap();
        let prepared = planner
            .prepare_opening(&profile, Role::Pro, "Lying is wrong")
            .await;
        assert_eq!(prepared.core.approach, "Duty binds all");
        assert_eq!(prepared.evidence.len(), 1);
    }

    #[tokio::test]
    async fn test_prepare_opening_fallback() {
        let planner = planner(ScriptedModel::failing(), Vec::new());
        let profile = PhilosopherProfile::neutral("Anon");
        let prepared = planner
            .prepare_opening(&profile, Role::Con, "Lying is wrong")
            .await;
        assert!(prepared.core.approach.contains("against"));
        assert!(prepared.evidence.is_empty());
    }
}
