//! Run Debate use case
//!
//! Drives a debate one turn at a time. Each turn resolves the speaker,
//! builds the maneuver the stage calls for, realizes it as text and hands the
//! record to the state machine. Turns are strictly serialized; only the work
//! inside one turn (analysis, retrieval) runs concurrently.
//!
//! Nothing that goes wrong while building a single maneuver aborts the turn:
//! a failed or cancelled generation becomes a fixed fallback utterance. Only
//! illegal calls (a turn after completion) surface as errors.

use crate::config::DebateParams;
use crate::ports::human_input::{HumanInputError, HumanInputPort};
use crate::ports::language_model::LanguageModel;
use crate::ports::profile_store::{PhilosopherProfileStore, ProfileStoreError};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::search_provider::SearchProvider;
use crate::use_cases::analyze_arguments::ArgumentAnalyzer;
use crate::use_cases::history_search::HistorySearch;
use crate::use_cases::plan_maneuver::ManeuverPlanner;
use crate::use_cases::shared::{generate_or_empty, is_cancelled};
use agora_domain::config::validation::{has_errors, validate_roster};
use agora_domain::{
    ArgumentStore, ArgumentType, DebatePromptTemplate, DebateState, DebateStateMachine,
    DefaultCandidateTable, DomainError, Maneuver, ManeuverKind, ManeuverRecord, ModeratorScript,
    NextSpeaker, Participants, PhilosopherProfile, Role, ScoreAxes, ScoredArgument, Severity,
    SpeakerResolver, Stage, StageOwner, StrategyCandidateTable, StrategyKind, StrategySelector,
    StructuredArgument, Topic, TransitionKind, TurnRecord, fallback_utterance,
};
use chrono::Utc;
use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Debate error: {0}")]
    Domain(#[from] DomainError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileStoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Input for the RunDebate use case
///
/// Camp members are profile keys; human members keep their id as their name.
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub debate_id: String,
    pub topic: Topic,
    pub moderator: String,
    pub pro: Vec<String>,
    pub con: Vec<String>,
    /// Camp members whose turns come from a person
    pub humans: Vec<String>,
    /// Audience members; registered, never given the floor
    pub users: Vec<String>,
}

impl RunDebateInput {
    pub fn new(topic: Topic) -> Self {
        Self {
            debate_id: format!("debate-{}", Utc::now().format("%Y%m%d-%H%M%S")),
            topic,
            moderator: "moderator".to_string(),
            pro: Vec::new(),
            con: Vec::new(),
            humans: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn with_debate_id(mut self, debate_id: impl Into<String>) -> Self {
        self.debate_id = debate_id.into();
        self
    }

    pub fn with_moderator(mut self, moderator: impl Into<String>) -> Self {
        self.moderator = moderator.into();
        self
    }

    pub fn with_pro(mut self, id: impl Into<String>) -> Self {
        self.pro.push(id.into());
        self
    }

    pub fn with_con(mut self, id: impl Into<String>) -> Self {
        self.con.push(id.into());
        self
    }

    pub fn with_human(mut self, id: impl Into<String>) -> Self {
        self.humans.push(id.into());
        self
    }

    pub fn with_user(mut self, id: impl Into<String>) -> Self {
        self.users.push(id.into());
        self
    }
}

/// Result of an externally submitted message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub accepted: bool,
    /// Stage after the submission (unchanged when rejected)
    pub new_stage: Stage,
}

/// One turn produced by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub record: TurnRecord,
    /// `None` for moderator and human turns
    pub maneuver: Option<Maneuver>,
    pub used_rag: bool,
    pub new_stage: Stage,
}

/// Output of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunDebateOutput {
    pub topic: String,
    pub state: DebateState,
    pub maneuvers: Vec<ManeuverRecord>,
    /// Participant id → display name
    pub names: BTreeMap<String, String>,
    /// True when the run stopped before the debate completed
    pub cancelled: bool,
}

/// Root of the debate engine
pub struct DebateOrchestrator {
    topic: Topic,
    machine: DebateStateMachine,
    profiles: BTreeMap<String, PhilosopherProfile>,
    store: ArgumentStore,
    selector: StrategySelector,
    rng: StdRng,
    model: Arc<dyn LanguageModel>,
    search_providers: Vec<Arc<dyn SearchProvider>>,
    /// Add a [`HistorySearch`] over the transcript to every retrieval
    history_search: bool,
    human_input: Option<Arc<dyn HumanInputPort>>,
    progress: Arc<dyn DebateProgressNotifier>,
    params: DebateParams,
    cancellation_token: Option<CancellationToken>,
}

impl DebateOrchestrator {
    pub fn new(
        input: RunDebateInput,
        model: Arc<dyn LanguageModel>,
        profile_store: &dyn PhilosopherProfileStore,
        params: DebateParams,
    ) -> Result<Self, RunDebateError> {
        let issues = validate_roster(
            &input.pro,
            &input.con,
            &input.humans,
            params.limits.qa_turns,
            params.limits.interactive_turns,
        );
        for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
            warn!("{}", issue.message);
        }
        if has_errors(&issues) {
            let messages: Vec<&str> = issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .map(|i| i.message.as_str())
                .collect();
            return Err(RunDebateError::InvalidConfiguration(messages.join("; ")));
        }

        let mut participants = Participants::new(input.moderator.as_str());
        for id in &input.pro {
            participants.add(Role::Pro, id.as_str())?;
        }
        for id in &input.con {
            participants.add(Role::Con, id.as_str())?;
        }
        for id in &input.users {
            participants.add(Role::User, id.as_str())?;
        }
        for id in &input.humans {
            if participants.role_of(id).is_some_and(|role| role.is_camp()) {
                participants.mark_human(id)?;
            }
        }

        let mut profiles = BTreeMap::new();
        for id in input.pro.iter().chain(&input.con) {
            let profile = if participants.is_human(id) {
                PhilosopherProfile::neutral(id.as_str())
            } else {
                match profile_store.load(id) {
                    Ok(profile) => profile.sanitized(),
                    Err(ProfileStoreError::NotFound(key)) => {
                        warn!("No profile for '{}', using a neutral profile", key);
                        PhilosopherProfile::neutral(id.as_str())
                    }
                    Err(e) => return Err(e.into()),
                }
            };
            profiles.insert(id.clone(), profile);
        }

        info!(
            "Debate {} on \"{}\": {} pro, {} con, {} human",
            input.debate_id,
            input.topic,
            input.pro.len(),
            input.con.len(),
            input.humans.len()
        );

        Ok(Self {
            machine: DebateStateMachine::new(input.debate_id, participants, params.limits),
            topic: input.topic,
            profiles,
            store: ArgumentStore::new(),
            selector: StrategySelector::new(Arc::new(DefaultCandidateTable::new())),
            rng: seeded_rng(params.seed),
            model,
            search_providers: Vec::new(),
            history_search: false,
            human_input: None,
            progress: Arc::new(NoProgress),
            params,
            cancellation_token: None,
        })
    }

    // ==================== Builder Methods ====================

    pub fn with_search_providers(mut self, providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        self.search_providers = providers;
        self
    }

    /// Also search the debate transcript whenever a maneuver retrieves
    pub fn with_history_search(mut self, enabled: bool) -> Self {
        self.history_search = enabled;
        self
    }

    pub fn with_human_input(mut self, input: Arc<dyn HumanInputPort>) -> Self {
        self.human_input = Some(input);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_candidate_table(mut self, table: Arc<dyn StrategyCandidateTable>) -> Self {
        self.selector = StrategySelector::new(table);
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    // ==================== Caller-facing operations ====================

    pub fn get_next_speaker(&self) -> NextSpeaker {
        SpeakerResolver::resolve(self.machine.state())
    }

    pub fn get_state(&self) -> DebateState {
        self.machine.snapshot()
    }

    pub fn debate_id(&self) -> &str {
        &self.machine.state().debate_id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn maneuvers(&self) -> &[ManeuverRecord] {
        self.store.maneuvers(self.debate_id())
    }

    /// Name a participant goes by on stage
    pub fn display_name(&self, id: &str) -> String {
        self.profiles
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Accept a message from outside the engine
    ///
    /// Only the speaker the resolver names may speak; anyone else is
    /// rejected without touching the state. Fails once the debate is over.
    pub fn submit_message(
        &mut self,
        speaker_id: &str,
        text: impl Into<String>,
    ) -> Result<SubmitOutcome, DomainError> {
        if self.machine.is_completed() {
            return Err(DomainError::AlreadyCompleted);
        }
        let stage = self.machine.current_stage();
        let expected = self.get_next_speaker();
        if expected.speaker_id != speaker_id {
            warn!(
                "Rejected message from '{}': '{}' holds the floor in {}",
                speaker_id, expected.speaker_id, stage
            );
            return Ok(SubmitOutcome {
                accepted: false,
                new_stage: stage,
            });
        }

        let record = TurnRecord::new(speaker_id, expected.role, stage, text);
        let new_stage = self.accept(record, None)?;
        Ok(SubmitOutcome {
            accepted: true,
            new_stage,
        })
    }

    /// Produce and accept the next turn
    pub async fn run_turn(&mut self) -> Result<TurnOutcome, RunDebateError> {
        if self.machine.is_completed() {
            return Err(DomainError::AlreadyCompleted.into());
        }
        let stage = self.machine.current_stage();
        let speaker = self.get_next_speaker();
        self.progress.on_turn_start(stage, &speaker);

        let (text, maneuver) = if speaker.role == Role::Moderator {
            (self.moderator_line(stage), None)
        } else if let Some(port) = self.human_port_for(&speaker.speaker_id) {
            (self.human_turn(port.as_ref(), &speaker, stage).await, None)
        } else {
            let (text, maneuver) = self.debater_turn(&speaker, stage).await;
            (text, Some(maneuver))
        };

        let record = TurnRecord::new(speaker.speaker_id, speaker.role, stage, text);
        let new_stage = self.accept(record.clone(), maneuver)?;
        Ok(TurnOutcome {
            record,
            maneuver: maneuver.map(|(m, _)| m),
            used_rag: maneuver.is_some_and(|(_, used_rag)| used_rag),
            new_stage,
        })
    }

    /// Run turns until the debate completes or the token is cancelled
    ///
    /// Cancellation is checked between turns; an interrupted generation
    /// still yields a (fallback) turn.
    pub async fn run_to_completion(&mut self) -> Result<RunDebateOutput, RunDebateError> {
        let mut cancelled = false;
        while !self.machine.is_completed() {
            if is_cancelled(&self.cancellation_token) {
                info!(
                    "Debate cancelled in {} after {} turns",
                    self.machine.current_stage(),
                    self.machine.state().turn_count
                );
                cancelled = true;
                break;
            }
            self.run_turn().await?;
        }
        Ok(self.output(cancelled))
    }

    /// Start the same debate over from the opening
    ///
    /// Roster, profiles and limits are kept. The transcript and everything
    /// the store holds for this debate are dropped, and a seeded run draws
    /// the same strategies again.
    pub fn reset(&mut self) {
        let state = self.machine.state();
        let debate_id = state.debate_id.clone();
        let participants = state.participants.clone();
        let turns = state.turn_count;
        let limits = self.machine.limits();
        self.store.clear(&debate_id);
        self.machine = DebateStateMachine::new(debate_id.clone(), participants, limits);
        self.rng = seeded_rng(self.params.seed);
        info!("Debate {} reset after {} turns", debate_id, turns);
    }

    pub fn output(&self, cancelled: bool) -> RunDebateOutput {
        let state = self.get_state();
        let mut names = BTreeMap::new();
        for role in [Role::Moderator, Role::Pro, Role::Con, Role::User] {
            for id in state.participants.of(role) {
                names.insert(id.clone(), self.display_name(id));
            }
        }
        RunDebateOutput {
            topic: self.topic.content().to_string(),
            maneuvers: self.maneuvers().to_vec(),
            state,
            names,
            cancelled,
        }
    }

    // ==================== Turn internals ====================

    /// Hand a record to the state machine, log its maneuver and notify
    fn accept(
        &mut self,
        record: TurnRecord,
        maneuver: Option<(Maneuver, bool)>,
    ) -> Result<Stage, DomainError> {
        let turn_index = self.machine.state().speaking_history.len();
        let seen_transitions = self.machine.state().transitions.len();
        let new_stage = self.machine.advance(record.clone())?;

        if let Some((maneuver, used_rag)) = maneuver {
            let debate_id = self.debate_id().to_string();
            self.store.record_maneuver(
                &debate_id,
                ManeuverRecord {
                    turn_index,
                    speaker_id: record.speaker_id.clone(),
                    stage: record.stage,
                    maneuver,
                    used_rag,
                },
            );
        }

        info!(
            turn = turn_index + 1,
            speaker = %record.speaker_id,
            stage = %record.stage,
            "Turn accepted"
        );
        self.progress
            .on_turn_complete(&record, maneuver.as_ref().map(|(m, _)| m));
        for transition in &self.machine.state().transitions[seen_transitions..] {
            match transition.kind {
                TransitionKind::Advanced => {
                    self.progress.on_stage_change(transition.from, transition.to)
                }
                TransitionKind::Skipped => self.progress.on_stage_skipped(transition.from),
            }
        }
        Ok(new_stage)
    }

    fn moderator_line(&self, stage: Stage) -> String {
        ModeratorScript::line(
            stage,
            self.topic.content(),
            &self.machine.state().participants,
            |id| self.display_name(id),
        )
    }

    fn human_port_for(&self, speaker_id: &str) -> Option<Arc<dyn HumanInputPort>> {
        if self.machine.state().participants.is_human(speaker_id) {
            self.human_input.clone()
        } else {
            None
        }
    }

    async fn human_turn(
        &self,
        port: &dyn HumanInputPort,
        speaker: &NextSpeaker,
        stage: Stage,
    ) -> String {
        let state = self.machine.state();
        let reply = match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(HumanInputError::Cancelled),
                    reply = port.request_utterance(&speaker.speaker_id, stage, state) => reply,
                }
            }
            None => port.request_utterance(&speaker.speaker_id, stage, state).await,
        };

        match reply {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => self.human_fallback(speaker, stage),
            Err(e) => {
                warn!("No input from '{}': {}", speaker.speaker_id, e);
                self.human_fallback(speaker, stage)
            }
        }
    }

    fn human_fallback(&self, speaker: &NextSpeaker, stage: Stage) -> String {
        fallback_utterance(
            self.expected_kind(speaker, stage),
            self.topic.content(),
            None,
        )
    }

    /// Move the stage calls for from this speaker
    fn expected_kind(&self, speaker: &NextSpeaker, stage: Stage) -> ManeuverKind {
        if stage.is_argument() {
            return ManeuverKind::Opening;
        }
        if stage.is_rebuttal() {
            return ManeuverKind::Attack;
        }
        if stage.is_conclusion() {
            return ManeuverKind::Conclusion;
        }
        match stage.owner() {
            StageOwner::Qa { answerer, .. } if speaker.role == answerer => ManeuverKind::Defense,
            StageOwner::Qa { .. } => {
                let asked = self
                    .machine
                    .state()
                    .in_stage()
                    .any(|r| r.speaker_id == speaker.speaker_id);
                if asked {
                    ManeuverKind::Followup
                } else {
                    ManeuverKind::Attack
                }
            }
            _ => {
                let previous = self
                    .previous_opponent_turn(speaker.role)
                    .and_then(|(index, _)| self.store.maneuver_at(self.debate_id(), index))
                    .map(|r| r.maneuver.kind());
                ManeuverKind::answering(previous)
            }
        }
    }

    /// Latest in-stage turn by the opposing camp, with its history index
    fn previous_opponent_turn(&self, role: Role) -> Option<(usize, &TurnRecord)> {
        let opponent = role.opponent()?;
        let state = self.machine.state();
        state
            .speaking_history
            .iter()
            .enumerate()
            .rev()
            .find(|(_, r)| r.stage == state.current_stage && r.role == opponent)
    }

    /// Text, maneuver and retrieval flag of the move being answered
    fn incoming_move(&self, role: Role) -> (String, Option<Maneuver>, bool) {
        match self.previous_opponent_turn(role) {
            Some((index, record)) => {
                let logged = self.store.maneuver_at(self.debate_id(), index);
                (
                    record.text.clone(),
                    logged.map(|r| r.maneuver),
                    logged.is_some_and(|r| r.used_rag),
                )
            }
            None => (self.topic.content().to_string(), None, false),
        }
    }

    fn profile_of(&self, speaker_id: &str) -> PhilosopherProfile {
        self.profiles
            .get(speaker_id)
            .cloned()
            .unwrap_or_else(|| PhilosopherProfile::neutral(speaker_id))
    }

    fn analyzer(&self) -> ArgumentAnalyzer {
        ArgumentAnalyzer::new(Arc::clone(&self.model), &self.params.generation)
            .with_cancellation(self.cancellation_token.clone())
    }

    fn planner(&self) -> ManeuverPlanner {
        let mut providers = self.search_providers.clone();
        if self.history_search {
            let turns = self.machine.state().speaking_history.iter().cloned();
            providers.push(Arc::new(HistorySearch::new(turns)));
        }
        ManeuverPlanner::new(
            Arc::clone(&self.model),
            providers,
            &self.params.generation,
            self.params.max_rag_results,
        )
        .with_cancellation(self.cancellation_token.clone())
    }

    /// Build and realize the maneuver of a model-backed debater
    async fn debater_turn(&mut self, speaker: &NextSpeaker, stage: Stage) -> (String, (Maneuver, bool)) {
        let profile = self.profile_of(&speaker.speaker_id);
        let topic = self.topic.content().to_string();
        let emotion = self.params.emotion_of(&speaker.speaker_id);
        let kind = self.expected_kind(speaker, stage);
        let planner = self.planner();

        let (prompt, maneuver, used_rag, target) = match kind {
            ManeuverKind::Opening => {
                let prepared = planner
                    .prepare_opening(&profile, speaker.role, &topic)
                    .await;
                (
                    DebatePromptTemplate::opening_prompt(stage, &prepared.core, &prepared.evidence),
                    Maneuver::Opening,
                    !prepared.evidence.is_empty(),
                    None,
                )
            }
            ManeuverKind::Attack => {
                let (target_speaker, target) = self.attack_target(speaker.role).await;
                let selection =
                    self.selector
                        .select_attack(&profile, &target.argument, &mut self.rng);
                debug!(
                    speaker = %speaker.speaker_id,
                    strategy = selection.strategy.as_str(),
                    context = ?selection.context_key,
                    "Attack selected"
                );
                let plan = planner
                    .plan_attack(&profile, selection.strategy, &target_speaker, target)
                    .await;
                (
                    DebatePromptTemplate::attack_prompt(stage, &plan),
                    Maneuver::Attack(plan.strategy),
                    plan.rag_decision.use_rag,
                    Some(plan.target.argument.claim.clone()),
                )
            }
            ManeuverKind::Defense => {
                let (context, incoming, attack_used_rag) = self.incoming_move(speaker.role);
                let incoming = match incoming {
                    Some(Maneuver::Attack(strategy)) => Some(strategy),
                    _ => None,
                };
                let selection = self.selector.select_defense(
                    &profile,
                    incoming,
                    attack_used_rag,
                    emotion,
                    &mut self.rng,
                );
                debug!(
                    speaker = %speaker.speaker_id,
                    strategy = selection.strategy.as_str(),
                    context = ?selection.context_key,
                    "Defense selected"
                );
                let plan = planner
                    .plan_defense(&profile, selection.strategy, &context, attack_used_rag)
                    .await;
                (
                    DebatePromptTemplate::defense_prompt(stage, &plan),
                    Maneuver::Defense(plan.strategy),
                    plan.rag_decision.use_rag,
                    None,
                )
            }
            ManeuverKind::Followup => {
                let (context, incoming, defense_used_rag) = self.incoming_move(speaker.role);
                let incoming = match incoming {
                    Some(Maneuver::Defense(strategy)) => Some(strategy),
                    _ => None,
                };
                let selection = self.selector.select_followup(
                    &profile,
                    incoming,
                    defense_used_rag,
                    emotion,
                    &mut self.rng,
                );
                debug!(
                    speaker = %speaker.speaker_id,
                    strategy = selection.strategy.as_str(),
                    context = ?selection.context_key,
                    "Follow-up selected"
                );
                let plan = planner
                    .plan_followup(&profile, selection.strategy, &context, defense_used_rag)
                    .await;
                (
                    DebatePromptTemplate::followup_prompt(stage, &plan),
                    Maneuver::Followup(plan.strategy),
                    plan.rag_decision.use_rag,
                    None,
                )
            }
            ManeuverKind::Conclusion => {
                let own: Vec<&str> = self
                    .machine
                    .state()
                    .by_speaker(&speaker.speaker_id)
                    .map(|r| r.text.as_str())
                    .collect();
                (
                    DebatePromptTemplate::conclusion_prompt(stage, &own),
                    Maneuver::Conclusion,
                    false,
                    None,
                )
            }
        };

        let system = DebatePromptTemplate::debater_system(&profile, speaker.role, &topic);
        let text = generate_or_empty(
            self.model.as_ref(),
            &system,
            &prompt,
            &self.params.generation,
            &self.cancellation_token,
        )
        .await;
        let text = if text.is_empty() {
            warn!(
                "Using fallback utterance for '{}' in {}",
                speaker.speaker_id, stage
            );
            fallback_utterance(kind, &topic, target.as_deref())
        } else {
            text
        };

        debug!(
            speaker = %speaker.speaker_id,
            maneuver = %maneuver,
            used_rag,
            "Maneuver realized"
        );
        (text, (maneuver, used_rag))
    }

    /// Pick the claim to attack
    ///
    /// Opponent turns not yet analyzed are extracted and scored first. The
    /// target comes from the most recent opponent speaker's most vulnerable
    /// arguments, preferring one that has not been attacked before.
    async fn attack_target(&mut self, role: Role) -> (String, ScoredArgument) {
        let debate_id = self.debate_id().to_string();
        let Some(opponent) = role.opponent() else {
            return (String::new(), self.topic_target());
        };

        let pending: Vec<(usize, String, String)> = self
            .machine
            .state()
            .speaking_history
            .iter()
            .enumerate()
            .filter(|(i, r)| r.role == opponent && !self.store.is_analyzed(&debate_id, *i))
            .map(|(i, r)| (i, r.speaker_id.clone(), r.text.clone()))
            .collect();
        if !pending.is_empty() {
            let analyzer = self.analyzer();
            let topic = self.topic.content().to_string();
            let analyses =
                join_all(pending.iter().map(|(_, _, text)| analyzer.analyze(&topic, text))).await;
            for ((index, speaker_id, _), scored) in pending.into_iter().zip(analyses) {
                self.store.mark_analyzed(&debate_id, index);
                self.store.append(&debate_id, &speaker_id, scored);
            }
        }

        let Some(target_speaker) = self
            .machine
            .state()
            .last_by_role(opponent)
            .map(|r| r.speaker_id.clone())
        else {
            let fallback_speaker = self
                .machine
                .state()
                .participants
                .first_of(opponent)
                .unwrap_or_default()
                .to_string();
            return (fallback_speaker, self.topic_target());
        };

        let candidates =
            self.store
                .top_vulnerable(&debate_id, &target_speaker, self.params.attack_candidates);
        let chosen = candidates
            .iter()
            .find(|c| {
                !self
                    .store
                    .is_attacked(&debate_id, &target_speaker, &c.argument.claim)
            })
            .or_else(|| candidates.first())
            .map(|c| (*c).clone());

        match chosen {
            Some(target) => {
                self.store
                    .mark_attacked(&debate_id, &target_speaker, &target.argument.claim);
                debug!(
                    target = %target_speaker,
                    vulnerability = target.vulnerability,
                    "Attack target chosen"
                );
                (target_speaker, target)
            }
            None => (target_speaker, self.topic_target()),
        }
    }

    /// Stand-in target when the opponent has said nothing yet
    fn topic_target(&self) -> ScoredArgument {
        ScoredArgument::new(
            StructuredArgument::new(self.topic.content(), ArgumentType::Unknown),
            ScoreAxes::neutral(),
        )
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::human_input::ScriptedHumanInput;
    use crate::ports::profile_store::BuiltinProfileStore;
    use crate::use_cases::shared::test_support::{EchoModel, ScriptedModel};
    use agora_domain::ExchangeLimits;
    use std::sync::Mutex;

    fn topic() -> Topic {
        Topic::try_new("Free will is an illusion").unwrap()
    }

    fn params() -> DebateParams {
        DebateParams::default()
            .with_seed(7)
            .with_limits(ExchangeLimits::new(2, 2))
    }

    fn input() -> RunDebateInput {
        RunDebateInput::new(topic())
            .with_debate_id("d1")
            .with_pro("kant")
            .with_con("nietzsche")
    }

    fn offline(input: RunDebateInput) -> DebateOrchestrator {
        DebateOrchestrator::new(
            input,
            Arc::new(ScriptedModel::failing()),
            &BuiltinProfileStore,
            params(),
        )
        .unwrap()
    }

    #[derive(Default)]
    struct RecordingProgress {
        skipped: Mutex<Vec<Stage>>,
        changes: Mutex<Vec<(Stage, Stage)>>,
        completed: Mutex<usize>,
    }

    impl DebateProgressNotifier for RecordingProgress {
        fn on_turn_start(&self, _stage: Stage, _speaker: &NextSpeaker) {}

        fn on_turn_complete(&self, _record: &TurnRecord, _maneuver: Option<&Maneuver>) {
            *self.completed.lock().unwrap() += 1;
        }

        fn on_stage_change(&self, from: Stage, to: Stage) {
            self.changes.lock().unwrap().push((from, to));
        }

        fn on_stage_skipped(&self, stage: Stage) {
            self.skipped.lock().unwrap().push(stage);
        }
    }

    struct CancelAfterFirstTurn(CancellationToken);

    impl DebateProgressNotifier for CancelAfterFirstTurn {
        fn on_turn_start(&self, _stage: Stage, _speaker: &NextSpeaker) {}

        fn on_turn_complete(&self, _record: &TurnRecord, _maneuver: Option<&Maneuver>) {
            self.0.cancel();
        }
    }

    #[tokio::test]
    async fn test_offline_debate_completes() {
        let mut orchestrator = offline(input());
        let output = orchestrator.run_to_completion().await.unwrap();

        assert!(!output.cancelled);
        assert!(output.state.is_completed());
        // 6 moderator turns, 6 single-speaker turns, 2 interactive, 2 + 2 QA
        assert_eq!(output.state.speaking_history.len(), 18);
        assert_eq!(output.state.turn_count, 18);
        assert!(
            output
                .state
                .speaking_history
                .iter()
                .all(|r| !r.text.trim().is_empty())
        );
        // Every camp turn carries a maneuver
        assert_eq!(output.maneuvers.len(), 12);
        assert_eq!(output.names.get("kant").unwrap(), "Immanuel Kant");
    }

    #[tokio::test]
    async fn test_maneuver_cycle_by_stage() {
        let mut orchestrator = offline(input());
        let output = orchestrator.run_to_completion().await.unwrap();
        let kinds = |stage: Stage| -> Vec<ManeuverKind> {
            output
                .maneuvers
                .iter()
                .filter(|m| m.stage == stage)
                .map(|m| m.maneuver.kind())
                .collect()
        };

        assert_eq!(kinds(Stage::ProArgument), vec![ManeuverKind::Opening]);
        assert_eq!(kinds(Stage::ConRebuttal), vec![ManeuverKind::Attack]);
        assert_eq!(
            kinds(Stage::InteractiveArgument),
            vec![ManeuverKind::Attack, ManeuverKind::Defense]
        );
        assert_eq!(
            kinds(Stage::ConToProQa),
            vec![ManeuverKind::Attack, ManeuverKind::Defense]
        );
        assert_eq!(kinds(Stage::ProConclusion), vec![ManeuverKind::Conclusion]);
    }

    #[tokio::test]
    async fn test_questioner_follows_up_after_defense() {
        let mut orchestrator = DebateOrchestrator::new(
            input(),
            Arc::new(ScriptedModel::failing()),
            &BuiltinProfileStore,
            params().with_limits(ExchangeLimits::new(3, 2)),
        )
        .unwrap();
        let output = orchestrator.run_to_completion().await.unwrap();
        let qa: Vec<(String, ManeuverKind)> = output
            .maneuvers
            .iter()
            .filter(|m| m.stage == Stage::ProToConQa)
            .map(|m| (m.speaker_id.clone(), m.maneuver.kind()))
            .collect();
        assert_eq!(
            qa,
            vec![
                ("kant".to_string(), ManeuverKind::Attack),
                ("nietzsche".to_string(), ManeuverKind::Defense),
                ("kant".to_string(), ManeuverKind::Followup),
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_restarts_the_same_debate() {
        let mut orchestrator = offline(input());
        let first = orchestrator.run_to_completion().await.unwrap();
        let kant_opening = first
            .state
            .speaking_history
            .iter()
            .find(|r| r.stage == Stage::ProArgument)
            .unwrap()
            .text
            .clone();
        assert!(orchestrator.store.is_attacked("d1", "kant", &kant_opening));
        assert!(orchestrator.store.is_analyzed("d1", 1));

        orchestrator.reset();
        let state = orchestrator.get_state();
        assert_eq!(orchestrator.debate_id(), "d1");
        assert_eq!(state.current_stage, Stage::Opening);
        assert_eq!(state.turn_count, 0);
        assert!(state.speaking_history.is_empty());
        assert_eq!(state.participants, first.state.participants);
        assert!(orchestrator.maneuvers().is_empty());
        assert!(!orchestrator.store.is_attacked("d1", "kant", &kant_opening));
        assert!(!orchestrator.store.is_analyzed("d1", 1));
        assert!(orchestrator.store.arguments("d1", "kant").is_empty());

        let second = orchestrator.run_to_completion().await.unwrap();
        let strategies = |output: &RunDebateOutput| -> Vec<Maneuver> {
            output.maneuvers.iter().map(|m| m.maneuver).collect()
        };
        assert_eq!(strategies(&first), strategies(&second));
        assert_eq!(
            first.state.speaking_history.len(),
            second.state.speaking_history.len()
        );
    }

    #[tokio::test]
    async fn test_history_search_feeds_openings() {
        let used_rag = |output: &RunDebateOutput, stage: Stage| {
            output
                .maneuvers
                .iter()
                .find(|m| m.stage == stage)
                .map(|m| m.used_rag)
        };
        let plain = offline(input()).run_to_completion().await.unwrap();
        let with_history = offline(input())
            .with_history_search(true)
            .run_to_completion()
            .await
            .unwrap();

        assert_eq!(used_rag(&plain, Stage::ConArgument), Some(false));
        // Nothing said yet when kant opens; nietzsche finds kant's opening
        assert_eq!(used_rag(&with_history, Stage::ProArgument), Some(false));
        assert_eq!(used_rag(&with_history, Stage::ConArgument), Some(true));
    }

    #[test]
    fn test_scenario_single_pro_participant() {
        let mut orchestrator = offline(input());

        let outcome = orchestrator.submit_message("moderator", "Welcome").unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.new_stage, Stage::ProArgument);
        assert_eq!(
            orchestrator.get_next_speaker(),
            NextSpeaker::new("kant", Role::Pro)
        );

        let outcome = orchestrator.submit_message("kant", "Duty binds.").unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.new_stage, Stage::ConArgument);
        assert_eq!(orchestrator.get_state().speaking_history.len(), 2);
    }

    #[tokio::test]
    async fn test_scenario_con_to_pro_questions() {
        let mut orchestrator = offline(input());
        while orchestrator.get_state().current_stage != Stage::ConToProQa {
            orchestrator.run_turn().await.unwrap();
        }
        assert_eq!(
            orchestrator.get_next_speaker(),
            NextSpeaker::new("nietzsche", Role::Con)
        );
        orchestrator.run_turn().await.unwrap();
        assert_eq!(
            orchestrator.get_next_speaker(),
            NextSpeaker::new("kant", Role::Pro)
        );
    }

    #[test]
    fn test_out_of_turn_and_user_messages_rejected() {
        let mut orchestrator = offline(input().with_user("alice"));
        let before = orchestrator.get_state();

        let outcome = orchestrator.submit_message("alice", "What about me?").unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.new_stage, Stage::Opening);

        let outcome = orchestrator.submit_message("nietzsche", "God is dead").unwrap();
        assert!(!outcome.accepted);

        assert_eq!(orchestrator.get_state(), before);
    }

    #[tokio::test]
    async fn test_completed_debate_rejects_further_turns() {
        let mut orchestrator = offline(input());
        orchestrator.run_to_completion().await.unwrap();
        let before = orchestrator.get_state();

        assert_eq!(
            orchestrator.submit_message("moderator", "One more thing"),
            Err(DomainError::AlreadyCompleted)
        );
        assert!(matches!(
            orchestrator.run_turn().await,
            Err(RunDebateError::Domain(DomainError::AlreadyCompleted))
        ));
        assert_eq!(orchestrator.get_state(), before);
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let strategies = |output: RunDebateOutput| -> Vec<Maneuver> {
            output.maneuvers.into_iter().map(|m| m.maneuver).collect()
        };
        let first = offline(input()).run_to_completion().await.unwrap();
        let second = offline(input()).run_to_completion().await.unwrap();
        assert_eq!(strategies(first), strategies(second));
    }

    #[tokio::test]
    async fn test_generated_text_is_used() {
        let mut orchestrator = DebateOrchestrator::new(
            input(),
            Arc::new(EchoModel("Words.".to_string())),
            &BuiltinProfileStore,
            params(),
        )
        .unwrap();
        let output = orchestrator.run_to_completion().await.unwrap();
        assert!(
            output
                .state
                .speaking_history
                .iter()
                .filter(|r| r.role.is_camp())
                .all(|r| r.text == "Words.")
        );
    }

    #[tokio::test]
    async fn test_human_turns_use_input_port() {
        let input = RunDebateInput::new(topic())
            .with_pro("alice")
            .with_con("kant")
            .with_human("alice");
        let mut orchestrator = DebateOrchestrator::new(
            input,
            Arc::new(ScriptedModel::failing()),
            &BuiltinProfileStore,
            params(),
        )
        .unwrap()
        .with_human_input(Arc::new(ScriptedHumanInput::new(["  I choose freely.  "])));

        let output = orchestrator.run_to_completion().await.unwrap();
        let alice: Vec<&TurnRecord> = output.state.by_speaker("alice").collect();
        assert_eq!(alice[0].text, "I choose freely.");
        // Script exhausted: later turns fall back
        assert!(alice[1..].iter().all(|r| !r.text.is_empty()));
        assert!(output.maneuvers.iter().all(|m| m.speaker_id != "alice"));
        assert_eq!(output.names.get("alice").unwrap(), "alice");
    }

    #[tokio::test]
    async fn test_empty_camp_skips_its_stages() {
        let progress = Arc::new(RecordingProgress::default());
        let mut orchestrator = offline(RunDebateInput::new(topic()).with_pro("kant"))
            .with_progress(progress.clone());
        let output = orchestrator.run_to_completion().await.unwrap();

        assert!(output.state.is_completed());
        let skipped = output.state.skipped_stages();
        assert!(skipped.contains(&Stage::ConArgument));
        assert!(skipped.contains(&Stage::InteractiveArgument));
        assert!(skipped.contains(&Stage::ConConclusion));
        assert_eq!(*progress.skipped.lock().unwrap(), skipped);
        assert_eq!(
            *progress.completed.lock().unwrap(),
            output.state.speaking_history.len()
        );
        assert!(
            output
                .state
                .speaking_history
                .iter()
                .all(|r| r.role != Role::Con)
        );
    }

    #[tokio::test]
    async fn test_stage_changes_are_reported_in_order() {
        let progress = Arc::new(RecordingProgress::default());
        let mut orchestrator = offline(input()).with_progress(progress.clone());
        orchestrator.run_to_completion().await.unwrap();

        let changes = progress.changes.lock().unwrap();
        assert_eq!(changes.first(), Some(&(Stage::Opening, Stage::ProArgument)));
        assert_eq!(changes.last(), Some(&(Stage::Closing, Stage::Completed)));
        assert!(
            changes
                .windows(2)
                .all(|w| w[0].1.index() <= w[1].1.index())
        );
    }

    #[tokio::test]
    async fn test_cancellation_stops_between_turns() {
        let token = CancellationToken::new();
        let mut orchestrator = offline(input())
            .with_cancellation(token.clone())
            .with_progress(Arc::new(CancelAfterFirstTurn(token)));
        let output = orchestrator.run_to_completion().await.unwrap();
        assert!(output.cancelled);
        assert_eq!(output.state.speaking_history.len(), 1);
        assert!(!output.state.is_completed());
    }

    #[test]
    fn test_participant_in_both_camps_is_rejected() {
        let result = DebateOrchestrator::new(
            input().with_con("kant"),
            Arc::new(ScriptedModel::failing()),
            &BuiltinProfileStore,
            params(),
        );
        assert!(matches!(
            result,
            Err(RunDebateError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unknown_profile_is_neutral() {
        let orchestrator = offline(
            RunDebateInput::new(topic())
                .with_pro("zeno")
                .with_con("kant"),
        );
        assert_eq!(orchestrator.display_name("zeno"), "zeno");
        assert_eq!(orchestrator.display_name("kant"), "Immanuel Kant");
    }

    #[test]
    fn test_invalid_profile_is_an_error() {
        struct BrokenStore;

        impl PhilosopherProfileStore for BrokenStore {
            fn load(&self, key: &str) -> Result<PhilosopherProfile, ProfileStoreError> {
                Err(ProfileStoreError::Invalid {
                    key: key.to_string(),
                    message: "bad weights".to_string(),
                })
            }
        }

        let result = DebateOrchestrator::new(
            input(),
            Arc::new(ScriptedModel::failing()),
            &BrokenStore,
            params(),
        );
        assert!(matches!(result, Err(RunDebateError::Profile(_))));
    }
}
