//! Per-session argument store
//!
//! Everything a debater learns about its opponents during one debate lives
//! here, keyed by `(debate_id, speaker_id)`, so two debates never share
//! state. The store is owned by the orchestrator and passed to the analysis
//! and planning steps explicitly.

use crate::argument::entities::ScoredArgument;
use crate::strategy::plans::ManeuverRecord;
use std::collections::{HashMap, HashSet};

type SessionKey = (String, String);

fn key(debate_id: &str, speaker_id: &str) -> SessionKey {
    (debate_id.to_string(), speaker_id.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct ArgumentStore {
    arguments: HashMap<SessionKey, Vec<ScoredArgument>>,
    maneuvers: HashMap<String, Vec<ManeuverRecord>>,
    analyzed_turns: HashSet<(String, usize)>,
    /// Claims already chosen as attack targets, keyed by their author
    attacked: HashMap<SessionKey, HashSet<String>>,
}

impl ArgumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append scored arguments made by `speaker_id`
    pub fn append(
        &mut self,
        debate_id: &str,
        speaker_id: &str,
        scored: impl IntoIterator<Item = ScoredArgument>,
    ) {
        self.arguments
            .entry(key(debate_id, speaker_id))
            .or_default()
            .extend(scored);
    }

    /// Arguments made by `speaker_id`, in the order they were recorded
    pub fn arguments(&self, debate_id: &str, speaker_id: &str) -> &[ScoredArgument] {
        self.arguments
            .get(&key(debate_id, speaker_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `n` most vulnerable arguments of `speaker_id`
    ///
    /// Sorted by vulnerability descending; equal scores keep recording order.
    pub fn top_vulnerable(
        &self,
        debate_id: &str,
        speaker_id: &str,
        n: usize,
    ) -> Vec<&ScoredArgument> {
        let mut ranked: Vec<&ScoredArgument> =
            self.arguments(debate_id, speaker_id).iter().collect();
        ranked.sort_by(|a, b| b.vulnerability.total_cmp(&a.vulnerability));
        ranked.truncate(n);
        ranked
    }

    /// Mark a history turn as analyzed; false when it already was
    pub fn mark_analyzed(&mut self, debate_id: &str, turn_index: usize) -> bool {
        self.analyzed_turns
            .insert((debate_id.to_string(), turn_index))
    }

    pub fn is_analyzed(&self, debate_id: &str, turn_index: usize) -> bool {
        self.analyzed_turns
            .contains(&(debate_id.to_string(), turn_index))
    }

    pub fn record_maneuver(&mut self, debate_id: &str, record: ManeuverRecord) {
        self.maneuvers
            .entry(debate_id.to_string())
            .or_default()
            .push(record);
    }

    /// Every maneuver of one debate, in turn order
    pub fn maneuvers(&self, debate_id: &str) -> &[ManeuverRecord] {
        self.maneuvers
            .get(debate_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Maneuver realized by a given history turn
    pub fn maneuver_at(&self, debate_id: &str, turn_index: usize) -> Option<&ManeuverRecord> {
        self.maneuvers
            .get(debate_id)?
            .iter()
            .rev()
            .find(|r| r.turn_index == turn_index)
    }

    /// Remember that `claim` by `speaker_id` has been attacked; false when it already was
    pub fn mark_attacked(&mut self, debate_id: &str, speaker_id: &str, claim: &str) -> bool {
        self.attacked
            .entry(key(debate_id, speaker_id))
            .or_default()
            .insert(claim.to_string())
    }

    pub fn is_attacked(&self, debate_id: &str, speaker_id: &str, claim: &str) -> bool {
        self.attacked
            .get(&key(debate_id, speaker_id))
            .is_some_and(|claims| claims.contains(claim))
    }

    /// Drop everything recorded for one debate
    pub fn clear(&mut self, debate_id: &str) {
        self.arguments.retain(|(debate, _), _| debate != debate_id);
        self.maneuvers.remove(debate_id);
        self.analyzed_turns.retain(|(debate, _)| debate != debate_id);
        self.attacked.retain(|(debate, _), _| debate != debate_id);
    }
}
