//! Prompt templates for debaters and the analysis steps

use crate::argument::entities::StructuredArgument;
use crate::debate::stage::{Role, Stage};
use crate::philosopher::profile::PhilosopherProfile;
use crate::strategy::kinds::StrategyKind;
use crate::strategy::plans::{
    AttackPlan, DefensePlan, EvidenceSnippet, FollowupPlan, RhetoricalPayload,
};

/// Templates for every delegated generation step
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// System prompt for argument extraction
    pub fn extraction_system() -> &'static str {
        r#"You are an analyst of philosophical debate.
Your task is to decompose an utterance into the separate arguments it makes.
Reply with JSON only. Do not add commentary."#
    }

    /// User prompt for argument extraction
    pub fn extraction_prompt(topic: &str, text: &str) -> String {
        format!(
            r#"Debate topic: {}

Utterance:
"""
{}
"""

List every argument in the utterance as a JSON array. Each element has:
- "claim": the thesis in one sentence
- "evidence": facts or sources offered (empty string if none)
- "reasoning": how the evidence supports the claim
- "assumptions": array of unstated premises
- "argument_type": one of deductive, inductive, empirical, analogical, ethical, conceptual, causal

Reply with the JSON array only."#,
            topic, text
        )
    }

    /// System prompt for vulnerability scoring
    pub fn scoring_system() -> &'static str {
        r#"You are a strict judge of argument quality.
Score each axis independently on a scale from 0.0 to 1.0.
Reply with a single JSON object and nothing else."#
    }

    /// User prompt for vulnerability scoring
    pub fn scoring_prompt(topic: &str, argument: &StructuredArgument) -> String {
        let assumptions = if argument.assumptions.is_empty() {
            "(none stated)".to_string()
        } else {
            argument
                .assumptions
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        };
        format!(
            r#"Debate topic: {}

Claim: {}
Evidence: {}
Reasoning: {}
Assumptions: {}
Type: {}

Score the argument:
- "logical_strength": how valid the inference is
- "evidence_quality": how well supported it is
- "vulnerability": how easy it is to attack (1.0 = very easy)
- "relevance": how central it is to the topic

Reply as {{"logical_strength": 0.0, "evidence_quality": 0.0, "vulnerability": 0.0, "relevance": 0.0}}"#,
            topic,
            argument.claim,
            or_none(&argument.evidence),
            or_none(&argument.reasoning),
            assumptions,
            argument.argument_type
        )
    }

    /// System prompt for maneuver planning
    pub fn planning_system() -> &'static str {
        r#"You are a debate coach preparing a single rhetorical move.
Reply with a JSON object {"approach": "...", "key_points": ["...", "..."]} and nothing else."#
    }

    /// User prompt for maneuver planning
    pub fn planning_prompt<K: StrategyKind>(
        debater: &str,
        strategy: K,
        target: &str,
        evidence: &[EvidenceSnippet],
    ) -> String {
        let mut prompt = format!(
            r#"Debater: {}
Family: {}
Strategy: {} ({})

Target:
"""
{}
"""
"#,
            debater,
            K::FAMILY,
            strategy.as_str(),
            strategy.description(),
            target
        );
        push_evidence(&mut prompt, evidence);
        prompt.push_str(
            "\nDescribe the approach in one sentence and give two to four key points.",
        );
        prompt
    }

    /// User prompt for planning an opening argument
    pub fn opening_plan_prompt(debater: &str, role: Role, topic: &str) -> String {
        let side = match role {
            Role::Con => "against",
            _ => "for",
        };
        format!(
            r#"Debater: {}
Motion: "{}"
Side: {}

Plan the core of an opening argument {} the motion.
Describe the central line in one sentence and give two to four key points."#,
            debater, topic, side, side
        )
    }

    /// System prompt for a debater's utterance
    pub fn debater_system(profile: &PhilosopherProfile, role: Role, topic: &str) -> String {
        let side = match role {
            Role::Pro => "in favour of",
            Role::Con => "against",
            _ => "about",
        };
        let persona = if profile.persona.is_empty() {
            String::new()
        } else {
            format!("\n{}", profile.persona)
        };
        format!(
            r#"You are {}, speaking {} the motion: "{}".{}
Speak in the first person, in your own philosophical voice.
Keep each turn under 200 words. Do not narrate stage directions."#,
            profile.name, side, topic, persona
        )
    }

    /// User prompt for an opening argument
    pub fn opening_prompt(
        stage: Stage,
        core: &RhetoricalPayload,
        evidence: &[EvidenceSnippet],
    ) -> String {
        let mut prompt = format!(
            "Stage: {}\nPresent your opening argument.\n\nCore line: {}\n",
            stage.display_name(),
            core.approach
        );
        push_points(&mut prompt, &core.key_points);
        push_evidence(&mut prompt, evidence);
        prompt
    }

    /// User prompt realizing an attack
    pub fn attack_prompt(stage: Stage, plan: &AttackPlan) -> String {
        let mut prompt = format!(
            r#"Stage: {}
Attack this claim by {}:
"{}"

Strategy: {}
Approach: {}
"#,
            stage.display_name(),
            plan.target_speaker,
            plan.target.argument.claim,
            plan.strategy.description(),
            plan.payload.approach
        );
        push_points(&mut prompt, &plan.payload.key_points);
        push_evidence(&mut prompt, &plan.evidence);
        prompt
    }

    /// User prompt realizing a defense
    pub fn defense_prompt(stage: Stage, plan: &DefensePlan) -> String {
        let mut prompt = format!(
            r#"Stage: {}
You were attacked:
"{}"

Defend your position. Strategy: {}
Approach: {}
"#,
            stage.display_name(),
            plan.context,
            plan.strategy.description(),
            plan.payload.approach
        );
        push_points(&mut prompt, &plan.payload.key_points);
        push_evidence(&mut prompt, &plan.evidence);
        prompt
    }

    /// User prompt realizing a follow-up
    pub fn followup_prompt(stage: Stage, plan: &FollowupPlan) -> String {
        let mut prompt = format!(
            r#"Stage: {}
Your opponent defended:
"{}"

Press on. Strategy: {}
Approach: {}
"#,
            stage.display_name(),
            plan.context,
            plan.strategy.description(),
            plan.payload.approach
        );
        push_points(&mut prompt, &plan.payload.key_points);
        push_evidence(&mut prompt, &plan.evidence);
        prompt
    }

    /// User prompt for a conclusion, built from the speaker's own turns
    pub fn conclusion_prompt(stage: Stage, own_turns: &[&str]) -> String {
        let mut prompt = format!(
            "Stage: {}\nGive your closing statement. Restate your strongest points.\n",
            stage.display_name()
        );
        if !own_turns.is_empty() {
            prompt.push_str("\nWhat you said earlier:\n");
            for turn in own_turns {
                prompt.push_str(&format!("- {}\n", turn));
            }
        }
        prompt
    }
}

fn or_none(s: &str) -> &str {
    if s.trim().is_empty() { "(none)" } else { s }
}

fn push_points(prompt: &mut String, points: &[String]) {
    if points.is_empty() {
        return;
    }
    prompt.push_str("\nKey points:\n");
    for point in points {
        prompt.push_str(&format!("- {}\n", point));
    }
}

fn push_evidence(prompt: &mut String, evidence: &[EvidenceSnippet]) {
    if evidence.is_empty() {
        return;
    }
    prompt.push_str("\nSources you may cite:\n");
    for (i, snippet) in evidence.iter().enumerate() {
        prompt.push_str(&format!("[{}] {} ({})\n", i + 1, snippet.content, snippet.source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::entities::ArgumentType;
    use crate::strategy::kinds::AttackStrategy;

    #[test]
    fn test_extraction_prompt_contains_text() {
        let prompt = DebatePromptTemplate::extraction_prompt("Is free will real?", "We choose.");
        assert!(prompt.contains("Is free will real?"));
        assert!(prompt.contains("We choose."));
        assert!(prompt.contains("argument_type"));
    }

    #[test]
    fn test_scoring_prompt_marks_missing_fields() {
        let argument = StructuredArgument::new("Virtue is knowledge", ArgumentType::Conceptual);
        let prompt = DebatePromptTemplate::scoring_prompt("Virtue", &argument);
        assert!(prompt.contains("Evidence: (none)"));
        assert!(prompt.contains("Assumptions: (none stated)"));
        assert!(prompt.contains("Type: conceptual"));
    }

    #[test]
    fn test_planning_prompt_lists_evidence() {
        let evidence = vec![EvidenceSnippet::new("Libet 1983", "web", 0.9)];
        let prompt = DebatePromptTemplate::planning_prompt(
            "Hume",
            AttackStrategy::Clipping,
            "Free will is real",
            &evidence,
        );
        assert!(prompt.contains("Strategy: clipping"));
        assert!(prompt.contains("[1] Libet 1983 (web)"));
    }

    #[test]
    fn test_debater_system_sides() {
        let kant = PhilosopherProfile::builtin("kant").unwrap();
        let pro = DebatePromptTemplate::debater_system(&kant, Role::Pro, "Lying is wrong");
        assert!(pro.contains("Immanuel Kant"));
        assert!(pro.contains("in favour of"));
        let con = DebatePromptTemplate::debater_system(&kant, Role::Con, "Lying is wrong");
        assert!(con.contains("against"));
    }

    #[test]
    fn test_conclusion_prompt_without_history() {
        let prompt = DebatePromptTemplate::conclusion_prompt(Stage::ProConclusion, &[]);
        assert!(!prompt.contains("What you said earlier"));
    }
}
