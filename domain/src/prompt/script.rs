//! Fixed texts: the moderator script and the fallback utterances
//!
//! Nothing here calls a model, so both are deterministic for a given input.

use crate::debate::participants::Participants;
use crate::debate::stage::{Role, Stage};
use crate::strategy::plans::ManeuverKind;

/// Moderator lines for moderator-owned stages
pub struct ModeratorScript;

impl ModeratorScript {
    /// Moderator line for `stage`
    ///
    /// `name_of` maps a participant id to the name used on stage.
    pub fn line(
        stage: Stage,
        topic: &str,
        participants: &Participants,
        name_of: impl Fn(&str) -> String,
    ) -> String {
        let camp = |role: Role| {
            let names: Vec<String> = participants.of(role).iter().map(|id| name_of(id)).collect();
            if names.is_empty() {
                "no one".to_string()
            } else {
                names.join(", ")
            }
        };

        match stage {
            Stage::Opening => format!(
                "Welcome. Today's motion: \"{}\". Speaking for the motion: {}. Speaking against: {}. \
                 Each side will argue, rebut, question the other and conclude. We begin with {}.",
                topic,
                camp(Role::Pro),
                camp(Role::Con),
                stage.next().display_name()
            ),
            Stage::ModeratorSummary(n) => format!(
                "Thank you. That closes part {} of the debate on \"{}\". Next: {}.",
                n,
                topic,
                stage.next().display_name()
            ),
            Stage::Closing => format!(
                "Thank you, {} and {}. This concludes the debate on \"{}\". \
                 The audience may now weigh the arguments.",
                camp(Role::Pro),
                camp(Role::Con),
                topic
            ),
            other => format!("We now move to {}.", other.display_name()),
        }
    }
}

/// Utterance used when generation fails or returns nothing
pub fn fallback_utterance(kind: ManeuverKind, topic: &str, target: Option<&str>) -> String {
    match kind {
        ManeuverKind::Opening => format!(
            "My position on \"{}\" stands on its own merits, and I will defend it throughout this debate.",
            topic
        ),
        ManeuverKind::Attack => match target {
            Some(claim) => format!(
                "I question the claim that {}. It rests on premises that have not been shown.",
                claim.trim_end_matches('.')
            ),
            None => "Your position rests on premises that have not been shown.".to_string(),
        },
        ManeuverKind::Defense => {
            "That objection misreads my position. My argument stands as stated.".to_string()
        }
        ManeuverKind::Followup => {
            "You have not answered the core difficulty. What supports your premise?".to_string()
        }
        ManeuverKind::Conclusion => format!(
            "I rest my case on \"{}\". The arguments I have made remain unanswered.",
            topic
        ),
    }
}
