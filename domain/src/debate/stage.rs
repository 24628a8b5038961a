//! Debate stages and roles
//!
//! A debate walks through [`Stage::SEQUENCE`] exactly once. The only stages
//! that host more than one message per role are the QA stages and the
//! interactive stage, which loop on themselves until their exchange bound
//! is reached.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role a participant plays in the debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pro,
    Con,
    Moderator,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pro => "pro",
            Role::Con => "con",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// The opposing camp (moderator and user have none)
    pub fn opponent(&self) -> Option<Role> {
        match self {
            Role::Pro => Some(Role::Con),
            Role::Con => Some(Role::Pro),
            Role::Moderator | Role::User => None,
        }
    }

    /// Whether this role argues one side of the motion
    pub fn is_camp(&self) -> bool {
        matches!(self, Role::Pro | Role::Con)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(Role::Pro),
            "con" => Ok(Role::Con),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Who holds the floor in a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOwner {
    /// Advances after a single moderator message
    Moderator,
    /// Every participant of the role speaks once
    Role(Role),
    /// Question/answer exchange, alternating roles
    Qa { questioner: Role, answerer: Role },
    /// Free-form exchange, alternating roles, pro opens
    Interactive,
    /// The debate is over
    Terminal,
}

impl StageOwner {
    /// Camps that must have at least one participant for the stage to run
    pub fn required_roles(&self) -> Vec<Role> {
        match self {
            StageOwner::Role(role) => vec![*role],
            StageOwner::Qa {
                questioner,
                answerer,
            } => vec![*questioner, *answerer],
            StageOwner::Interactive => vec![Role::Pro, Role::Con],
            StageOwner::Moderator | StageOwner::Terminal => vec![],
        }
    }

    /// Role that speaks first in an alternating stage
    pub fn opening_role(&self) -> Option<Role> {
        match self {
            StageOwner::Qa { questioner, .. } => Some(*questioner),
            StageOwner::Interactive => Some(Role::Pro),
            _ => None,
        }
    }
}

/// Phase of the debate protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Opening,
    ProArgument,
    ConArgument,
    /// Numbered moderator summary (1-based)
    ModeratorSummary(u8),
    ProRebuttal,
    ConRebuttal,
    InteractiveArgument,
    ProToConQa,
    ConToProQa,
    ProConclusion,
    ConConclusion,
    Closing,
    Completed,
}

impl Stage {
    /// The fixed protocol order
    pub const SEQUENCE: [Stage; 16] = [
        Stage::Opening,
        Stage::ProArgument,
        Stage::ConArgument,
        Stage::ModeratorSummary(1),
        Stage::ProRebuttal,
        Stage::ConRebuttal,
        Stage::ModeratorSummary(2),
        Stage::InteractiveArgument,
        Stage::ModeratorSummary(3),
        Stage::ProToConQa,
        Stage::ConToProQa,
        Stage::ModeratorSummary(4),
        Stage::ProConclusion,
        Stage::ConConclusion,
        Stage::Closing,
        Stage::Completed,
    ];

    /// Token identifying the stage (e.g. `moderator_summary_2`)
    pub fn token(&self) -> String {
        match self {
            Stage::Opening => "opening".to_string(),
            Stage::ProArgument => "pro_argument".to_string(),
            Stage::ConArgument => "con_argument".to_string(),
            Stage::ModeratorSummary(n) => format!("moderator_summary_{}", n),
            Stage::ProRebuttal => "pro_rebuttal".to_string(),
            Stage::ConRebuttal => "con_rebuttal".to_string(),
            Stage::InteractiveArgument => "interactive_argument".to_string(),
            Stage::ProToConQa => "pro_to_con_qa".to_string(),
            Stage::ConToProQa => "con_to_pro_qa".to_string(),
            Stage::ProConclusion => "pro_conclusion".to_string(),
            Stage::ConConclusion => "con_conclusion".to_string(),
            Stage::Closing => "closing".to_string(),
            Stage::Completed => "completed".to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Stage::Opening => "Opening".to_string(),
            Stage::ProArgument => "Pro Argument".to_string(),
            Stage::ConArgument => "Con Argument".to_string(),
            Stage::ModeratorSummary(n) => format!("Moderator Summary {}", n),
            Stage::ProRebuttal => "Pro Rebuttal".to_string(),
            Stage::ConRebuttal => "Con Rebuttal".to_string(),
            Stage::InteractiveArgument => "Interactive Argument".to_string(),
            Stage::ProToConQa => "Pro → Con Q&A".to_string(),
            Stage::ConToProQa => "Con → Pro Q&A".to_string(),
            Stage::ProConclusion => "Pro Conclusion".to_string(),
            Stage::ConConclusion => "Con Conclusion".to_string(),
            Stage::Closing => "Closing".to_string(),
            Stage::Completed => "Completed".to_string(),
        }
    }

    pub fn owner(&self) -> StageOwner {
        match self {
            Stage::Opening | Stage::ModeratorSummary(_) | Stage::Closing => StageOwner::Moderator,
            Stage::ProArgument | Stage::ProRebuttal | Stage::ProConclusion => {
                StageOwner::Role(Role::Pro)
            }
            Stage::ConArgument | Stage::ConRebuttal | Stage::ConConclusion => {
                StageOwner::Role(Role::Con)
            }
            Stage::InteractiveArgument => StageOwner::Interactive,
            Stage::ProToConQa => StageOwner::Qa {
                questioner: Role::Pro,
                answerer: Role::Con,
            },
            Stage::ConToProQa => StageOwner::Qa {
                questioner: Role::Con,
                answerer: Role::Pro,
            },
            Stage::Completed => StageOwner::Terminal,
        }
    }

    /// Position in [`Stage::SEQUENCE`]
    pub fn index(&self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::SEQUENCE.len() - 1)
    }

    /// The stage that follows this one (Completed is absorbing)
    pub fn next(&self) -> Stage {
        Self::SEQUENCE
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Stage::Completed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, Stage::ProArgument | Stage::ConArgument)
    }

    pub fn is_rebuttal(&self) -> bool {
        matches!(self, Stage::ProRebuttal | Stage::ConRebuttal)
    }

    pub fn is_conclusion(&self) -> bool {
        matches!(self, Stage::ProConclusion | Stage::ConConclusion)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = s.strip_prefix("moderator_summary_") {
            return n
                .parse::<u8>()
                .ok()
                .filter(|n| Self::SEQUENCE.contains(&Stage::ModeratorSummary(*n)))
                .map(Stage::ModeratorSummary)
                .ok_or_else(|| format!("unknown stage '{}'", s));
        }
        Self::SEQUENCE
            .iter()
            .find(|stage| stage.token() == s)
            .copied()
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

impl Serialize for Stage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
