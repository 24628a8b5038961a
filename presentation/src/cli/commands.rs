//! CLI command definitions

use agora_domain::Role;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a finished debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Turn-by-turn transcript
    Transcript,
    /// Final state, maneuvers and names as JSON
    Json,
}

impl From<OutputFormat> for agora_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Transcript => agora_domain::OutputFormat::Transcript,
            OutputFormat::Json => agora_domain::OutputFormat::Json,
        }
    }
}

/// Camp a human debater joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Pro,
    Con,
}

impl Side {
    pub fn role(self) -> Role {
        match self {
            Side::Pro => Role::Pro,
            Side::Con => Role::Con,
        }
    }
}

/// `--human NAME:pro|con`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanSeat {
    pub name: String,
    pub side: Side,
}

fn parse_human(value: &str) -> Result<HumanSeat, String> {
    let (name, side) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:pro or NAME:con, got '{}'", value))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("human name must not be empty".to_string());
    }
    let side = match side.trim().to_lowercase().as_str() {
        "pro" => Side::Pro,
        "con" => Side::Con,
        other => return Err(format!("unknown side '{}', use pro or con", other)),
    };
    Ok(HumanSeat {
        name: name.to_string(),
        side,
    })
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Philosophers debate a motion under a fixed protocol")]
#[command(long_about = r#"
Agora stages a moderated debate between philosopher personas.

Every debate follows the same protocol: opening, arguments, rebuttals,
an interactive exchange, cross-examination in both directions and
conclusions, with moderator summaries in between. Debaters pick their
attacks, defenses and follow-ups from weighted strategy tables and may
pull evidence from web search before they speak.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. AGORA_* environment variables
3. ./agora.toml        Project-level config
4. ~/.config/agora/config.toml   Global config

Example:
  agora "Lying is always wrong" --pro kant --con nietzsche
  agora "Is the unexamined life worth living?" --pro socrates --human Alice:con
  agora "Property is theft" --pro marx --con hume --offline -o json
"#)]
pub struct Cli {
    /// The motion to debate (falls back to `[debate] topic`)
    pub topic: Option<String>,

    /// Profile of a pro debater (can be specified multiple times)
    #[arg(long, value_name = "PROFILE")]
    pub pro: Vec<String>,

    /// Profile of a con debater (can be specified multiple times)
    #[arg(long, value_name = "PROFILE")]
    pub con: Vec<String>,

    /// Seat a person in a camp, e.g. `--human Alice:con`
    #[arg(long, value_name = "NAME:SIDE", value_parser = parse_human)]
    pub human: Vec<HumanSeat>,

    /// Identifier of the moderator
    #[arg(long, value_name = "ID")]
    pub moderator: Option<String>,

    /// Seed for strategy draws (makes runs reproducible)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run without a language model; every turn uses its fallback text
    #[arg(long)]
    pub offline: bool,

    /// TOML file with additional philosopher profiles
    #[arg(long, value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
