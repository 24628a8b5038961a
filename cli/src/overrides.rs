//! Command-line overrides on top of the merged configuration

use agora_domain::{ConfigIssue, ConfigIssueCode};
use agora_infrastructure::FileConfig;
use agora_presentation::{Cli, Side};

/// Apply flags to `config`; flags win over every file and env source
///
/// `--pro`/`--con` replace the configured roster. `--human NAME:SIDE`
/// seats NAME in that camp and flags it as human.
pub fn apply(cli: &Cli, config: &mut FileConfig) {
    let debate = &mut config.debate;
    if let Some(topic) = &cli.topic {
        debate.topic = Some(topic.clone());
    }
    if !cli.pro.is_empty() {
        debate.pro = cli.pro.clone();
    }
    if !cli.con.is_empty() {
        debate.con = cli.con.clone();
    }
    for seat in &cli.human {
        let camp = match seat.side {
            Side::Pro => &mut debate.pro,
            Side::Con => &mut debate.con,
        };
        if !camp.contains(&seat.name) {
            camp.push(seat.name.clone());
        }
        if !debate.humans.contains(&seat.name) {
            debate.humans.push(seat.name.clone());
        }
    }
    if let Some(moderator) = &cli.moderator {
        debate.moderator = moderator.clone();
    }
    if let Some(seed) = cli.seed {
        debate.seed = Some(seed);
    }
    if let Some(path) = &cli.profiles {
        config.profiles.path = Some(path.clone());
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
}

/// Error issue when no usable topic was given anywhere
pub fn topic_issue(config: &FileConfig) -> Option<ConfigIssue> {
    let missing = config
        .debate
        .topic
        .as_deref()
        .is_none_or(|topic| topic.trim().is_empty());
    missing.then(|| {
        ConfigIssue::error(
            ConfigIssueCode::MissingTopic,
            "No topic given: pass it as the first argument or set [debate] topic",
        )
    })
}
