//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;
mod overrides;

use agora_application::{
    DebateOrchestrator, DebateProgressNotifier, LanguageModel, NoProgress, RunDebateInput,
    SearchProvider,
};
use agora_domain::{ConfigIssueCode, OutputFormat, Severity, Topic};
use agora_infrastructure::{
    ConfigLoader, FileConfig, OfflineLanguageModel, OpenAiLanguageModel, TomlProfileStore,
};
use agora_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, StdinHumanInput,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit status after Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    overrides::apply(&cli, &mut config);

    let log_guard = logging::init(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting agora");

    if !config.output.color {
        colored::control::set_override(false);
    }

    check_config(&config)?;
    let topic = config
        .debate
        .topic
        .clone()
        .and_then(Topic::try_new)
        .context("Topic is empty")?;

    // === Dependency Injection ===
    let model = language_model(&cli, &config);
    let profiles = match &config.profiles.path {
        Some(path) => TomlProfileStore::from_file(path)?,
        None => TomlProfileStore::empty(),
    };

    let mut input = RunDebateInput::new(topic).with_moderator(config.debate.moderator.clone());
    for id in &config.debate.pro {
        input = input.with_pro(id.clone());
    }
    for id in &config.debate.con {
        input = input.with_con(id.clone());
    }
    for id in &config.debate.humans {
        input = input.with_human(id.clone());
    }

    let token = CancellationToken::new();
    spawn_interrupt_handler(token.clone());

    let orchestrator = DebateOrchestrator::new(input, model, &profiles, config.debate_params())?
        .with_search_providers(search_providers(&cli, &config))
        .with_history_search(config.search.history_enabled)
        .with_cancellation(token);

    let format = config.output.format.unwrap_or_default();
    let has_humans = !config.debate.humans.is_empty();
    // Stream turns above the spinner; with humans the simple reporter echoes them instead
    let streamed = format == OutputFormat::Transcript && !cli.quiet && !has_humans;
    let names = orchestrator.output(false).names;

    let progress: Arc<dyn DebateProgressNotifier> = if cli.quiet {
        Arc::new(NoProgress)
    } else if has_humans {
        Arc::new(SimpleProgress::new(names))
    } else {
        Arc::new(ProgressReporter::new(names).with_live_transcript(streamed))
    };
    let mut orchestrator = orchestrator.with_progress(progress);
    if has_humans {
        orchestrator = orchestrator.with_human_input(Arc::new(StdinHumanInput::new()));
    }

    if streamed {
        println!("{}", ConsoleFormatter::format_header(&orchestrator.output(false)));
    }

    let output = orchestrator.run_to_completion().await?;

    let rendered = match format {
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
        OutputFormat::Transcript if streamed => ConsoleFormatter::format_summary(&output),
        OutputFormat::Transcript => ConsoleFormatter::format(&output),
    };
    println!("{}", rendered);

    if output.cancelled {
        // A pending stdin read would otherwise keep the runtime alive
        drop(log_guard);
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
    Ok(())
}

/// Print every configuration error and stop if there is one
///
/// Roster warnings are reported by the orchestrator when it starts.
fn check_config(config: &FileConfig) -> Result<()> {
    let mut issues = config.validate();
    issues.extend(overrides::topic_issue(config));

    let mut errors = 0;
    for issue in &issues {
        match issue.severity {
            Severity::Error => {
                errors += 1;
                eprintln!("{} {}", "error:".red().bold(), issue.message);
            }
            Severity::Warning if issue.code == ConfigIssueCode::TemperatureOutOfRange => {
                warn!("{}", issue.message);
            }
            Severity::Warning => {}
        }
    }
    if errors > 0 {
        bail!("Invalid configuration ({} error(s))", errors);
    }
    Ok(())
}

fn language_model(cli: &Cli, config: &FileConfig) -> Arc<dyn LanguageModel> {
    if cli.offline {
        info!("Offline mode: every turn uses its fallback text");
        return Arc::new(OfflineLanguageModel);
    }
    match OpenAiLanguageModel::from_config(&config.providers.openai) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            warn!("{}; running offline", e);
            Arc::new(OfflineLanguageModel)
        }
    }
}

#[cfg(feature = "web-tools")]
fn search_providers(cli: &Cli, config: &FileConfig) -> Vec<Arc<dyn SearchProvider>> {
    use agora_infrastructure::DuckDuckGoSearch;
    use std::time::Duration;

    if cli.offline || !config.search.web_enabled {
        return Vec::new();
    }
    let timeout = Duration::from_secs(config.providers.openai.timeout_secs.clamp(1, 30));
    match DuckDuckGoSearch::new(timeout) {
        Ok(search) => vec![Arc::new(search) as Arc<dyn SearchProvider>],
        Err(e) => {
            warn!("Web search disabled: {}", e);
            Vec::new()
        }
    }
}

#[cfg(not(feature = "web-tools"))]
fn search_providers(_cli: &Cli, _config: &FileConfig) -> Vec<Arc<dyn SearchProvider>> {
    Vec::new()
}

/// Cancel `token` on Ctrl-C; the debate stops after the current turn
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current turn");
            token.cancel();
        }
    });
}
