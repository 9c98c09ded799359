//! CLI entrypoint for votum
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then replays a script against the configured
//! councils.

mod replay;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use replay::Replayer;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use votum_application::{
    Clock, CompositeNotifier, CouncilRegistry, ElectionRegistry, ElectionUseCase,
    GovernanceNotifier, ManualClock, MotionUseCase, RegistryForwarder, SystemClock,
};
use votum_domain::CouncilId;
use votum_infrastructure::{ConfigLoader, JsonlEventLog, ScriptReader};
use votum_presentation::{Cli, ConsoleFormatter, ConsoleNotifier, OutputFormat, formatter_for};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }

    let Some(script) = cli.script.as_deref() else {
        bail!("A replay script is required. Use --show-config to inspect configuration.");
    };
    let lines = ScriptReader::read(script)?;
    info!("Replaying {} steps from {}", lines.len(), script.display());

    // === Dependency Injection ===
    let clock = Arc::new(ManualClock::new(SystemClock.now()));

    let mut notifier = CompositeNotifier::default();
    // Event lines would corrupt JSON output
    if !cli.quiet && cli.output == OutputFormat::Text {
        notifier.push(Arc::new(ConsoleNotifier));
    }
    if let Some(path) = cli.event_log.as_ref().or(config.log.event_log.as_ref()) {
        match JsonlEventLog::new(path) {
            Some(log) => {
                info!("Writing governance events to {}", log.path().display());
                notifier.push(Arc::new(log));
            }
            None => warn!("Event log disabled"),
        }
    }
    let notifier: Arc<dyn GovernanceNotifier> = Arc::new(notifier);

    let councils = Arc::new(CouncilRegistry::new());
    for council in config.build_councils() {
        councils.insert(council);
    }

    let forwarder = Arc::new(RegistryForwarder::new(
        councils.clone(),
        clock.clone(),
        notifier.clone(),
    ));
    let motions = MotionUseCase::new(
        councils.clone(),
        clock.clone(),
        notifier.clone(),
        forwarder,
    );

    let (defaults, _) = config.election.to_defaults();
    let elections = ElectionUseCase::new(
        Arc::new(ElectionRegistry::new()),
        clock.clone(),
        notifier,
        defaults,
    );

    let primary = CouncilId::from(config.council.id.as_str());
    let replayer = Replayer::new(motions, elections, clock, primary, &config.roster);

    // === Replay ===
    let summary = replayer.run(&lines).await;

    // === Final state ===
    let formatter = formatter_for(cli.output);
    let now = replayer.now();

    for id in councils.ids() {
        let council = replayer.motions().snapshot(&id).await?;
        println!("{}", formatter.format_council(&council, now));
    }
    for results in &summary.results {
        println!("{}", formatter.format_results(results));
    }
    for election in replayer.elections().running().await {
        println!("{}", formatter.format_election(&election));
    }

    for failure in &summary.failures {
        eprintln!(
            "{} line {} ({}): {}",
            "x".red(),
            failure.line,
            failure.step,
            failure.error
        );
    }
    info!(
        "{} steps applied, {} failed",
        summary.applied,
        summary.failures.len()
    );

    Ok(())
}
