use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use okr_monitor::app::App;
use okr_monitor::cli::{Cli, Commands, ConfigCommands};
use okr_monitor::core::{
    ChannelNotifier, ReportState, Sampler, SharedHistory, StatusReport, SysinfoProvider,
};
use okr_monitor::launcher::Launcher;
use okr_monitor::tui;
use okr_monitor::utils::{logging, AppConfig, APP_NAME, DISK_MOUNT, TICK_INTERVAL};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    logging::init(&config);
    tui::install_panic_hook();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "{} starting", APP_NAME);

    match cli.command {
        None | Some(Commands::Launcher) => {
            let mut launcher = Launcher::new(&config);
            launcher.run().await?;
        }
        Some(Commands::Monitor) => {
            let mut app = App::new(&config)?;
            app.run().await?;
        }
        Some(Commands::Status { json }) => {
            handle_status(&config, json).await?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command, cli.config, &config)?;
        }
    }

    Ok(())
}

async fn handle_status(config: &AppConfig, json: bool) -> Result<()> {
    let history = SharedHistory::new(2);
    let (notifier, _alerts) = ChannelNotifier::new();
    let mut sampler = Sampler::new(SysinfoProvider::new(DISK_MOUNT), notifier, config.thresholds, history);

    // CPU usage and network rates need two readings
    sampler.sample_once(std::time::Instant::now());
    tokio::time::sleep(TICK_INTERVAL).await;
    let sample = sampler.sample_once(std::time::Instant::now());

    let report = StatusReport::from_sample(&sample, &config.thresholds);

    if json {
        println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize report")?);
        return Ok(());
    }

    println!("{}\n", "System status".bold());
    println!("{:<14} {:<14} {:<12} {:<12}", "Metric", "Value", "Threshold", "State");
    println!("{}", "-".repeat(54));

    for row in &report.rows {
        let threshold = row
            .threshold
            .map(|t| format!("{:.0}%", t))
            .unwrap_or_else(|| "-".to_string());
        let state = match row.state {
            ReportState::Ok => "ok".green(),
            ReportState::Elevated => "elevated".yellow(),
            ReportState::Exceeded => "exceeded".red().bold(),
            ReportState::Unavailable => "n/a".dimmed(),
        };
        println!("{:<14} {:<14} {:<12} {}", row.metric, row.display, threshold, state);
    }

    let exceeded: Vec<_> = report.exceeded().map(|row| row.metric).collect();
    if !exceeded.is_empty() {
        println!("\n{} {}", "✗ Above threshold:".red(), exceeded.join(", "));
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, explicit: Option<std::path::PathBuf>, config: &AppConfig) -> Result<()> {
    let path = match explicit {
        Some(path) => path,
        None => AppConfig::config_path()?,
    };

    match command {
        ConfigCommands::Show => {
            println!("# {}\n", path.display());
            print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default().save_to(&path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
