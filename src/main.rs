use chrono::Utc;
use clap::Parser;
use confirmdesk::application::filter::FilterCriteria;
use confirmdesk::cli::commands::{Cli, Commands};
use confirmdesk::config::AppConfig;
use confirmdesk::ConfirmDesk;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    cli.apply_to(&mut config);
    init_tracing(&config.log_level);

    let desk = match ConfirmDesk::new(&config) {
        Ok(desk) => desk,
        Err(e) => {
            eprintln!("Error initializing confirmdesk: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(desk, &config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(
    desk: ConfirmDesk,
    config: &AppConfig,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Load { persist } => {
            let report = desk.load(persist).await;
            print_json(&report)?;
        }
        Commands::Upload { file, persist } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let report = desk.upload(&text, persist)?;
            print_json(&report)?;
        }
        Commands::Trades { filter } => {
            desk.load(false).await;
            print_json(&desk.trades(&FilterCriteria::from(filter)))?;
        }
        Commands::Summary { filter } => {
            desk.load(false).await;
            print_json(&desk.summary(&FilterCriteria::from(filter)))?;
        }
        Commands::Facets => {
            desk.load(false).await;
            print_json(&desk.facets())?;
        }
        Commands::Workflows => {
            desk.load(false).await;
            print_json(&desk.workflows())?;
        }
        Commands::Actions => {
            desk.load(false).await;
            print_json(&desk.actions(Utc::now()))?;
        }
        Commands::Failures => {
            desk.load(false).await;
            print_json(&desk.failures())?;
        }
        Commands::Documents { trade_id } => {
            desk.load(false).await;
            print_json(&desk.document(&trade_id)?)?;
        }
        Commands::Stats => {
            print_json(&desk.stats()?)?;
        }
        Commands::Serve { .. } => {
            let report = desk.load(false).await;
            for err in &report.errors {
                tracing::warn!(error = %err, "starting with a partial dataset");
            }
            confirmdesk::api::run_server(Arc::new(desk), &config.socket_addr()).await?;
        }
    }
    Ok(())
}
