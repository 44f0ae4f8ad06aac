//! # MedAssist Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for the MedAssist CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration once, and the reference data when the command
//!   needs it
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `engine`: the two pure decision engines and their reference tables
//! - `core`: configuration, errors and templating shared by all commands
//! - `commands`: one module per top-level command
//!
//! Errors from any command propagate here, are logged in full and printed as
//! a single `Error:` line before exiting with status 1.
//!
//! ## Examples
//!
//! ```bash
//! medassist diagnose Fever Cough "Loss of taste"
//! medassist chat "How can I sleep better?"
//! medassist -v --data ./clinic.toml catalogue conditions
//! medassist srv --port 9000
//! ```
//!
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod core;
mod engine;

use crate::engine::reference::ReferenceData;

#[derive(Parser, Debug)]
#[command(
    name = "medassist",
    about = "🩺 MedAssist: symptom matching and a rule-based health assistant",
    long_about = "Predict a likely condition from selected symptoms, ask a keyword-based\n\
                  health assistant, or serve both as a local JSON API.\n\n\
                  Informational only. Not a substitute for professional medical advice.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Reference data file replacing the built-in tables.
    #[arg(long, global = true, env = "MEDASSIST_DATA", value_name = "PATH")]
    data: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "d")]
    Diagnose(commands::diagnose::DiagnoseArgs),
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "cat")]
    Catalogue(commands::catalogue::CatalogueArgs),
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config =
        crate::core::config::load_config().context("Failed to load MedAssist configuration")?;

    let data_path = cli
        .data
        .or_else(|| config.reference.data_file.as_ref().map(PathBuf::from));
    let reference = || load_reference(data_path.as_deref());

    match cli.command {
        Commands::Diagnose(args) => commands::diagnose::handle_diagnose(args, &config, &reference()?),
        Commands::Chat(args) => commands::chat::handle_chat(args, &config, &reference()?),
        Commands::Catalogue(args) => commands::catalogue::handle_catalogue(args, reference),
        Commands::Srv(args) => commands::srv::handle_srv(args, &config, reference()?).await,
    }
}

fn load_reference(path: Option<&Path>) -> anyhow::Result<ReferenceData> {
    let reference = ReferenceData::load(path)?;
    tracing::info!(
        "Reference data loaded: {} symptoms, {} conditions, {} keyword rules",
        reference.catalogue.symptoms.len(),
        reference.catalogue.conditions.len(),
        reference.chat.rules.len()
    );
    Ok(reference)
}
