//! # MedAssist Server Command
//!
//! File: cli/src/commands/srv/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `medassist srv` exposes the two engines as a small local JSON API so a web
//! front end can use them. The server keeps no per-user state: each request
//! is answered from the reference data loaded at startup.
//!
//! - `config`: command-line arguments and their merge with `[server]`
//! - `server_logic`: routes, error mapping, port selection and shutdown
//!
//! ## Usage
//!
//! ```bash
//! medassist srv                 # 127.0.0.1:8000, or the next free port
//! medassist srv -p 9000 --no-cors
//! curl -s localhost:8000/api/diagnose -H 'content-type: application/json' \
//!      -d '{"symptoms":["Fever","Chills"]}'
//! ```
//!
use crate::commands::diagnose::report;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::templating;
use crate::engine::reference::ReferenceData;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

pub mod config;
pub mod server_logic;

/// # Handle Server Command (`handle_srv`)
///
/// Merges the arguments with the configuration file, loads the report
/// template once and runs the server until it is shut down.
pub async fn handle_srv(args: SrvArgs, config: &Config, reference: ReferenceData) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let server_config = config::merge_config(&args, &config.server);
    info!("Effective server config: {:?}", server_config);

    let report_template =
        templating::load_template(config.report.template.as_deref(), report::BUILTIN_TEMPLATE)?
            .into_owned();
    let state = Arc::new(server_logic::AppState {
        reference,
        report_template,
    });

    server_logic::run_server(server_config, state).await
}
