//! # MedAssist Catalogue Command
//!
//! File: cli/src/commands/catalogue/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Read-only views of the reference data the engines use:
//!
//! - `symptoms`: every selectable symptom label, in catalogue order
//! - `conditions`: a table of conditions with severity, confidence and size
//! - `info <NAME>`: the full entry for one condition
//! - `check <PATH>`: loads and validates a reference data file without
//!   making it active, so a replacement can be vetted before use
//!
//! ## Usage
//!
//! ```bash
//! medassist catalogue symptoms
//! medassist cat conditions
//! medassist catalogue info "common cold"
//! medassist catalogue check ./my-reference.toml
//! ```
//!
use crate::core::error::Result;
use crate::engine::reference::ReferenceData;
use clap::{Parser, Subcommand};

mod check;
mod info;
mod list;

/// # Catalogue Command Group Arguments (`CatalogueArgs`)
///
/// Captures which `medassist catalogue` subcommand to run.
#[derive(Parser, Debug)]
#[command(about = "Inspect the symptom and condition catalogue")]
pub struct CatalogueArgs {
    #[command(subcommand)]
    command: CatalogueCommand,
}

#[derive(Subcommand, Debug)]
enum CatalogueCommand {
    /// List the selectable symptom labels.
    Symptoms(list::SymptomsArgs),
    /// List the known conditions.
    Conditions(list::ConditionsArgs),
    /// Show one condition in full.
    Info(info::InfoArgs),
    /// Validate a reference data file.
    Check(check::CheckArgs),
}

/// # Handle Catalogue Command (`handle_catalogue`)
///
/// Dispatches to the selected subcommand. `load_reference` yields the active
/// data set (built-in, `--data`, or `reference.data_file`). `check` never
/// calls it, so a broken active file does not stop a replacement being vetted.
pub fn handle_catalogue<F>(args: CatalogueArgs, load_reference: F) -> Result<()>
where
    F: FnOnce() -> Result<ReferenceData>,
{
    match args.command {
        CatalogueCommand::Symptoms(args) => list::handle_symptoms(args, &load_reference()?),
        CatalogueCommand::Conditions(args) => list::handle_conditions(args, &load_reference()?),
        CatalogueCommand::Info(args) => info::handle_info(args, &load_reference()?),
        CatalogueCommand::Check(args) => check::handle_check(args),
    }
}
