//! # MedAssist Condition Info
//!
//! File: cli/src/commands/catalogue/info.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `medassist catalogue info <NAME>` prints one catalogue entry in full:
//! description, severity, confidence, associated symptoms, precautions and
//! diet. The name is matched exactly first, then case-insensitively, so
//! `info "common cold"` works. An unknown name fails with
//! `MedassistError::ConditionNotFound`.
//!
use crate::commands::diagnose::report::confidence_percent;
use crate::core::error::{MedassistError, Result};
use crate::engine::reference::{Condition, ConditionCatalogue, ReferenceData};
use anyhow::Context;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Condition name, e.g. "Influenza".
    #[arg(required = true)]
    pub name: String,

    /// Print the condition record as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn handle_info(args: InfoArgs, reference: &ReferenceData) -> Result<()> {
    let catalogue = &reference.catalogue;
    let condition = lookup(catalogue, &args.name)?;
    debug!("Showing condition '{}'", condition.name);

    if args.json {
        let json = serde_json::to_string_pretty(condition)
            .with_context(|| format!("Failed to serialize condition '{}'", condition.name))?;
        println!("{}", json);
        return Ok(());
    }

    let is_default = catalogue
        .default_condition()
        .is_some_and(|d| d.name == condition.name);
    print!("{}", format_condition(condition, is_default));
    Ok(())
}

/// Exact name first, then a case-insensitive match.
fn lookup<'a>(catalogue: &'a ConditionCatalogue, name: &str) -> Result<&'a Condition> {
    let wanted = name.trim();
    catalogue
        .find(wanted)
        .or_else(|| {
            let lower = wanted.to_lowercase();
            catalogue
                .conditions
                .iter()
                .find(|c| c.name.to_lowercase() == lower)
        })
        .ok_or_else(|| {
            MedassistError::ConditionNotFound {
                name: wanted.to_string(),
            }
            .into()
        })
}

fn format_condition(condition: &Condition, is_default: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", condition.name));
    out.push_str(&format!("{}\n\n", "=".repeat(condition.name.chars().count())));
    out.push_str(&format!("{}\n\n", condition.description));
    out.push_str(&format!(
        "Severity:   {}\n",
        condition.severity.as_str().to_uppercase()
    ));
    out.push_str(&format!(
        "Confidence: {}%\n",
        confidence_percent(condition.base_probability)
    ));
    if is_default {
        out.push_str("Default:    yes (returned when no selected symptom matches)\n");
    }

    out.push_str("\nAssociated symptoms:\n");
    for symptom in &condition.associated_symptoms {
        out.push_str(&format!("  • {}\n", symptom));
    }
    for (title, items) in [
        ("Precautions", &condition.precautions),
        ("Dietary recommendations", &condition.diet_recommendations),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}:\n", title));
        for item in items {
            out.push_str(&format!("  • {}\n", item));
        }
    }
    out
}
