//! # MedAssist Catalogue Listings
//!
//! File: cli/src/commands/catalogue/list.rs
//! Author: Christi Mahu
//!
//! `medassist catalogue symptoms` and `medassist catalogue conditions`.
//!
use crate::commands::diagnose::report::confidence_percent;
use crate::core::error::Result;
use crate::engine::reference::{Condition, ReferenceData};
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct SymptomsArgs {
    /// Print a JSON array instead of one label per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConditionsArgs {
    /// Print the full condition records as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn handle_symptoms(args: SymptomsArgs, reference: &ReferenceData) -> Result<()> {
    let symptoms = &reference.catalogue.symptoms;
    info!("Listing {} symptoms", symptoms.len());
    if args.json {
        let json = serde_json::to_string_pretty(symptoms)
            .context("Failed to serialize symptom list")?;
        println!("{}", json);
    } else {
        for symptom in symptoms {
            println!("{}", symptom);
        }
    }
    Ok(())
}

pub fn handle_conditions(args: ConditionsArgs, reference: &ReferenceData) -> Result<()> {
    let catalogue = &reference.catalogue;
    info!("Listing {} conditions", catalogue.conditions.len());
    if args.json {
        let json = serde_json::to_string_pretty(&catalogue.conditions)
            .context("Failed to serialize condition list")?;
        println!("{}", json);
        return Ok(());
    }

    let default_name = catalogue.default_condition().map(|c| c.name.as_str());
    print!("{}", format_condition_table(&catalogue.conditions, default_name));
    Ok(())
}

/// Fixed-width table, one condition per row. The default condition is starred.
fn format_condition_table(conditions: &[Condition], default_name: Option<&str>) -> String {
    let name_width = conditions
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("CONDITION".len());

    let mut out = format!(
        "  {:<name_width$}  {:<9}  {:>10}  {:>8}\n",
        "CONDITION", "SEVERITY", "CONFIDENCE", "SYMPTOMS"
    );
    for condition in conditions {
        let marker = if Some(condition.name.as_str()) == default_name { '*' } else { ' ' };
        out.push_str(&format!(
            "{} {:<name_width$}  {:<9}  {:>9}%  {:>8}\n",
            marker,
            condition.name,
            condition.severity.as_str(),
            confidence_percent(condition.base_probability),
            condition.associated_symptoms.len(),
        ));
    }
    if default_name.is_some() {
        out.push_str("\n* returned when no selected symptom matches any condition\n");
    }
    out
}
