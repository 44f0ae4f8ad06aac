//! # MedAssist Diagnose Command
//!
//! File: cli/src/commands/diagnose/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the condition matcher for a list of symptom labels given on the
//! command line and prints the predicted condition. Optionally writes the
//! plain-text analysis report (see `report`).
//!
//! Labels are matched exactly against the catalogue (`medassist catalogue
//! symptoms` lists them). Repeated labels count once; unknown labels are
//! reported with a warning and otherwise ignored, exactly as the matcher
//! treats them.
//!
//! ## Usage
//!
//! ```bash
//! medassist diagnose Fever Cough "Loss of taste"
//! medassist diagnose --json "Runny nose"
//! medassist diagnose --report -o ~/reports Fever Chills
//! ```
//!
pub mod report;

use crate::core::config::Config;
use crate::core::error::{MedassistError, Result};
use crate::core::templating;
use crate::engine::matcher::{self, MatchResult};
use crate::engine::reference::{ConditionCatalogue, ReferenceData, Symptom};
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const DISCLAIMER: &str = "This analysis is informational only and is not a medical diagnosis. \
                          Consult a healthcare professional.";

/// Arguments for `medassist diagnose`.
#[derive(Parser, Debug)]
#[command(
    about = "Predict a condition from selected symptoms",
    long_about = "Scores each catalogued condition by the share of its symptoms you selected\n\
                  and prints the best match. Ties go to the condition listed first."
)]
pub struct DiagnoseArgs {
    /// Symptom labels exactly as listed by `medassist catalogue symptoms`.
    #[arg(required = true, value_name = "SYMPTOM")]
    pub symptoms: Vec<String>,

    /// Print the match result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also write a plain-text analysis report.
    #[arg(long)]
    pub report: bool,

    /// Directory for the report file (overrides `report.output_dir`).
    #[arg(short, long, env = "MEDASSIST_REPORT_DIR", value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Handles `medassist diagnose`.
pub fn handle_diagnose(args: DiagnoseArgs, config: &Config, reference: &ReferenceData) -> Result<()> {
    debug!("Diagnose args: {:?}", args);

    let symptoms = collect_symptoms(&args.symptoms, &reference.catalogue);
    let selected: BTreeSet<Symptom> = symptoms.iter().cloned().collect();
    let result = matcher::match_condition(&selected, &reference.catalogue)?;

    if result.defaulted {
        warn!(
            "None of the selected symptoms belong to a catalogued condition; showing default '{}'.",
            result.condition.name
        );
    } else {
        info!(
            "Predicted '{}' ({} of {} symptoms matched, overlap {:.2})",
            result.condition.name,
            result.matched_symptom_count,
            result.total_symptom_count,
            result.overlap()
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize match result to JSON")?;
        println!("{}", json);
    } else {
        print_result(&result);
    }

    if args.report {
        let dir = args
            .output
            .unwrap_or_else(|| PathBuf::from(&config.report.output_dir));
        if dir.exists() && !dir.is_dir() {
            return Err(MedassistError::FileSystem(format!(
                "Report output path '{}' is not a directory.",
                dir.display()
            ))
            .into());
        }
        let template =
            templating::load_template(config.report.template.as_deref(), report::BUILTIN_TEMPLATE)?;
        let path = report::write_report(&dir, &template, &symptoms, &result, Local::now())?;
        // Keep stdout clean for JSON consumers.
        if args.json {
            eprintln!("Report saved to {}", path.display());
        } else {
            println!("\nReport saved to {}", path.display());
        }
    }

    Ok(())
}

/// Turns raw labels into the selection, keeping first-seen order and
/// dropping repeats. Unknown labels are kept (they simply match nothing).
pub(crate) fn collect_symptoms(labels: &[String], catalogue: &ConditionCatalogue) -> Vec<Symptom> {
    let mut seen = BTreeSet::new();
    let mut symptoms = Vec::with_capacity(labels.len());
    for label in labels {
        let symptom = Symptom::new(label.as_str());
        if !seen.insert(symptom.clone()) {
            debug!("Ignoring repeated symptom '{}'", symptom);
            continue;
        }
        if !catalogue.is_known(&symptom) {
            warn!(
                "'{}' is not a catalogued symptom and will not match any condition.",
                symptom
            );
        }
        symptoms.push(symptom);
    }
    symptoms
}

fn print_result(result: &MatchResult<'_>) {
    let condition = result.condition;
    println!("Predicted condition: {}", condition.name);
    println!(
        "Confidence:          {}%",
        report::confidence_percent(result.confidence)
    );
    if result.defaulted {
        println!("Matched symptoms:    none (default condition)");
    } else {
        println!(
            "Matched symptoms:    {} of {}",
            result.matched_symptom_count, result.total_symptom_count
        );
    }
    println!("Severity:            {}", condition.severity.as_str().to_uppercase());
    println!("\n{}", condition.description);

    print_list("Recommended precautions", &condition.precautions);
    print_list("Dietary recommendations", &condition.diet_recommendations);

    println!("\n{}", DISCLAIMER);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for item in items {
        println!("  • {}", item);
    }
}
