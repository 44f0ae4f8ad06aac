//! # MedAssist Analysis Report
//!
//! File: cli/src/commands/diagnose/report.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds the downloadable plain-text report for one analysis: the selected
//! symptoms, the predicted condition with its confidence percentage, the
//! description, precautions, diet, severity and a disclaimer.
//!
//! The layout lives in a Tera template (`cli/templates/report.txt.tera`,
//! replaceable with `report.template` in the configuration). This module only
//! assembles the template context and names the output file. The report is
//! written on request and never read back.
//!
use crate::core::error::Result;
use crate::core::templating;
use crate::engine::matcher::MatchResult;
use crate::engine::reference::Symptom;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Built-in report layout.
pub const BUILTIN_TEMPLATE: &str = include_str!("../../../templates/report.txt.tera");

/// Template variables available to report templates.
#[derive(Debug, Serialize)]
pub struct ReportContext<'a> {
    pub generated_on: String,
    pub symptoms: &'a [Symptom],
    pub condition: &'a str,
    pub confidence_percent: u32,
    pub description: &'a str,
    pub precautions: &'a [String],
    pub diet: &'a [String],
    pub severity: &'a str,
}

impl<'a> ReportContext<'a> {
    pub fn new(symptoms: &'a [Symptom], result: &MatchResult<'a>, generated_on: NaiveDate) -> Self {
        let condition = result.condition;
        Self {
            generated_on: generated_on.format("%Y-%m-%d").to_string(),
            symptoms,
            condition: &condition.name,
            confidence_percent: confidence_percent(result.confidence),
            description: &condition.description,
            precautions: &condition.precautions,
            diet: &condition.diet_recommendations,
            severity: condition.severity.as_str(),
        }
    }
}

/// Confidence as a whole percentage, rounded half up.
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence * 100.0).round() as u32
}

/// `medical-report-<unix millis>.txt`
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("medical-report-{}.txt", now.timestamp_millis())
}

/// Renders the report text for `symptoms` (in selection order) and `result`.
pub fn render_report(
    template: &str,
    symptoms: &[Symptom],
    result: &MatchResult<'_>,
    generated_on: NaiveDate,
) -> Result<String> {
    let context = ReportContext::new(symptoms, result, generated_on);
    templating::render_str("analysis report", template, &context)
}

/// Renders the report and writes it into `dir`. Returns the file path.
pub fn write_report(
    dir: &Path,
    template: &str,
    symptoms: &[Symptom],
    result: &MatchResult<'_>,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let content = render_report(template, symptoms, result, now.date_naive())?;
    let path = dir.join(report_file_name(now));
    templating::write_rendered(&path, &content)?;
    info!("Analysis report for '{}' saved", result.condition.name);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matcher::match_condition;
    use crate::engine::reference::ReferenceData;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::tempdir;

    fn symptoms(labels: &[&str]) -> Vec<Symptom> {
        labels.iter().map(|&l| Symptom::from(l)).collect()
    }

    #[test]
    fn test_confidence_percent_rounds() {
        assert_eq!(confidence_percent(0.85), 85);
        assert_eq!(confidence_percent(0.7), 70);
        assert_eq!(confidence_percent(0.125), 13);
        assert_eq!(confidence_percent(0.0), 0);
        assert_eq!(confidence_percent(1.0), 100);
    }

    #[test]
    fn test_builtin_report_layout() -> Result<()> {
        let data = ReferenceData::builtin()?;
        let selected = symptoms(&["Fever", "Cough", "Loss of taste"]);
        let set: BTreeSet<Symptom> = selected.iter().cloned().collect();
        let result = match_condition(&set, &data.catalogue)?;
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let report = render_report(BUILTIN_TEMPLATE, &selected, &result, date)?;

        assert!(report.starts_with("MEDICAL ANALYSIS REPORT\nGenerated on: 2026-10-19\n"));
        assert!(report.contains("PATIENT SYMPTOMS:\n• Fever\n• Cough\n• Loss of taste\n\n"));
        assert!(report.contains("PREDICTED CONDITION: COVID-19\nCONFIDENCE: 85%\n"));
        assert!(report.contains("DESCRIPTION:\nA viral respiratory illness caused by SARS-CoV-2\n"));
        assert!(report.contains("RECOMMENDED PRECAUTIONS:\n• Isolate for 10 days\n• Wear a mask\n"));
        assert!(report.contains("DIETARY RECOMMENDATIONS:\n• Warm fluids\n"));
        assert!(report.contains("SEVERITY: MODERATE\n"));
        assert!(report.contains("DISCLAIMER: This is an AI-generated analysis"));
        Ok(())
    }

    #[test]
    fn test_symptoms_keep_selection_order() -> Result<()> {
        let data = ReferenceData::builtin()?;
        let selected = symptoms(&["Runny nose", "Congestion"]);
        let set: BTreeSet<Symptom> = selected.iter().cloned().collect();
        let result = match_condition(&set, &data.catalogue)?;
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let report = render_report(BUILTIN_TEMPLATE, &selected, &result, date)?;
        assert!(report.contains("• Runny nose\n• Congestion\n"));
        assert!(report.contains("SEVERITY: MILD"));
        Ok(())
    }

    #[test]
    fn test_custom_template() -> Result<()> {
        let data = ReferenceData::builtin()?;
        let selected = symptoms(&["Chills"]);
        let set: BTreeSet<Symptom> = selected.iter().cloned().collect();
        let result = match_condition(&set, &data.catalogue)?;
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let report = render_report(
            "{{ condition }}|{{ confidence_percent }}|{{ severity }}|{{ symptoms | length }}",
            &selected,
            &result,
            date,
        )?;
        assert_eq!(report, "Influenza|70|moderate|1");
        Ok(())
    }

    #[test]
    fn test_write_report_names_file_by_timestamp() -> Result<()> {
        let data = ReferenceData::builtin()?;
        let selected = symptoms(&["Cough"]);
        let set: BTreeSet<Symptom> = selected.iter().cloned().collect();
        let result = match_condition(&set, &data.catalogue)?;
        let now = Local.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let dir = tempdir()?;

        let path = write_report(dir.path(), BUILTIN_TEMPLATE, &selected, &result, now)?;

        assert_eq!(path, dir.path().join("medical-report-1700000000123.txt"));
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("PREDICTED CONDITION: Common Cold"));
        Ok(())
    }
}
