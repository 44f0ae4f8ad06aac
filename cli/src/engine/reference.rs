//! # MedAssist Reference Data
//!
//! File: cli/src/engine/reference.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Static reference tables consumed by the two decision engines:
//! - the **condition catalogue** (known symptoms, conditions, default condition)
//!   used by the matcher, and
//! - the **response table** (keyword rules, fallback rules, generic reply)
//!   used by the response selector.
//!
//! The tables are a versioned TOML document. A copy is compiled into the
//! binary (`cli/data/reference.toml`); a replacement file can be supplied with
//! `--data`, `MEDASSIST_DATA` or `reference.data_file` in the configuration.
//! Whatever the source, the data is parsed once, validated, and then handed
//! to the engines by reference. Nothing mutates it afterwards.
//!
//! ## Validation
//!
//! `ReferenceData::validate` rejects tables that would break the engine
//! contracts, for example a condition with no associated symptoms (the
//! overlap score would divide by zero) or an upper-case keyword (input is
//! lowercased before matching, so it could never fire).
//!
use crate::core::error::{MedassistError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Reference data format version understood by this build.
pub const SUPPORTED_VERSION: u32 = 1;

const BUILTIN_REFERENCE: &str = include_str!("../../data/reference.toml");

/// A symptom label from the published catalogue.
///
/// Labels are compared exactly (case-sensitive); no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symptom(String);

impl Symptom {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symptom {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// How serious a condition is, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogue entry the matcher can predict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Unique key within the catalogue.
    pub name: String,
    /// Static confidence weight in `[0, 1]`. Reported as-is; never derived from symptoms.
    pub base_probability: f64,
    pub description: String,
    /// Ordered, non-empty, duplicate-free.
    pub associated_symptoms: Vec<Symptom>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub diet_recommendations: Vec<String>,
    pub severity: Severity,
}

/// The fixed list of symptoms and conditions available to the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionCatalogue {
    /// Condition returned when nothing overlaps. The first entry when unset.
    #[serde(default)]
    pub default_condition: Option<String>,
    pub symptoms: Vec<Symptom>,
    pub conditions: Vec<Condition>,
}

// Hand-built catalogues only appear in tests; real ones come from TOML.
#[cfg(test)]
impl ConditionCatalogue {
    pub fn new(symptoms: Vec<Symptom>, conditions: Vec<Condition>) -> Self {
        Self {
            default_condition: None,
            symptoms,
            conditions,
        }
    }

    /// Designates the condition returned when no condition overlaps the selection.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_condition = Some(name.into());
        self
    }
}

impl ConditionCatalogue {
    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name == name)
    }

    pub fn is_known(&self, symptom: &Symptom) -> bool {
        self.symptoms.contains(symptom)
    }

    /// Resolves the designated default condition.
    ///
    /// Returns `None` only for an empty catalogue or a dangling
    /// `default_condition` name; validated data never has either.
    pub fn default_condition(&self) -> Option<&Condition> {
        match &self.default_condition {
            Some(name) => self.find(name),
            None => self.conditions.first(),
        }
    }
}

/// Primary keyword rule: lowercase substring → reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseRule {
    pub keyword: String,
    pub response: String,
}

/// Lower-priority rule that fires when any of its triggers appears in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackRule {
    pub triggers: Vec<String>,
    pub response: String,
}

/// Everything the chat surface needs: the ordered rule tables plus canned texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseTable {
    /// First bot message of an interactive session.
    pub greeting: String,
    /// Reply used when no rule matches.
    pub generic_reply: String,
    #[serde(default)]
    pub quick_suggestions: Vec<String>,
    #[serde(default)]
    pub rules: Vec<ResponseRule>,
    #[serde(default)]
    pub fallbacks: Vec<FallbackRule>,
}

/// The complete, versioned set of reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceData {
    pub version: u32,
    pub catalogue: ConditionCatalogue,
    pub chat: ResponseTable,
}

/// Only used to read `version` before the full parse, so that a file written
/// for another format version fails with a version error instead of a
/// confusing field error.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl ReferenceData {
    /// Parses and validates the tables compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_REFERENCE, "built-in reference data")
    }

    /// Reads, parses and validates a reference data file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read reference data file: {}", path.display())
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Loads from `path` when given, otherwise the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let probe: VersionProbe = toml::from_str(content)
            .with_context(|| format!("Failed to read format version from {}", origin))?;
        if probe.version != SUPPORTED_VERSION {
            return Err(MedassistError::UnsupportedDataVersion {
                found: probe.version,
                expected: SUPPORTED_VERSION,
            })
            .with_context(|| format!("Cannot load {}", origin));
        }

        let data: ReferenceData = toml::from_str(content)
            .with_context(|| format!("Failed to parse TOML from {}", origin))?;
        data.validate()
            .with_context(|| format!("Invalid reference data in {}", origin))?;
        Ok(data)
    }

    /// Checks every invariant the engines rely on. Returns the first violation.
    pub fn validate(&self) -> std::result::Result<(), MedassistError> {
        if self.version != SUPPORTED_VERSION {
            return Err(MedassistError::UnsupportedDataVersion {
                found: self.version,
                expected: SUPPORTED_VERSION,
            });
        }
        validate_catalogue(&self.catalogue)?;
        validate_response_table(&self.chat)
    }
}

fn invalid(msg: String) -> MedassistError {
    MedassistError::ReferenceData(msg)
}

fn validate_catalogue(catalogue: &ConditionCatalogue) -> std::result::Result<(), MedassistError> {
    if catalogue.symptoms.is_empty() {
        return Err(invalid("the symptom catalogue is empty".into()));
    }
    let mut known = HashSet::new();
    for symptom in &catalogue.symptoms {
        if symptom.as_str().trim().is_empty() {
            return Err(invalid("the symptom catalogue contains a blank label".into()));
        }
        if !known.insert(symptom) {
            return Err(invalid(format!(
                "symptom '{}' is listed more than once",
                symptom
            )));
        }
    }

    if catalogue.conditions.is_empty() {
        return Err(MedassistError::EmptyCatalogue);
    }
    let mut names = HashSet::new();
    for condition in &catalogue.conditions {
        if condition.name.trim().is_empty() {
            return Err(invalid("a condition has a blank name".into()));
        }
        if !names.insert(condition.name.as_str()) {
            return Err(invalid(format!(
                "condition '{}' is defined more than once",
                condition.name
            )));
        }
        if !condition.base_probability.is_finite()
            || !(0.0..=1.0).contains(&condition.base_probability)
        {
            return Err(invalid(format!(
                "condition '{}' has base_probability {} outside [0, 1]",
                condition.name, condition.base_probability
            )));
        }
        if condition.associated_symptoms.is_empty() {
            return Err(MedassistError::ConditionWithoutSymptoms {
                name: condition.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        for symptom in &condition.associated_symptoms {
            if !seen.insert(symptom) {
                return Err(invalid(format!(
                    "condition '{}' lists symptom '{}' more than once",
                    condition.name, symptom
                )));
            }
            if !known.contains(symptom) {
                return Err(invalid(format!(
                    "condition '{}' uses symptom '{}' which is not in the symptom catalogue",
                    condition.name, symptom
                )));
            }
        }
    }

    if let Some(default) = &catalogue.default_condition {
        if catalogue.find(default).is_none() {
            return Err(invalid(format!(
                "default_condition '{}' does not name a condition in the catalogue",
                default
            )));
        }
    }
    Ok(())
}

fn validate_response_table(table: &ResponseTable) -> std::result::Result<(), MedassistError> {
    if table.generic_reply.trim().is_empty() {
        return Err(invalid("chat.generic_reply must not be empty".into()));
    }
    for (index, rule) in table.rules.iter().enumerate() {
        check_pattern(&rule.keyword, &format!("chat.rules[{}].keyword", index))?;
        if rule.response.trim().is_empty() {
            return Err(invalid(format!(
                "chat.rules[{}] ('{}') has an empty response",
                index, rule.keyword
            )));
        }
    }
    for (index, rule) in table.fallbacks.iter().enumerate() {
        if rule.triggers.is_empty() {
            return Err(invalid(format!(
                "chat.fallbacks[{}] has no triggers",
                index
            )));
        }
        for trigger in &rule.triggers {
            check_pattern(trigger, &format!("chat.fallbacks[{}].triggers", index))?;
        }
        if rule.response.trim().is_empty() {
            return Err(invalid(format!(
                "chat.fallbacks[{}] has an empty response",
                index
            )));
        }
    }
    Ok(())
}

/// Keywords and triggers are matched against lowercased input.
fn check_pattern(pattern: &str, field: &str) -> std::result::Result<(), MedassistError> {
    if pattern.is_empty() {
        return Err(invalid(format!("{} contains an empty pattern", field)));
    }
    if pattern != pattern.to_lowercase() {
        return Err(invalid(format!(
            "{} pattern '{}' is not lowercase and can never match",
            field, pattern
        )));
    }
    Ok(())
}
