//! # Condition Matcher
//!
//! File: cli/src/engine/matcher.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Scores every condition in a catalogue by how much of its symptom list the
//! user selected, and returns the best one.
//!
//! - `overlap = |selected ∩ associated| / |associated|`
//! - conditions are visited in catalogue order and only a strictly greater
//!   overlap replaces the current best, so ties go to the earlier entry
//! - when nothing overlaps at all, the catalogue's designated default
//!   condition is returned with `defaulted = true`
//!
//! The reported `confidence` is the winner's static `base_probability`.
//! The overlap ratio only ranks conditions and is never reported as
//! confidence. Callers that want the ratio can compute it from
//! `matched_symptom_count / total_symptom_count` (see `MatchResult::overlap`).
//!
//! The function is pure: no logging, no I/O, no hidden state.
//!
use super::reference::{Condition, ConditionCatalogue, Symptom};
use crate::core::error::MedassistError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of one matcher invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub condition: &'a Condition,
    /// The condition's `base_probability`, echoed unchanged.
    pub confidence: f64,
    pub matched_symptom_count: usize,
    pub total_symptom_count: usize,
    /// True when no condition overlapped and the default condition was used.
    pub defaulted: bool,
}

impl MatchResult<'_> {
    /// Ranking score of the winner. Not the reported confidence.
    pub fn overlap(&self) -> f64 {
        self.matched_symptom_count as f64 / self.total_symptom_count as f64
    }
}

/// Picks the condition whose symptom list best overlaps `selected`.
///
/// # Errors
///
/// * `EmptySymptomSelection` if `selected` is empty. The caller must not run
///   an analysis with nothing selected, and the matcher refuses to guess.
/// * `EmptyCatalogue` if the catalogue holds no conditions.
/// * `ConditionWithoutSymptoms` if a condition has an empty symptom list.
/// * `ConditionNotFound` if the designated default condition does not exist
///   and it was needed.
///
/// Symptoms outside the catalogue are not an error; they match nothing.
pub fn match_condition<'a>(
    selected: &BTreeSet<Symptom>,
    catalogue: &'a ConditionCatalogue,
) -> Result<MatchResult<'a>, MedassistError> {
    if selected.is_empty() {
        return Err(MedassistError::EmptySymptomSelection);
    }
    if catalogue.conditions.is_empty() {
        return Err(MedassistError::EmptyCatalogue);
    }

    // (condition, matched, total) of the best candidate so far.
    let mut best: Option<(&Condition, usize, usize)> = None;

    for condition in &catalogue.conditions {
        let total = condition.associated_symptoms.len();
        if total == 0 {
            return Err(MedassistError::ConditionWithoutSymptoms {
                name: condition.name.clone(),
            });
        }
        let matched = condition
            .associated_symptoms
            .iter()
            .filter(|symptom| selected.contains(*symptom))
            .count();

        // Exact fraction comparison: matched/total > best_matched/best_total.
        let beats_best = match best {
            None => matched > 0,
            Some((_, best_matched, best_total)) => matched * best_total > best_matched * total,
        };
        if beats_best {
            best = Some((condition, matched, total));
        }
    }

    match best {
        Some((condition, matched, total)) => Ok(MatchResult {
            condition,
            confidence: condition.base_probability,
            matched_symptom_count: matched,
            total_symptom_count: total,
            defaulted: false,
        }),
        None => {
            let condition =
                catalogue
                    .default_condition()
                    .ok_or_else(|| MedassistError::ConditionNotFound {
                        name: catalogue.default_condition.clone().unwrap_or_default(),
                    })?;
            Ok(MatchResult {
                condition,
                confidence: condition.base_probability,
                matched_symptom_count: 0,
                total_symptom_count: condition.associated_symptoms.len(),
                defaulted: true,
            })
        }
    }
}
