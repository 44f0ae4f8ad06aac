//! # MedAssist Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout MedAssist. It follows
//! the same two-part approach everywhere:
//! - `MedassistError`: a `thiserror` enum naming each specific failure
//! - `Result<T>`: an alias for `anyhow::Result<T>` so command handlers can
//!   attach context to I/O and parsing failures
//!
//! The decision engines (`crate::engine`) return `MedassistError` directly
//! (not wrapped in anyhow) so that callers can match on precondition
//! violations such as an empty symptom selection. The `?` operator converts
//! them into `anyhow::Error` at the command layer.
//!
//! ## Examples
//!
//! ```rust
//! // Fail fast on a caller precondition
//! if selected.is_empty() {
//!     return Err(MedassistError::EmptySymptomSelection);
//! }
//!
//! // Add context to I/O errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read reference data file: {}", path.display()))?;
//!
//! // Recover the typed error from an anyhow chain
//! if let Some(MedassistError::ConditionNotFound { name }) = err.downcast_ref::<MedassistError>() {
//!     eprintln!("No condition named {name}");
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the MedAssist application.
#[derive(Error, Debug)]
pub enum MedassistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("Unsupported reference data version {found} (this build reads version {expected}).")]
    UnsupportedDataVersion { found: u32, expected: u32 },

    #[error("No symptoms selected. Select at least one symptom before running the analysis.")]
    EmptySymptomSelection,

    #[error("Condition catalogue is empty.")]
    EmptyCatalogue,

    #[error("Condition '{name}' has no associated symptoms.")]
    ConditionWithoutSymptoms { name: String },

    #[error("Condition '{name}' not found.")]
    ConditionNotFound { name: String },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
