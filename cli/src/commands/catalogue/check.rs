//! # MedAssist Reference Data Check
//!
//! File: cli/src/commands/catalogue/check.rs
//! Author: Christi Mahu
//!
//! `medassist catalogue check <PATH>` parses and validates a reference data
//! file with the same rules used at startup, then prints a summary. Any
//! violation is returned as an error and the process exits non-zero.
//!
use crate::core::error::Result;
use crate::engine::reference::ReferenceData;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Reference data file (TOML).
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,
}

pub fn handle_check(args: CheckArgs) -> Result<()> {
    info!("Validating reference data in {}", args.path.display());
    let data = ReferenceData::from_path(&args.path)?;
    println!("{}", summarize(&data, &args.path.display().to_string()));
    Ok(())
}

fn summarize(data: &ReferenceData, origin: &str) -> String {
    let default = data
        .catalogue
        .default_condition()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    format!(
        "{} is valid (format version {}): {} symptoms, {} conditions (default: {}), \
         {} keyword rules, {} fallback rules.",
        origin,
        data.version,
        data.catalogue.symptoms.len(),
        data.catalogue.conditions.len(),
        default,
        data.chat.rules.len(),
        data.chat.fallbacks.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_builtin_data() {
        let data = ReferenceData::builtin().unwrap();
        let summary = summarize(&data, "built-in");
        assert_eq!(
            summary,
            "built-in is valid (format version 1): 28 symptoms, 3 conditions (default: Common Cold), \
             6 keyword rules, 3 fallback rules."
        );
    }

    #[test]
    fn test_check_missing_file_fails() {
        let args = CheckArgs {
            path: PathBuf::from("/definitely/not/here.toml"),
        };
        assert!(handle_check(args).is_err());
    }
}
