//! # MedAssist CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! is compiled as its own crate and runs the real `medassist` binary.
//!
//! The binary reads a user configuration file, a project `.medassist.toml`
//! and several environment variables. `medassist_in` pins all of them to a
//! scratch directory so a developer's own setup cannot leak into the tests.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// # Get MedAssist Command (`medassist_cmd`)
///
/// An `assert_cmd::Command` for the compiled `medassist` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn medassist_cmd() -> Command {
    Command::cargo_bin("medassist").expect("Failed to find medassist binary for testing")
}

/// `medassist_cmd` running inside `dir`, with `dir` as HOME and config root
/// and the MedAssist environment variables cleared.
pub fn medassist_in(dir: &Path) -> Command {
    let mut cmd = medassist_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("MEDASSIST_DATA")
        .env_remove("MEDASSIST_REPORT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a project configuration file into `dir`. A `.git` marker is
/// created too so the upward search stops there.
pub fn write_project_config(dir: &Path, content: &str) {
    fs::create_dir_all(dir.join(".git")).expect("Failed to create .git marker");
    fs::write(dir.join(".medassist.toml"), content).expect("Failed to write project config");
}

/// Built-in reference data with `replace` applied, written to `dir/name`.
pub fn write_reference_variant(dir: &Path, name: &str, replace: &[(&str, &str)]) -> std::path::PathBuf {
    let mut content = include_str!("../data/reference.toml").to_string();
    for (from, to) in replace {
        assert!(content.contains(from), "reference data has no '{}'", from);
        content = content.replace(from, to);
    }
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write reference data variant");
    path
}
