//! # MedAssist Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the MedAssist CLI. Each command
//! module defines its own clap arguments struct and a `handle_*` function
//! that receives the parsed arguments together with the configuration and
//! reference data loaded once in `main.rs`.
//!
//! ## Command Groups
//!
//! - `diagnose`: predict a condition from symptoms, optionally write a report
//! - `chat`: keyword-based health assistant (one-shot or interactive)
//! - `catalogue`: inspect or validate the reference tables
//! - `srv`: local JSON API over the engines
//!

/// Condition matching from the command line, plus the analysis report.
pub mod diagnose;
/// One-shot replies and the interactive chat session.
pub mod chat;
/// Listing, lookup and validation of reference data.
pub mod catalogue;
/// The HTTP API server.
pub mod srv;
