//! # MedAssist Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every command:
//! - `config`: configuration loading, merging, and validation
//! - `error`: error types and the crate-wide `Result` alias
//! - `templating`: Tera rendering used for the analysis report
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{MedassistError, Result}; // For error handling
//! use crate::core::templating; // For report rendering
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
