//! # MedAssist Decision Engines
//!
//! File: cli/src/engine/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The only decision logic in MedAssist lives here:
//! - `matcher`: ranks conditions by symptom overlap and returns the best one
//! - `responder`: picks a canned reply for a free-text message
//! - `reference`: the static tables both engines read
//!
//! The engines are independent of each other and of the command layer. They
//! take immutable inputs, return plain values, and never log, sleep, or touch
//! the filesystem. Command handlers in `crate::commands` own rendering,
//! reports, message history and any simulated delay.
//!
//! ## Usage
//!
//! ```rust
//! let data = reference::ReferenceData::builtin()?;
//!
//! let selected = ["Fever", "Cough"].into_iter().map(Symptom::from).collect();
//! let result = matcher::match_condition(&selected, &data.catalogue)?;
//!
//! let reply = data.chat.respond("what causes headaches?");
//! ```
//!
pub mod matcher;
pub mod reference;
pub mod responder;
