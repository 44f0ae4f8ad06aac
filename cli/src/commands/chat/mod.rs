//! # MedAssist Chat Command
//!
//! File: cli/src/commands/chat/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Talks to the rule-based health assistant.
//!
//! - With a message on the command line, prints the single reply and exits.
//! - Without one, starts an interactive session: the greeting is printed,
//!   each line typed is answered, and `bye` (or end of input) ends it.
//! - `--suggestions` lists the canned example questions.
//!
//! ## Usage
//!
//! ```bash
//! medassist chat "What should I eat for diabetes?"
//! medassist chat --suggestions
//! medassist chat
//! ```
//!
pub mod session;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::engine::reference::ReferenceData;
use anyhow::Context;
use clap::Parser;
use session::ChatSession;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Arguments for `medassist chat`.
#[derive(Parser, Debug)]
#[command(about = "Ask the health assistant a question")]
pub struct ChatArgs {
    /// Message to answer. Starts an interactive session when omitted.
    #[arg(value_name = "MESSAGE", trailing_var_arg = true)]
    pub message: Vec<String>,

    /// List example questions and exit.
    #[arg(long, conflicts_with = "message")]
    pub suggestions: bool,
}

/// Handles `medassist chat`.
pub fn handle_chat(args: ChatArgs, config: &Config, reference: &ReferenceData) -> Result<()> {
    debug!("Chat args: {:?}", args);
    let mut session = ChatSession::new(&reference.chat);

    if args.suggestions {
        for suggestion in session.quick_suggestions() {
            println!("{}", suggestion);
        }
        return Ok(());
    }

    if !args.message.is_empty() {
        let text = args.message.join(" ");
        match session.send(&text) {
            Some(reply) => println!("{}", reply.content),
            None => info!("Message is blank; nothing to answer."),
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl(
        &mut session,
        &config.chat.assistant_name,
        stdin.lock(),
        stdout.lock(),
    )
}

/// Interactive loop. Ends on `bye` (any case) or end of input.
fn run_repl<R: BufRead, W: Write>(
    session: &mut ChatSession<'_>,
    assistant: &str,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "{}: {}", assistant, session.greeting())?;
    if !session.quick_suggestions().is_empty() {
        writeln!(output, "Try asking:")?;
        for suggestion in session.quick_suggestions() {
            writeln!(output, "  - {}", suggestion)?;
        }
    }
    writeln!(output, "Type 'bye' to quit.")?;

    loop {
        write!(output, "You: ")?;
        output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read chat input")?;
        if read == 0 {
            writeln!(output)?;
            break;
        }

        let text = line.trim();
        if text.eq_ignore_ascii_case("bye") {
            writeln!(output, "{}: Goodbye! Take care.", assistant)?;
            break;
        }
        if let Some(reply) = session.send(text) {
            writeln!(output, "{}: {}", assistant, reply.content)?;
        }
    }

    debug!("Chat session ended after {} messages", session.messages().len());
    Ok(())
}
