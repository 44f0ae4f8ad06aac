//! # MedAssist Chat Session
//!
//! File: cli/src/commands/chat/session.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Message history for one conversation with the assistant. A session starts
//! with the greeting as its first bot message; every non-blank user message
//! appends the user message and the selected reply. Blank input is ignored
//! and leaves the history untouched.
//!
//! The session owns presentation state only. Reply selection is delegated to
//! `ResponseTable::select`, which is stateless, so earlier messages never
//! influence later replies.
//!
use crate::engine::reference::ResponseTable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatSession<'a> {
    table: &'a ResponseTable,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl<'a> ChatSession<'a> {
    /// New session seeded with the greeting.
    pub fn new(table: &'a ResponseTable) -> Self {
        let mut session = Self {
            table,
            messages: Vec::new(),
            next_id: 1,
        };
        session.push(table.greeting.clone(), Sender::Bot);
        session
    }

    pub fn greeting(&self) -> &str {
        &self.table.greeting
    }

    pub fn quick_suggestions(&self) -> &[String] {
        &self.table.quick_suggestions
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends a user message and returns the bot reply, or `None` for blank input.
    pub fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        let selection = self.table.select(text);
        debug!("Reply chosen by {}", selection.describe());

        self.push(text.to_string(), Sender::User);
        self.push(selection.text().to_string(), Sender::Bot);
        self.messages.last()
    }

    fn push(&mut self, content: String, sender: Sender) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            content,
            sender,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }
}
