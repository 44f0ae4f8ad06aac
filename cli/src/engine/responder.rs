//! # Response Selector
//!
//! File: cli/src/engine/responder.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Maps one free-text message to one canned reply:
//!
//! 1. lowercase the message,
//! 2. return the reply of the first keyword rule (table order) whose keyword
//!    is a substring of it,
//! 3. otherwise the reply of the first fallback rule with any trigger that is
//!    a substring of it,
//! 4. otherwise the generic reply.
//!
//! Matching is plain substring containment with no word boundaries, so
//! "influenza" fires the `flu` rule and "feversweat" fires `fever`. Rule order
//! belongs to the data: moving a rule changes which reply wins.
//!
use super::reference::{FallbackRule, ResponseRule, ResponseTable};

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Keyword(&'a ResponseRule),
    /// The fallback rule and the trigger that fired it.
    Fallback(&'a FallbackRule, &'a str),
    Generic(&'a str),
}

impl<'a> Selection<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Selection::Keyword(rule) => &rule.response,
            Selection::Fallback(rule, _) => &rule.response,
            Selection::Generic(reply) => reply,
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Selection::Keyword(rule) => format!("keyword '{}'", rule.keyword),
            Selection::Fallback(_, trigger) => format!("fallback trigger '{}'", trigger),
            Selection::Generic(_) => "generic reply".to_string(),
        }
    }
}

/// Finds the rule that answers `user_text`.
pub fn select<'a>(
    user_text: &str,
    rules: &'a [ResponseRule],
    fallbacks: &'a [FallbackRule],
    generic_reply: &'a str,
) -> Selection<'a> {
    let lower = user_text.to_lowercase();

    if let Some(rule) = rules.iter().find(|rule| lower.contains(rule.keyword.as_str())) {
        return Selection::Keyword(rule);
    }

    for rule in fallbacks {
        if let Some(trigger) = rule
            .triggers
            .iter()
            .find(|trigger| lower.contains(trigger.as_str()))
        {
            return Selection::Fallback(rule, trigger);
        }
    }

    Selection::Generic(generic_reply)
}

/// Returns the reply text for `user_text`. Never fails.
pub fn respond<'a>(
    user_text: &str,
    rules: &'a [ResponseRule],
    fallbacks: &'a [FallbackRule],
    generic_reply: &'a str,
) -> &'a str {
    select(user_text, rules, fallbacks, generic_reply).text()
}

impl ResponseTable {
    pub fn select(&self, user_text: &str) -> Selection<'_> {
        select(user_text, &self.rules, &self.fallbacks, &self.generic_reply)
    }

    pub fn respond(&self, user_text: &str) -> &str {
        respond(user_text, &self.rules, &self.fallbacks, &self.generic_reply)
    }
}
