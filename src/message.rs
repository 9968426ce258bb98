//! Team communication records
//!
//! A `Message` is written once and never mutated. The team log and every
//! agent memory each hold their own copy, appended in broadcast order.

use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender identity stamped on team-authored broadcasts.
pub const SYSTEM_SENDER: &str = "SYSTEM";

/// Characters of message content shown in a memory summary line.
const SUMMARY_CONTENT_CHARS: usize = 200;

/// A single communication event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A system-authored broadcast, stamped as the product manager speaking
    /// for the team.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(SYSTEM_SENDER, Role::ProductManager, content)
    }

    /// Render one memory-summary line: `[sender (role)]: content`, content
    /// cut to 200 characters.
    pub fn render(&self) -> String {
        format!(
            "[{} ({})]: {}",
            self.sender,
            self.role.as_str(),
            truncate(&self.content, SUMMARY_CONTENT_CHARS)
        )
    }
}

/// Cut a string to at most `max` characters, on a char boundary.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
