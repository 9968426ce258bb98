//! Tool-call extraction from model output
//!
//! The model requests a tool with a literal token anywhere in its reply:
//!
//! ```text
//! [TOOL: tool_name, ARGS: {"key": "value"}]
//! ```
//!
//! Keywords are case-sensitive. The ARGS matcher stops at the first closing
//! brace, so a JSON object with nested braces in a value does not match.
//! Downstream callers emit this exact shape; keep it stable.

use crate::tool::ToolArgs;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A single parsed invocation request, in order of appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: ToolArgs,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[TOOL:\s*(\w+),\s*ARGS:\s*(\{[^}]+\})\]").unwrap())
}

/// Extract all tool-call tokens, left to right. A token whose ARGS payload
/// is not a valid JSON object is dropped without error; there is no limit
/// on the number of tokens in one text.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    for caps in token_pattern().captures_iter(text) {
        let name = caps[1].to_string();
        match serde_json::from_str::<ToolArgs>(&caps[2]) {
            Ok(args) => calls.push(ToolCall { name, args }),
            Err(err) => {
                debug!("Dropping tool call {}: bad ARGS payload: {}", name, err);
            }
        }
    }
    calls
}
