//! Tool system
//!
//! Tools implement the `Tool` trait and are registered with `ToolRegistry`.
//! Invocation is failure-contained: `invoke` always yields a JSON envelope,
//! and a failing callable lands in the envelope instead of propagating.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Keyword arguments for a tool call, as parsed from model output.
pub type ToolArgs = Map<String, Value>;

/// Error raised by a wrapped callable. Captured into the failure envelope
/// by `invoke`, never raised past it.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ToolError(pub String);

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// A named, described capability an agent can dispatch to.
pub trait Tool: Send + Sync {
    /// Tool name (used for dispatch)
    fn name(&self) -> &str;

    /// Description shown to the model in the system prompt
    fn description(&self) -> &str;

    /// Documented argument names. Not validated against the args actually
    /// supplied; a tool that misses an argument reports it through the
    /// failure envelope.
    fn required_args(&self) -> &[String] {
        &[]
    }

    /// Run the underlying callable.
    fn call(&self, args: &ToolArgs) -> Result<Value, ToolError>;

    /// Invoke the tool and capture the outcome into a JSON envelope:
    /// `{"success": true, "result": ...}` or
    /// `{"success": false, "error": ...}`.
    fn invoke(&self, args: &ToolArgs) -> String {
        let envelope = match self.call(args) {
            Ok(result) => json!({ "success": true, "result": result }),
            Err(err) => json!({ "success": false, "error": err.to_string() }),
        };
        envelope.to_string()
    }
}

/// Adapter turning an arbitrary closure into a [`Tool`].
pub struct FnTool {
    name: String,
    description: String,
    required_args: Vec<String>,
    func: Box<dyn Fn(&ToolArgs) -> Result<Value, ToolError> + Send + Sync>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ToolArgs) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            required_args: Vec::new(),
            func: Box::new(func),
        }
    }

    /// Attach the documented argument list.
    pub fn with_required_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn required_args(&self) -> &[String] {
        &self.required_args
    }

    fn call(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        (self.func)(args)
    }
}

/// Registry of available tools. Insertion-ordered so prompt assembly stays
/// deterministic.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool. Re-registering a name replaces the prior entry.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// One `- name: description` line per tool, in registration order.
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
