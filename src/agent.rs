//! Agent - turns task text into a model-backed, tool-augmented response
//!
//! An agent owns its tool registry and an append-only memory of team
//! messages. It knows nothing about tasks or teams; orchestration is the
//! job of `Team` in team.rs.

use crate::message::Message;
use crate::parser::parse_tool_calls;
use crate::role::Role;
use crate::tool::{Tool, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Number of memory entries summarized into the system prompt.
const MEMORY_WINDOW: usize = 10;

/// Errors from the language-model service. The orchestration core never
/// catches these; they surface to whoever triggered the call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("model backend unreachable: {0}")]
    Unavailable(String),
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// The text-generation backend an agent thinks with.
///
/// Injected so agents are testable without a live backend; see
/// `provider::ProviderClient` for the production implementation.
/// Implementations should bound the round trip and report
/// [`LlmError::Timeout`] when the bound elapses.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, LlmError>;
}

/// A named, role-tagged team member.
pub struct Agent {
    pub name: String,
    pub role: Role,
    /// Free-form context appended to the system prompt. The team stamps
    /// this when the agent joins.
    pub context: String,
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    memory: Vec<Message>,
}

impl Agent {
    pub fn new(name: impl Into<String>, role: Role, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            name: name.into(),
            role,
            context: String::new(),
            model,
            tools: ToolRegistry::new(),
            memory: Vec::new(),
        }
    }

    /// Register a tool. Re-registering a name replaces the prior entry.
    pub fn add_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.register(tool);
    }

    /// Deliver a message into this agent's memory.
    pub fn add_memory(&mut self, message: Message) {
        self.memory.push(message);
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn memory(&self) -> &[Message] {
        &self.memory
    }

    /// Summarize the most recent `last_n` messages, oldest first within the
    /// window, one rendered line each.
    pub fn memory_summary(&self, last_n: usize) -> String {
        let skip = self.memory.len().saturating_sub(last_n);
        let summary = self.memory[skip..]
            .iter()
            .map(Message::render)
            .collect::<Vec<_>>()
            .join("\n");
        if summary.is_empty() {
            "No messages yet.".to_string()
        } else {
            summary
        }
    }

    /// Assemble the system prompt: identity, role responsibilities, tool
    /// list, recent team memory, free-form context. Deterministic for a
    /// given agent state.
    pub fn system_prompt(&self) -> String {
        let tools = if self.tools.is_empty() {
            "None yet".to_string()
        } else {
            self.tools.describe()
        };
        format!(
            "You are {}, a {} in a software team.\n\n\
             Your responsibilities:\n{}\n\n\
             Available tools:\n{}\n\n\
             Recent team memory:\n{}\n\n\
             {}\n",
            self.name,
            self.role.as_str(),
            self.role.responsibilities(),
            tools,
            self.memory_summary(MEMORY_WINDOW),
            self.context,
        )
    }

    /// Ask the model about a task and return its raw reply.
    pub async fn think(&self, task: &str) -> Result<String, LlmError> {
        let prompt = format!("{}\n\nTask: {}", self.system_prompt(), task);
        self.model.generate(&prompt, None).await
    }

    /// Think about a task, dispatch any tool calls found in the reply, and
    /// append one result envelope per match, in token order. Names with no
    /// local registration are skipped; tool failures land in the envelope
    /// rather than failing the task.
    pub async fn execute(&self, task: &str) -> Result<String, LlmError> {
        let mut response = self.think(task).await?;
        for call in parse_tool_calls(&response) {
            match self.tools.get(&call.name) {
                Some(tool) => {
                    let envelope = tool.invoke(&call.args);
                    response.push_str(&format!("\n[Tool Result ({})]: {}", call.name, envelope));
                }
                None => {
                    debug!("Agent {} skipping unregistered tool {}", self.name, call.name);
                }
            }
        }
        Ok(response)
    }
}
