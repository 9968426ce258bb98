//! Rookery - a role-tagged team of LLM agents with tools
//!
//! This crate provides:
//! - Agents that turn task text into model-backed, tool-augmented responses
//! - A team layer owning the agent directory, task lifecycle, and ordered
//!   message log
//! - A tool-call wire protocol parsed out of free-form model output
//! - An OpenAI-compatible provider client behind the `LanguageModel` seam

pub mod agent;
pub mod message;
pub mod parser;
pub mod provider;
pub mod role;
pub mod team;
pub mod tool;

pub use agent::{Agent, LanguageModel, LlmError};
pub use message::{Message, SYSTEM_SENDER};
pub use parser::{parse_tool_calls, ToolCall};
pub use provider::{ProviderClient, ProviderConfig};
pub use role::Role;
pub use team::{AgentSummary, StatusReport, Task, TaskStatus, Team, TeamError};
pub use tool::{FnTool, Tool, ToolArgs, ToolError, ToolRegistry};
