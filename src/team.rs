//! Team orchestration and task lifecycle
//!
//! A team owns its agents, its tasks, and the ordered message log. The log
//! is the single source of truth for communication order: every broadcast
//! appends there first, then lands in each current member's memory.
//!
//! Nothing here is internally synchronized. Task creation, assignment,
//! execution, and broadcast run as one synchronous chain per caller
//! invocation (the model round trip inside `execute_task` is the only
//! await point); callers wanting concurrency bring their own locking.

use crate::agent::{Agent, LlmError};
use crate::message::{truncate, Message};
use crate::role::Role;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Characters of a task result echoed into the completion broadcast.
const RESULT_PREVIEW_CHARS: usize = 500;

/// Task lifecycle state. Moves forward along pending -> assigned ->
/// in_progress -> completed; `blocked` is entered only through
/// [`Team::block_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

/// A unit of work tracked by a team.
///
/// `result` and `completed_at` are set exactly when `status` is
/// `Completed`.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    fn new(id: String, description: String) -> Self {
        Self {
            id,
            description,
            assigned_to: None,
            status: TaskStatus::Pending,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Orchestration failures, reported synchronously to whoever called
/// assign/execute. Model failures pass through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("agent {0} not found")]
    AgentNotFound(String),
    #[error("task {0} not assigned")]
    TaskNotAssigned(String),
    #[error("task {0} already completed")]
    TaskCompleted(String),
    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Read-only snapshot of a team, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub team: String,
    pub agents: Vec<AgentSummary>,
    pub tasks: Vec<Task>,
    pub messages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub role: Role,
}

/// A team of collaborative agents.
pub struct Team {
    pub name: String,
    agents: IndexMap<String, Agent>,
    tasks: IndexMap<String, Task>,
    message_log: Vec<Message>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agents: IndexMap::new(),
            tasks: IndexMap::new(),
            message_log: Vec::new(),
        }
    }

    /// Add an agent to the team. The agent's free-form context is stamped
    /// with the team name so it shows up in every prompt.
    pub fn add_agent(&mut self, mut agent: Agent) {
        agent.context = format!("Team: {}", self.name);
        debug!("Agent {} ({}) joined team {}", agent.name, agent.role, self.name);
        self.agents.insert(agent.name.clone(), agent);
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// First agent with a given role, in registration order.
    pub fn agent_by_role(&self, role: Role) -> Option<&Agent> {
        self.agents.values().find(|a| a.role == role)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn message_log(&self) -> &[Message] {
        &self.message_log
    }

    /// Broadcast a message: append to the team log, then deliver a copy to
    /// every agent currently on the team, in that order. Agents added
    /// later do not receive earlier broadcasts.
    pub fn broadcast_message(&mut self, message: Message) {
        self.message_log.push(message.clone());
        for agent in self.agents.values_mut() {
            agent.add_memory(message.clone());
        }
    }

    /// Create a new task in `pending`. Reusing an id replaces the prior
    /// task.
    pub fn create_task(&mut self, id: impl Into<String>, description: impl Into<String>) -> &Task {
        let id = id.into();
        if self.tasks.contains_key(&id) {
            warn!("Task {} already exists, replacing it", id);
        }
        let task = Task::new(id.clone(), description.into());
        self.tasks.insert(id.clone(), task);
        &self.tasks[id.as_str()]
    }

    /// Assign a task to an agent and announce it to the team.
    pub fn assign_task(&mut self, task_id: &str, agent_name: &str) -> Result<(), TeamError> {
        let announcement = {
            let task = self
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| TeamError::TaskNotFound(task_id.to_string()))?;
            if !self.agents.contains_key(agent_name) {
                return Err(TeamError::AgentNotFound(agent_name.to_string()));
            }
            task.assigned_to = Some(agent_name.to_string());
            task.status = TaskStatus::Assigned;
            format!(
                "Task {} assigned to {}: {}",
                task_id, agent_name, task.description
            )
        };
        info!("Task {} assigned to {}", task_id, agent_name);
        self.broadcast_message(Message::system(announcement));
        Ok(())
    }

    /// Run a task through its assigned agent.
    ///
    /// Transitions to `in_progress`, announces the start, executes, stores
    /// the result, transitions to `completed`, and announces completion
    /// with a preview of the result. Model failures propagate and leave
    /// the task `in_progress`. Re-executing a completed task re-runs the
    /// agent and overwrites the prior result.
    pub async fn execute_task(&mut self, task_id: &str) -> Result<&Task, TeamError> {
        let (agent_name, description) = {
            let task = self
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| TeamError::TaskNotFound(task_id.to_string()))?;
            let agent_name = task
                .assigned_to
                .clone()
                .ok_or_else(|| TeamError::TaskNotAssigned(task_id.to_string()))?;
            if task.status == TaskStatus::Completed {
                warn!("Re-executing completed task {}, prior result will be overwritten", task_id);
                task.result = None;
                task.completed_at = None;
            }
            task.status = TaskStatus::InProgress;
            (agent_name, task.description.clone())
        };

        self.broadcast_message(Message::system(format!(
            "Executing task {} with {}",
            task_id, agent_name
        )));

        let agent = self
            .agents
            .get(&agent_name)
            .ok_or_else(|| TeamError::AgentNotFound(agent_name.clone()))?;
        let result = agent.execute(&description).await?;
        let sender = agent.name.clone();
        let role = agent.role;

        let preview = format!(
            "Completed task {}. Result: {}...",
            task_id,
            truncate(&result, RESULT_PREVIEW_CHARS)
        );

        {
            let task = self
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| TeamError::TaskNotFound(task_id.to_string()))?;
            task.result = Some(result);
            task.status = TaskStatus::Completed;
            task.completed_at = Some(Utc::now());
        }
        info!("Task {} completed by {}", task_id, sender);
        self.broadcast_message(Message::new(sender, role, preview));

        self.tasks
            .get(task_id)
            .ok_or_else(|| TeamError::TaskNotFound(task_id.to_string()))
    }

    /// Move a task into `blocked` and announce it. Completed tasks cannot
    /// be blocked.
    pub fn block_task(&mut self, task_id: &str) -> Result<(), TeamError> {
        let task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| TeamError::TaskNotFound(task_id.to_string()))?;
        if task.status == TaskStatus::Completed {
            return Err(TeamError::TaskCompleted(task_id.to_string()));
        }
        task.status = TaskStatus::Blocked;
        warn!("Task {} blocked", task_id);
        self.broadcast_message(Message::system(format!("Task {} is blocked", task_id)));
        Ok(())
    }

    /// Read-only snapshot: team name, agents with role labels, every task
    /// record field-for-field, and the message count.
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            team: self.name.clone(),
            agents: self
                .agents
                .values()
                .map(|a| AgentSummary {
                    name: a.name.clone(),
                    role: a.role,
                })
                .collect(),
            tasks: self.tasks.values().cloned().collect(),
            messages: self.message_log.len(),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Team({}, agents={}, tasks={})",
            self.name,
            self.agents.len(),
            self.tasks.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::LanguageModel;
    use crate::message::SYSTEM_SENDER;
    use crate::tool::{FnTool, ToolError};
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct StaticModel(String);

    #[async_trait::async_trait]
    impl LanguageModel for StaticModel {
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: Option<u32>,
        ) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct DownModel;

    #[async_trait::async_trait]
    impl LanguageModel for DownModel {
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: Option<u32>,
        ) -> Result<String, LlmError> {
            Err(LlmError::Unavailable("connection refused".to_string()))
        }
    }

    fn agent(name: &str, role: Role, reply: &str) -> Agent {
        Agent::new(name, role, Arc::new(StaticModel(reply.to_string())))
    }

    fn init_logs() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("rookery=debug")
            .try_init();
    }

    #[test]
    fn test_add_agent_stamps_team_context() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        assert_eq!(team.agent("Alice").unwrap().context, "Team: T1");
    }

    #[test]
    fn test_agent_by_role_finds_first_match() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        team.add_agent(agent("Bob", Role::Reviewer, "ok"));
        team.add_agent(agent("Carol", Role::Reviewer, "ok"));

        assert_eq!(team.agent_by_role(Role::Reviewer).unwrap().name, "Bob");
        assert!(team.agent_by_role(Role::Architect).is_none());
    }

    #[test]
    fn test_broadcast_reaches_log_and_every_current_member() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        team.add_agent(agent("Bob", Role::Reviewer, "ok"));

        team.broadcast_message(Message::system("kickoff"));
        assert_eq!(team.message_log().len(), 1);
        assert_eq!(team.agent("Alice").unwrap().memory().len(), 1);
        assert_eq!(team.agent("Bob").unwrap().memory().len(), 1);

        // A late joiner does not retroactively receive earlier broadcasts.
        team.add_agent(agent("Carol", Role::Tester, "ok"));
        team.broadcast_message(Message::system("second"));
        assert_eq!(team.message_log().len(), 2);
        assert_eq!(team.agent("Alice").unwrap().memory().len(), 2);
        assert_eq!(team.agent("Carol").unwrap().memory().len(), 1);
        assert_eq!(team.agent("Carol").unwrap().memory()[0].content, "second");
    }

    #[test]
    fn test_create_task_starts_pending() {
        let mut team = Team::new("T1");
        let task = team.create_task("t1", "design the auth flow");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.assigned_to.is_none());
        assert!(task.result.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_create_task_with_same_id_replaces() {
        let mut team = Team::new("T1");
        team.create_task("t1", "first description");
        team.create_task("t1", "second description");

        let report = team.status_report();
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.tasks[0].description, "second description");
    }

    #[test]
    fn test_assign_task_transitions_and_announces() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        team.create_task("t1", "design the auth flow");

        team.assign_task("t1", "Alice").unwrap();

        let task = team.task("t1").unwrap();
        assert_eq!(task.status, TaskStatus::Assigned);
        assert_eq!(task.assigned_to.as_deref(), Some("Alice"));

        let msg = &team.message_log()[0];
        assert_eq!(msg.sender, SYSTEM_SENDER);
        assert_eq!(msg.role, Role::ProductManager);
        assert_eq!(msg.content, "Task t1 assigned to Alice: design the auth flow");
        assert_eq!(team.agent("Alice").unwrap().memory().len(), 1);
    }

    #[test]
    fn test_assign_task_unknown_task_or_agent() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        team.create_task("t1", "work");

        assert!(matches!(
            team.assign_task("nope", "Alice"),
            Err(TeamError::TaskNotFound(_))
        ));
        assert!(matches!(
            team.assign_task("t1", "Mallory"),
            Err(TeamError::AgentNotFound(_))
        ));
        // Failed assignment leaves the task untouched.
        assert_eq!(team.task("t1").unwrap().status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_execute_task_full_lifecycle() {
        init_logs();
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "the design is done"));
        team.create_task("t1", "design the auth flow");
        team.assign_task("t1", "Alice").unwrap();

        let task = team.execute_task("t1").await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.result.as_deref(), Some("the design is done"));
        assert!(task.completed_at.is_some());

        // assignment, execution start, completion
        let log = team.message_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].content, "Executing task t1 with Alice");
        assert_eq!(log[2].sender, "Alice");
        assert_eq!(log[2].role, Role::Engineer);
        assert_eq!(
            log[2].content,
            "Completed task t1. Result: the design is done..."
        );
    }

    #[tokio::test]
    async fn test_execute_task_unknown_id() {
        let mut team = Team::new("T1");
        assert!(matches!(
            team.execute_task("nope").await,
            Err(TeamError::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_unassigned_task_leaves_status_pending() {
        let mut team = Team::new("T1");
        team.create_task("t1", "work");

        assert!(matches!(
            team.execute_task("t1").await,
            Err(TeamError::TaskNotAssigned(_))
        ));
        assert_eq!(team.task("t1").unwrap().status, TaskStatus::Pending);
        assert!(team.message_log().is_empty());
    }

    #[tokio::test]
    async fn test_execute_task_model_failure_leaves_in_progress() {
        let mut team = Team::new("T1");
        team.add_agent(Agent::new("Alice", Role::Engineer, Arc::new(DownModel)));
        team.create_task("t1", "work");
        team.assign_task("t1", "Alice").unwrap();

        let err = team.execute_task("t1").await.unwrap_err();
        assert!(matches!(err, TeamError::Model(LlmError::Unavailable(_))));

        let task = team.task("t1").unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.result.is_none());
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_tool_call_round_trip() {
        let reply = r#"Result: [TOOL: double, ARGS: {"n": 4}]"#;
        let mut worker = agent("Alice", Role::Engineer, reply);
        worker.add_tool(FnTool::new("double", "Double a number", |args| {
            let n = args
                .get("n")
                .and_then(Value::as_i64)
                .ok_or_else(|| ToolError::new("missing n"))?;
            Ok(json!(n * 2))
        }));

        let mut team = Team::new("T1");
        team.add_agent(worker);
        team.create_task("t1", "double the number 4");
        team.assign_task("t1", "Alice").unwrap();

        let task = team.execute_task("t1").await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);

        let result = task.result.as_deref().unwrap();
        let line = result
            .lines()
            .find(|l| l.starts_with("[Tool Result (double)]: "))
            .unwrap();
        let envelope: Value =
            serde_json::from_str(line.strip_prefix("[Tool Result (double)]: ").unwrap()).unwrap();
        assert_eq!(envelope["success"], json!(true));
        assert_eq!(envelope["result"], json!(8));
    }

    #[tokio::test]
    async fn test_reexecuting_completed_task_overwrites_result() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "same reply"));
        team.create_task("t1", "work");
        team.assign_task("t1", "Alice").unwrap();

        team.execute_task("t1").await.unwrap();
        let first_completed_at = team.task("t1").unwrap().completed_at.unwrap();

        team.execute_task("t1").await.unwrap();
        let task = team.task("t1").unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.result.as_deref(), Some("same reply"));
        assert!(task.completed_at.unwrap() >= first_completed_at);
    }

    #[test]
    fn test_block_task() {
        let mut team = Team::new("T1");
        team.create_task("t1", "work");

        team.block_task("t1").unwrap();
        assert_eq!(team.task("t1").unwrap().status, TaskStatus::Blocked);
        assert_eq!(team.message_log().last().unwrap().content, "Task t1 is blocked");
    }

    #[tokio::test]
    async fn test_block_completed_task_is_rejected() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "done"));
        team.create_task("t1", "work");
        team.assign_task("t1", "Alice").unwrap();
        team.execute_task("t1").await.unwrap();

        assert!(matches!(
            team.block_task("t1"),
            Err(TeamError::TaskCompleted(_))
        ));
        assert_eq!(team.task("t1").unwrap().status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_status_report_exposes_every_task_field() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "done"));
        team.add_agent(agent("Diana", Role::ProductManager, "ok"));
        team.create_task("t1", "work");
        team.assign_task("t1", "Alice").unwrap();
        team.execute_task("t1").await.unwrap();

        let report = team.status_report();
        assert_eq!(report.team, "T1");
        assert_eq!(report.messages, 3);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["agents"][0]["name"], json!("Alice"));
        assert_eq!(value["agents"][0]["role"], json!("engineer"));
        assert_eq!(value["agents"][1]["role"], json!("product_manager"));

        let record = &value["tasks"][0];
        for field in [
            "id",
            "description",
            "assigned_to",
            "status",
            "result",
            "created_at",
            "completed_at",
        ] {
            assert!(record.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(record["status"], json!("completed"));
    }

    #[test]
    fn test_display_summary() {
        let mut team = Team::new("T1");
        team.add_agent(agent("Alice", Role::Engineer, "ok"));
        team.create_task("t1", "work");
        assert_eq!(team.to_string(), "Team(T1, agents=1, tasks=1)");
    }
}
