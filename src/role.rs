//! Team role definitions
//!
//! The role set is closed. Labels are stable: they appear in prompts,
//! broadcasts, and status reports, so renaming one is a wire change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role on the software team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Engineer,
    #[serde(rename = "code_reviewer")]
    Reviewer,
    Architect,
    #[serde(rename = "qa_engineer")]
    Tester,
    ProductManager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Engineer => "engineer",
            Role::Reviewer => "code_reviewer",
            Role::Architect => "architect",
            Role::Tester => "qa_engineer",
            Role::ProductManager => "product_manager",
        }
    }

    /// Responsibility lines injected into the agent's system prompt.
    pub fn responsibilities(&self) -> &'static str {
        match self {
            Role::Engineer => {
                "- Implement the task in small, reviewable steps\n\
                 - Use tools when necessary\n\
                 - Communicate decisions and blockers to the team"
            }
            Role::Reviewer => {
                "- Review work for correctness, clarity, and security\n\
                 - Be specific: point at the exact line or decision\n\
                 - Communicate decisions and blockers to the team"
            }
            Role::Architect => {
                "- Shape the design before code is written\n\
                 - Weigh trade-offs explicitly and pick one\n\
                 - Communicate decisions and blockers to the team"
            }
            Role::Tester => {
                "- Probe the work for failures before users find them\n\
                 - Use tools when necessary\n\
                 - Communicate decisions and blockers to the team"
            }
            Role::ProductManager => {
                "- Keep tasks scoped and prioritized\n\
                 - Turn ambiguity into concrete requirements\n\
                 - Communicate decisions and blockers to the team"
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
