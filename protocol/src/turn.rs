use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::artifact::Artifact;

/// The provider capabilities the explorer fronts, one page each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Code,
    Image,
    Search,
    Orchestration,
    Function,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Code,
        Capability::Image,
        Capability::Search,
        Capability::Orchestration,
        Capability::Function,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Capability::Code => "Code Interpreter",
            Capability::Image => "Image Generation",
            Capability::Search => "Web Search",
            Capability::Orchestration => "Agent Orchestration",
            Capability::Function => "Function Calls",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// One recorded exchange entry in a session. Turns are strictly
/// append-ordered and never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub capability: Capability,
    pub content: TurnContent,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(capability: Capability, prompt: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            capability,
            content: TurnContent::Prompt {
                text: prompt.into(),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn agent(capability: Capability, artifact: Artifact) -> Self {
        Self {
            role: Role::Agent,
            capability,
            content: TurnContent::Artifact { artifact },
            timestamp: Utc::now(),
        }
    }

    /// The primary text of the turn: the prompt for user turns, the
    /// artifact's message text for agent turns.
    pub fn text(&self) -> &str {
        match &self.content {
            TurnContent::Prompt { text } => text,
            TurnContent::Artifact { artifact } => artifact.text(),
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match &self.content {
            TurnContent::Prompt { .. } => None,
            TurnContent::Artifact { artifact } => Some(artifact),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnContent {
    Prompt { text: String },
    Artifact { artifact: Artifact },
}
