use serde::Deserialize;
use serde::Serialize;

use crate::turn::Capability;

/// A capability-specific request payload, built fresh per interaction and
/// discarded once the call it produced completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum CapabilityRequest {
    Code {
        prompt: String,
    },
    Image {
        prompt: String,
    },
    Search {
        prompt: String,
        premium: bool,
    },
    Orchestration {
        prompt: String,
        handoff_execution: HandoffExecution,
    },
    Function {
        prompt: String,
    },
}

/// Whether the provider resolves handoffs between agents on its side or
/// returns them for the client to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffExecution {
    #[default]
    Server,
    Client,
}

impl CapabilityRequest {
    pub fn capability(&self) -> Capability {
        match self {
            CapabilityRequest::Code { .. } => Capability::Code,
            CapabilityRequest::Image { .. } => Capability::Image,
            CapabilityRequest::Search { .. } => Capability::Search,
            CapabilityRequest::Orchestration { .. } => Capability::Orchestration,
            CapabilityRequest::Function { .. } => Capability::Function,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            CapabilityRequest::Code { prompt }
            | CapabilityRequest::Image { prompt }
            | CapabilityRequest::Search { prompt, .. }
            | CapabilityRequest::Orchestration { prompt, .. }
            | CapabilityRequest::Function { prompt } => prompt,
        }
    }

    /// Reject payloads that would be malformed before they reach the wire.
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt().trim().is_empty() {
            return Err("prompt must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_rejected() {
        let req = CapabilityRequest::Code {
            prompt: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn populated_prompt_passes_validation() {
        let req = CapabilityRequest::Search {
            prompt: "latest AI developments".to_string(),
            premium: true,
        };
        assert_eq!(req.validate(), Ok(()));
        assert_eq!(req.capability(), Capability::Search);
    }
}
