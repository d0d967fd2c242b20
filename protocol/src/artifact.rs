use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::turn::Capability;

/// Output produced by one successful agent invocation. An artifact is
/// referenced by exactly one turn; nothing is shared across turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    CodeRun {
        text: String,
        code_blocks: Vec<CodeBlock>,
    },
    Image {
        text: String,
        image: Option<GeneratedImage>,
    },
    SearchAnswer {
        text: String,
        sources: Vec<SourceRef>,
    },
    Orchestration {
        text: String,
        handoffs: Vec<HandoffTrace>,
        tool_executions: Vec<ToolExecutionTrace>,
    },
    FunctionExchange {
        text: String,
        calls: Vec<FunctionCallTrace>,
        results: Vec<FunctionResultTrace>,
    },
}

impl Artifact {
    /// The primary message text of the artifact.
    pub fn text(&self) -> &str {
        match self {
            Artifact::CodeRun { text, .. }
            | Artifact::Image { text, .. }
            | Artifact::SearchAnswer { text, .. }
            | Artifact::Orchestration { text, .. }
            | Artifact::FunctionExchange { text, .. } => text,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Artifact::CodeRun { .. } => Capability::Code,
            Artifact::Image { .. } => Capability::Image,
            Artifact::SearchAnswer { .. } => Capability::Search,
            Artifact::Orchestration { .. } => Capability::Orchestration,
            Artifact::FunctionExchange { .. } => Capability::Function,
        }
    }

    /// Image bytes, when this artifact carries a generated image.
    pub fn image_bytes(&self) -> Option<&[u8]> {
        match self {
            Artifact::Image {
                image: Some(image), ..
            } => Some(&image.bytes),
            _ => None,
        }
    }
}

/// One sandbox execution surfaced by the code-interpreter tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    pub output: String,
}

/// Provider-generated image, stored byte-exact as downloaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub file_type: String,
}

impl GeneratedImage {
    /// `<file_name>.<file_type>`, the name used when exporting to disk.
    pub fn download_name(&self) -> String {
        if self.file_type.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}.{}", self.file_name, self.file_type)
        }
    }
}

/// A web-search citation attached to an answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
    pub source: String,
}

/// One delegation from the lead agent to a specialist during orchestration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandoffTrace {
    pub agent_name: String,
    pub agent_id: String,
    pub inputs: String,
}

/// A provider-side tool run observed during orchestration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionTrace {
    pub name: String,
    pub code: String,
    pub output: String,
}

/// A function call the agent requested from us.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallTrace {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// The locally computed result we returned for a function call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionResultTrace {
    pub call_id: String,
    pub name: String,
    pub result: Value,
}
