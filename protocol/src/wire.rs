//! Wire model for the hosted agents API. The shapes here mirror what the
//! provider actually returns; unknown entry and chunk types are tolerated
//! so new server-side features do not break deserialization.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::request::HandoffExecution;

/// Request body for `POST /v1/agents`.
#[derive(Clone, Debug, Serialize)]
pub struct CreateAgentRequest {
    pub model: String,
    pub name: String,
    pub description: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AgentTool>,
    pub completion_args: CompletionArgs,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct CompletionArgs {
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentTool {
    CodeInterpreter,
    ImageGeneration,
    WebSearch,
    WebSearchPremium,
    Function { function: FunctionSpec },
}

/// JSON-schema description of a callable function exposed to an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// `PATCH /v1/agents/{id}` — only the handoff wiring is ever updated.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateAgentRequest {
    pub handoffs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Request body for `POST /v1/conversations`.
#[derive(Clone, Debug, Serialize)]
pub struct StartConversationRequest {
    pub agent_id: String,
    pub inputs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_execution: Option<HandoffExecution>,
}

/// `POST /v1/conversations/{id}` continuation carrying a local function
/// result back to the agent.
#[derive(Clone, Debug, Serialize)]
pub struct ContinueConversationRequest {
    pub tool_call_id: String,
    pub result: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum OutputEntry {
    #[serde(rename = "message.output")]
    MessageOutput { content: MessageContent },
    #[serde(rename = "tool.execution")]
    ToolExecution {
        name: String,
        #[serde(default)]
        info: ToolExecutionInfo,
    },
    #[serde(rename = "handoff.execution")]
    HandoffExecution {
        agent_id: String,
        #[serde(default)]
        inputs: String,
    },
    #[serde(rename = "tool.calls")]
    ToolCalls {
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ToolExecutionInfo {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub code_output: String,
}

/// Message content arrives either as a bare string or as a list of typed
/// chunks, depending on which tools participated in the turn.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Chunks(Vec<ContentChunk>),
}

impl MessageContent {
    /// Concatenated text of the message; non-text chunks are skipped.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Chunks(chunks) => chunks
                .iter()
                .filter_map(|chunk| match chunk {
                    ContentChunk::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentChunk {
    Text {
        text: String,
    },
    ToolFile {
        tool: String,
        file_id: String,
        #[serde(default)]
        file_name: String,
        #[serde(default)]
        file_type: String,
    },
    ToolReference {
        tool: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        url: String,
        #[serde(default)]
        source: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    // The provider returns the function call arguments as a *string* that
    // contains JSON, not as an already-parsed object. The adapter parses it
    // before dispatching to the local registry.
    pub arguments: String,
}
