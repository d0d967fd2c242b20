use async_trait::async_trait;
use serde_json::json;

use explorer_protocol::artifact::Artifact;
use explorer_protocol::artifact::CodeBlock;
use explorer_protocol::artifact::FunctionCallTrace;
use explorer_protocol::artifact::FunctionResultTrace;
use explorer_protocol::artifact::GeneratedImage;
use explorer_protocol::artifact::HandoffTrace;
use explorer_protocol::artifact::SourceRef;
use explorer_protocol::artifact::ToolExecutionTrace;
use explorer_protocol::request::CapabilityRequest;

use crate::backend::AgentsBackend;
use crate::error::ExplorerErr;
use crate::error::Result;

/// 1x1 transparent PNG, enough for the UI and export paths to treat the
/// mock image like a real one.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xfc,
    0xff, 0x9f, 0xa1, 0x1e, 0x00, 0x05, 0x83, 0x02, 0x7f, 0x96, 0x41, 0x1c, 0xd5, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Offline backend with deterministic canned artifacts. Used by
/// `agents-explorer --mock` and by UI tests; no network is touched.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockBackend;

#[async_trait]
impl AgentsBackend for MockBackend {
    async fn invoke(&self, request: CapabilityRequest) -> Result<Artifact> {
        request.validate().map_err(ExplorerErr::Validation)?;
        Ok(match request {
            CapabilityRequest::Code { .. } => Artifact::CodeRun {
                text: "The result of 1+1 is 2.".to_string(),
                code_blocks: vec![CodeBlock {
                    code: "print(1+1)".to_string(),
                    output: "2\n".to_string(),
                }],
            },
            CapabilityRequest::Image { .. } => Artifact::Image {
                text: "Here is the generated image.".to_string(),
                image: Some(GeneratedImage {
                    bytes: PIXEL_PNG.to_vec(),
                    file_name: "mock-image".to_string(),
                    file_type: "png".to_string(),
                }),
            },
            CapabilityRequest::Search { premium, .. } => Artifact::SearchAnswer {
                text: "Mock search answer with one cited source.".to_string(),
                sources: vec![SourceRef {
                    title: if premium {
                        "Premium mock source".to_string()
                    } else {
                        "Mock source".to_string()
                    },
                    url: "https://example.com".to_string(),
                    source: "example".to_string(),
                }],
            },
            CapabilityRequest::Orchestration { .. } => Artifact::Orchestration {
                text: "Mock orchestration summary.".to_string(),
                handoffs: vec![HandoffTrace {
                    agent_name: "calculator".to_string(),
                    agent_id: "ag_mock_calc".to_string(),
                    inputs: "compute compound interest".to_string(),
                }],
                tool_executions: vec![ToolExecutionTrace {
                    name: "code_interpreter".to_string(),
                    code: "10000 * 1.05 ** 10".to_string(),
                    output: "16288.94".to_string(),
                }],
            },
            CapabilityRequest::Function { .. } => Artifact::FunctionExchange {
                text: "The current US interest rate is 5.5%.".to_string(),
                calls: vec![FunctionCallTrace {
                    call_id: "call_mock_1".to_string(),
                    name: "get_interest_rate".to_string(),
                    arguments: json!({ "region": "US" }),
                }],
                results: vec![FunctionResultTrace {
                    call_id: "call_mock_1".to_string(),
                    name: "get_interest_rate".to_string(),
                    result: json!({
                        "region": "US",
                        "interest_rate": "5.5%",
                        "central_bank": "Federal Reserve",
                    }),
                }],
            },
        })
    }
}
