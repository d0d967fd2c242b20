use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use tracing::debug;

use explorer_protocol::artifact::Artifact;
use explorer_protocol::artifact::CodeBlock;
use explorer_protocol::artifact::FunctionCallTrace;
use explorer_protocol::artifact::FunctionResultTrace;
use explorer_protocol::artifact::GeneratedImage;
use explorer_protocol::artifact::HandoffTrace;
use explorer_protocol::artifact::SourceRef;
use explorer_protocol::artifact::ToolExecutionTrace;
use explorer_protocol::request::CapabilityRequest;
use explorer_protocol::request::HandoffExecution;
use explorer_protocol::wire::ContentChunk;
use explorer_protocol::wire::ContinueConversationRequest;
use explorer_protocol::wire::ConversationResponse;
use explorer_protocol::wire::MessageContent;
use explorer_protocol::wire::OutputEntry;
use explorer_protocol::wire::StartConversationRequest;
use explorer_protocol::wire::UpdateAgentRequest;

use crate::client::AgentsClient;
use crate::config::Config;
use crate::error::ExplorerErr;
use crate::error::Result;
use crate::functions::FunctionRegistry;
use crate::presets;

/// The adapter boundary between page controllers and the provider. One
/// `invoke` call is one user-visible interaction; implementations perform a
/// single attempt and never retry.
#[async_trait]
pub trait AgentsBackend: Send + Sync {
    async fn invoke(&self, request: CapabilityRequest) -> Result<Artifact>;
}

pub struct HttpBackend {
    client: AgentsClient,
    functions: FunctionRegistry,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: AgentsClient::new(config)?,
            functions: FunctionRegistry,
        })
    }
}

#[async_trait]
impl AgentsBackend for HttpBackend {
    async fn invoke(&self, request: CapabilityRequest) -> Result<Artifact> {
        request.validate().map_err(ExplorerErr::Validation)?;
        debug!("invoking {}", request.capability());
        match request {
            CapabilityRequest::Code { prompt } => self.run_code(&prompt).await,
            CapabilityRequest::Image { prompt } => self.generate_image(&prompt).await,
            CapabilityRequest::Search { prompt, premium } => self.search(&prompt, premium).await,
            CapabilityRequest::Orchestration {
                prompt,
                handoff_execution,
            } => self.orchestrate(&prompt, handoff_execution).await,
            CapabilityRequest::Function { prompt } => self.call_functions(&prompt).await,
        }
    }
}

impl HttpBackend {
    async fn start(&self, agent_id: String, prompt: &str) -> Result<ConversationResponse> {
        self.client
            .start_conversation(&StartConversationRequest {
                agent_id,
                inputs: prompt.to_string(),
                handoff_execution: None,
            })
            .await
    }

    async fn run_code(&self, prompt: &str) -> Result<Artifact> {
        let agent = self.client.create_agent(&presets::code_agent()).await?;
        let response = self.start(agent.id, prompt).await?;

        let mut text = String::new();
        let mut code_blocks = Vec::new();
        for output in &response.outputs {
            match output {
                OutputEntry::MessageOutput { content } => text.push_str(&content.text()),
                OutputEntry::ToolExecution { name, info } if name == "code_interpreter" => {
                    code_blocks.push(CodeBlock {
                        code: info.code.clone(),
                        output: info.code_output.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(Artifact::CodeRun { text, code_blocks })
    }

    async fn generate_image(&self, prompt: &str) -> Result<Artifact> {
        let agent = self.client.create_agent(&presets::image_agent()).await?;
        let response = self.start(agent.id, prompt).await?;

        let mut text = String::new();
        let mut image = None;
        for output in &response.outputs {
            let OutputEntry::MessageOutput { content } = output else {
                continue;
            };
            match content {
                MessageContent::Text(t) => text.push_str(t),
                MessageContent::Chunks(chunks) => {
                    for chunk in chunks {
                        match chunk {
                            ContentChunk::Text { text: t } => text.push_str(t),
                            ContentChunk::ToolFile {
                                tool,
                                file_id,
                                file_name,
                                file_type,
                            } if tool == "image_generation" => {
                                let bytes = self.client.download_file(file_id).await?;
                                image = Some(GeneratedImage {
                                    bytes,
                                    file_name: file_name.clone(),
                                    file_type: file_type.clone(),
                                });
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        if text.is_empty() {
            text = "Here is the generated image.".to_string();
        }
        Ok(Artifact::Image { text, image })
    }

    async fn search(&self, prompt: &str, premium: bool) -> Result<Artifact> {
        let agent = self
            .client
            .create_agent(&presets::web_search_agent(premium))
            .await?;
        let response = self.start(agent.id, prompt).await?;

        let mut text = String::new();
        let mut sources = Vec::new();
        for output in &response.outputs {
            let OutputEntry::MessageOutput { content } = output else {
                continue;
            };
            match content {
                MessageContent::Text(t) => text.push_str(t),
                MessageContent::Chunks(chunks) => {
                    for chunk in chunks {
                        match chunk {
                            ContentChunk::Text { text: t } => text.push_str(t),
                            ContentChunk::ToolReference {
                                tool,
                                title,
                                url,
                                source,
                            } if tool == "web_search" || tool == "web_search_premium" => {
                                sources.push(SourceRef {
                                    title: title.clone(),
                                    url: url.clone(),
                                    source: source.clone(),
                                });
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        Ok(Artifact::SearchAnswer { text, sources })
    }

    async fn orchestrate(
        &self,
        prompt: &str,
        handoff_execution: HandoffExecution,
    ) -> Result<Artifact> {
        let finance = self.client.create_agent(&presets::finance_agent()).await?;
        let web = self
            .client
            .create_agent(&presets::market_search_agent())
            .await?;
        let calc = self
            .client
            .create_agent(&presets::calculator_agent())
            .await?;
        let graph = self.client.create_agent(&presets::graph_agent()).await?;

        // Handoff graph: the lead may delegate anywhere, search may delegate
        // to calculation and plotting, calculation may delegate to plotting.
        self.client
            .update_agent(
                &finance.id,
                &UpdateAgentRequest {
                    handoffs: vec![web.id.clone(), calc.id.clone(), graph.id.clone()],
                },
            )
            .await?;
        self.client
            .update_agent(
                &web.id,
                &UpdateAgentRequest {
                    handoffs: vec![calc.id.clone(), graph.id.clone()],
                },
            )
            .await?;
        self.client
            .update_agent(
                &calc.id,
                &UpdateAgentRequest {
                    handoffs: vec![graph.id.clone()],
                },
            )
            .await?;

        let response = self
            .client
            .start_conversation(&StartConversationRequest {
                agent_id: finance.id.clone(),
                inputs: prompt.to_string(),
                handoff_execution: Some(handoff_execution),
            })
            .await?;

        let names = [
            (finance.id.as_str(), "finance"),
            (web.id.as_str(), "web_search"),
            (calc.id.as_str(), "calculator"),
            (graph.id.as_str(), "graph"),
        ];

        let mut text = String::new();
        let mut handoffs = Vec::new();
        let mut tool_executions = Vec::new();
        for output in &response.outputs {
            match output {
                OutputEntry::MessageOutput { content } => text.push_str(&content.text()),
                OutputEntry::HandoffExecution { agent_id, inputs } => {
                    let agent_name = names
                        .iter()
                        .find(|(id, _)| *id == agent_id.as_str())
                        .map(|(_, name)| (*name).to_string())
                        .unwrap_or_else(|| "unknown agent".to_string());
                    handoffs.push(HandoffTrace {
                        agent_name,
                        agent_id: agent_id.clone(),
                        inputs: inputs.clone(),
                    });
                }
                OutputEntry::ToolExecution { name, info } => {
                    tool_executions.push(ToolExecutionTrace {
                        name: name.clone(),
                        code: info.code.clone(),
                        output: info.code_output.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(Artifact::Orchestration {
            text,
            handoffs,
            tool_executions,
        })
    }

    async fn call_functions(&self, prompt: &str) -> Result<Artifact> {
        let agent = self
            .client
            .create_agent(&presets::function_agent(self.functions.specs()))
            .await?;
        let response = self.start(agent.id, prompt).await?;
        let conversation_id = response.conversation_id.clone();

        let mut initial_text = String::new();
        let mut calls = Vec::new();
        for output in &response.outputs {
            match output {
                OutputEntry::MessageOutput { content } => initial_text.push_str(&content.text()),
                OutputEntry::ToolCalls { tool_calls } => {
                    for call in tool_calls {
                        let arguments: Value = serde_json::from_str(&call.function.arguments)
                            .unwrap_or_else(|_| json!({ "raw_args": call.function.arguments }));
                        calls.push(FunctionCallTrace {
                            call_id: call.id.clone(),
                            name: call.function.name.clone(),
                            arguments,
                        });
                    }
                }
                _ => {}
            }
        }

        let mut results = Vec::new();
        let mut final_text = String::new();
        for call in &calls {
            let result = self.functions.execute(&call.name, &call.arguments)?;
            let continued = self
                .client
                .continue_conversation(
                    &conversation_id,
                    &ContinueConversationRequest {
                        tool_call_id: call.call_id.clone(),
                        result: result.to_string(),
                    },
                )
                .await?;
            for output in &continued.outputs {
                if let OutputEntry::MessageOutput { content } = output {
                    final_text.push_str(&content.text());
                }
            }
            results.push(FunctionResultTrace {
                call_id: call.call_id.clone(),
                name: call.name.clone(),
                result,
            });
        }

        // Without any function calls the initial answer already is the
        // final one.
        let text = if calls.is_empty() {
            initial_text
        } else {
            final_text
        };
        Ok(Artifact::FunctionExchange {
            text,
            calls,
            results,
        })
    }
}
