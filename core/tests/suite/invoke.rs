#![allow(clippy::unwrap_used)]

use explorer_core::AgentsBackend;
use explorer_core::Config;
use explorer_core::HttpBackend;
use explorer_protocol::artifact::Artifact;
use explorer_protocol::request::CapabilityRequest;
use explorer_protocol::request::HandoffExecution;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = Config::new("test-key", Some(server.uri())).unwrap();
    HttpBackend::new(&config).unwrap()
}

async fn mount_agent(server: &MockServer, name: &str, id: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .and(body_partial_json(json!({ "name": name })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id, "name": name })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn image_bytes_round_trip_exactly() {
    let server = MockServer::start().await;
    mount_agent(&server, "Image Generation Agent", "ag_img").await;

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_img",
            "outputs": [{
                "type": "message.output",
                "content": [
                    { "type": "text", "text": "Here you go." },
                    {
                        "type": "tool_file",
                        "tool": "image_generation",
                        "file_id": "file_7",
                        "file_name": "sunset",
                        "file_type": "png"
                    }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let payload: Vec<u8> = vec![0x89, 0x50, 0x4e, 0x47, 0x01, 0x02, 0x03];
    Mock::given(method("GET"))
        .and(path("/v1/files/file_7/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = backend_for(&server)
        .invoke(CapabilityRequest::Image {
            prompt: "a sunset".to_string(),
        })
        .await
        .unwrap();

    let Artifact::Image { text, image } = artifact else {
        panic!("expected an image artifact");
    };
    assert_eq!(text, "Here you go.");
    let image = image.unwrap();
    assert_eq!(image.bytes, payload);
    assert_eq!(image.download_name(), "sunset.png");
}

#[tokio::test]
async fn search_collects_answer_and_sources() {
    let server = MockServer::start().await;
    mount_agent(&server, "Web Search Agent", "ag_search").await;

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(json!({ "agent_id": "ag_search" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_s",
            "outputs": [{
                "type": "message.output",
                "content": [
                    { "type": "text", "text": "Fusion milestones were announced." },
                    {
                        "type": "tool_reference",
                        "tool": "web_search",
                        "title": "Fusion press release",
                        "url": "https://example.com/fusion",
                        "source": "example"
                    }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let artifact = backend_for(&server)
        .invoke(CapabilityRequest::Search {
            prompt: "latest fusion news".to_string(),
            premium: false,
        })
        .await
        .unwrap();

    let Artifact::SearchAnswer { text, sources } = artifact else {
        panic!("expected a search artifact");
    };
    assert_eq!(text, "Fusion milestones were announced.");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].url, "https://example.com/fusion");
}

#[tokio::test]
async fn function_calls_execute_locally_and_continue_the_conversation() {
    let server = MockServer::start().await;
    mount_agent(&server, "Function Call Agent", "ag_fn").await;

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(json!({ "agent_id": "ag_fn" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_fn",
            "outputs": [{
                "type": "tool.calls",
                "tool_calls": [{
                    "id": "call_1",
                    "function": {
                        "name": "get_interest_rate",
                        "arguments": "{\"region\": \"US\"}"
                    }
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/conversations/conv_fn"))
        .and(body_partial_json(json!({ "tool_call_id": "call_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_fn",
            "outputs": [
                { "type": "message.output", "content": "The US rate is 5.5%." }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = backend_for(&server)
        .invoke(CapabilityRequest::Function {
            prompt: "What is the current interest rate in the US?".to_string(),
        })
        .await
        .unwrap();

    let Artifact::FunctionExchange {
        text,
        calls,
        results,
    } = artifact
    else {
        panic!("expected a function artifact");
    };
    assert_eq!(text, "The US rate is 5.5%.");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "get_interest_rate");
    assert_eq!(calls[0].arguments, json!({ "region": "US" }));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result["interest_rate"], "5.5%");
}

#[tokio::test]
async fn orchestration_wires_handoffs_and_names_the_delegates() {
    let server = MockServer::start().await;
    mount_agent(&server, "Finance Agent", "ag_fin").await;
    mount_agent(&server, "Web Search Agent", "ag_web").await;
    mount_agent(&server, "Calculator Agent", "ag_calc").await;
    mount_agent(&server, "Graph Agent", "ag_graph").await;

    for agent_id in ["ag_fin", "ag_web", "ag_calc"] {
        Mock::given(method("PATCH"))
            .and(path(format!("/v1/agents/{agent_id}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": agent_id, "name": "" })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(json!({
            "agent_id": "ag_fin",
            "handoff_execution": "server"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_o",
            "outputs": [
                {
                    "type": "handoff.execution",
                    "agent_id": "ag_calc",
                    "inputs": "compute compound interest"
                },
                {
                    "type": "tool.execution",
                    "name": "code_interpreter",
                    "info": { "code": "10000 * 1.05 ** 10", "code_output": "16288.94" }
                },
                { "type": "message.output", "content": "Your savings would grow to $16,288.94." }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = backend_for(&server)
        .invoke(CapabilityRequest::Orchestration {
            prompt: "How much would $10,000 grow in 10 years?".to_string(),
            handoff_execution: HandoffExecution::Server,
        })
        .await
        .unwrap();

    let Artifact::Orchestration {
        text,
        handoffs,
        tool_executions,
    } = artifact
    else {
        panic!("expected an orchestration artifact");
    };
    assert_eq!(text, "Your savings would grow to $16,288.94.");
    assert_eq!(handoffs.len(), 1);
    assert_eq!(handoffs[0].agent_name, "calculator");
    assert_eq!(handoffs[0].agent_id, "ag_calc");
    assert_eq!(tool_executions.len(), 1);
    assert_eq!(tool_executions[0].output, "16288.94");
}
