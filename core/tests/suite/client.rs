#![allow(clippy::unwrap_used)]

use explorer_core::AgentsBackend;
use explorer_core::Config;
use explorer_core::ExplorerErr;
use explorer_core::HttpBackend;
use explorer_protocol::artifact::Artifact;
use explorer_protocol::request::CapabilityRequest;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = Config::new("test-key", Some(server.uri())).unwrap();
    HttpBackend::new(&config).unwrap()
}

fn code_request() -> CapabilityRequest {
    CapabilityRequest::Code {
        prompt: "print(1+1)".to_string(),
    }
}

#[tokio::test]
async fn code_submit_produces_the_executed_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ag_1",
            "name": "Code Interpreter Agent"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv_1",
            "outputs": [
                { "type": "message.output", "content": "2" },
                {
                    "type": "tool.execution",
                    "name": "code_interpreter",
                    "info": { "code": "print(1+1)", "code_output": "2\n" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = backend_for(&server).invoke(code_request()).await.unwrap();
    let Artifact::CodeRun { text, code_blocks } = artifact else {
        panic!("expected a code artifact");
    };
    assert_eq!(text, "2");
    assert_eq!(code_blocks.len(), 1);
    assert_eq!(code_blocks[0].output, "2\n");
}

#[tokio::test]
async fn rate_limit_maps_to_a_distinct_error_without_retrying() {
    let server = MockServer::start().await;

    // `expect(1)` doubles as the no-retry assertion: a second attempt would
    // fail verification when the server shuts down.
    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .invoke(code_request())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExplorerErr::RateLimited {
            retry_after: Some(7)
        }
    ));
}

#[tokio::test]
async fn unauthorized_maps_to_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .invoke(code_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerErr::Auth(status) if status.as_u16() == 401));
}

#[tokio::test]
async fn other_server_errors_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .invoke(code_request())
        .await
        .unwrap_err();
    let ExplorerErr::UnexpectedStatus { status, body } = err else {
        panic!("expected an unexpected-status error");
    };
    assert_eq!(status.as_u16(), 500);
    assert_eq!(body, "boom");
}

#[tokio::test]
async fn undecodable_body_maps_to_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .invoke(code_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerErr::Decode(msg) if msg.contains("not json")));
}

#[tokio::test]
async fn validation_failures_never_reach_the_wire() {
    let server = MockServer::start().await;

    let err = backend_for(&server)
        .invoke(CapabilityRequest::Code {
            prompt: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerErr::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
