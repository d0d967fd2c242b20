use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::RETRY_AFTER;
use reqwest::header::USER_AGENT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;
use tracing::warn;

use explorer_protocol::wire::Agent;
use explorer_protocol::wire::ContinueConversationRequest;
use explorer_protocol::wire::ConversationResponse;
use explorer_protocol::wire::CreateAgentRequest;
use explorer_protocol::wire::StartConversationRequest;
use explorer_protocol::wire::UpdateAgentRequest;

use crate::config::Config;
use crate::error::ExplorerErr;
use crate::error::Result;

/// Thin typed wrapper over the provider HTTP API. Every method performs
/// exactly one attempt; failures surface immediately and the user decides
/// whether to resubmit.
#[derive(Clone, Debug)]
pub struct AgentsClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl AgentsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(USER_AGENT, HeaderValue::from_static("agents-explorer"));
        let value = format!("Bearer {}", self.api_key);
        if let Ok(hv) = HeaderValue::from_str(&value) {
            h.insert(AUTHORIZATION, hv);
        }
        h
    }

    pub async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent> {
        let url = format!("{}/v1/agents", self.base_url);
        self.post_json(&url, request).await
    }

    pub async fn update_agent(&self, agent_id: &str, request: &UpdateAgentRequest) -> Result<Agent> {
        let url = format!("{}/v1/agents/{agent_id}", self.base_url);
        trace!("PATCH {url}");
        let res = self
            .http
            .patch(&url)
            .headers(self.headers())
            .json(request)
            .send()
            .await?;
        decode(&url, res).await
    }

    pub async fn start_conversation(
        &self,
        request: &StartConversationRequest,
    ) -> Result<ConversationResponse> {
        let url = format!("{}/v1/conversations", self.base_url);
        self.post_json(&url, request).await
    }

    pub async fn continue_conversation(
        &self,
        conversation_id: &str,
        request: &ContinueConversationRequest,
    ) -> Result<ConversationResponse> {
        let url = format!("{}/v1/conversations/{conversation_id}", self.base_url);
        self.post_json(&url, request).await
    }

    /// Download raw file bytes, e.g. a generated image. The bytes are
    /// returned exactly as the provider sent them.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/files/{file_id}/content", self.base_url);
        trace!("GET {url}");
        let res = self.http.get(&url).headers(self.headers()).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!("GET {url} failed: {status}");
            return Err(status_error(status, res).await);
        }
        Ok(res.bytes().await?.to_vec())
    }

    async fn post_json<Req, Resp>(&self, url: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        trace!("POST {url}");
        let res = self
            .http
            .post(url)
            .headers(self.headers())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await?;
        decode(url, res).await
    }
}

async fn decode<Resp: DeserializeOwned>(url: &str, res: reqwest::Response) -> Result<Resp> {
    let status = res.status();
    if !status.is_success() {
        warn!("{url} failed: {status}");
        return Err(status_error(status, res).await);
    }
    let body = res.text().await?;
    serde_json::from_str::<Resp>(&body)
        .map_err(|e| ExplorerErr::Decode(format!("{url}: {e}; body={body}")))
}

async fn status_error(status: StatusCode, res: reqwest::Response) -> ExplorerErr {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ExplorerErr::Auth(status);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = res
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return ExplorerErr::RateLimited { retry_after };
    }
    let body = res.text().await.unwrap_or_default();
    ExplorerErr::UnexpectedStatus { status, body }
}
