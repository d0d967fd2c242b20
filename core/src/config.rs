use std::time::Duration;

use crate::error::ExplorerErr;
use crate::error::Result;

pub const API_KEY_ENV_VAR: &str = "MISTRAL_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "AGENTS_EXPLORER_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the environment. A missing or empty API
    /// key is fatal here, before any session state exists.
    pub fn load() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR).unwrap_or_default();
        let base_url = std::env::var(BASE_URL_ENV_VAR).ok();
        Self::new(api_key, base_url)
    }

    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExplorerErr::Config(format!(
                "{API_KEY_ENV_VAR} is not set; export it or add it to a .env file"
            )));
        }
        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Trim trailing slashes for consistent URL building.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        if base_url.is_empty() {
            return Err(ExplorerErr::Config(format!(
                "{BASE_URL_ENV_VAR} must not be empty"
            )));
        }
        Ok(Self {
            api_key,
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}
