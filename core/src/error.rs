use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerErr>;

/// Error taxonomy of the explorer. `Config` aborts startup; `Validation` is
/// rendered inline before any network traffic; everything else is a failed
/// interaction that leaves the session untouched. There are no automatic
/// retries anywhere: the user resubmits.
#[derive(Debug, Error)]
pub enum ExplorerErr {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("authentication failed ({0}); check your API key")]
    Auth(StatusCode),

    #[error("rate limited by the provider{}", .retry_after.map(|s| format!("; retry after {s}s")).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ExplorerErr {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplorerErr::Timeout
        } else {
            ExplorerErr::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_display_includes_retry_hint() {
        let err = ExplorerErr::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(
            err.to_string(),
            "rate limited by the provider; retry after 30s"
        );
        let err = ExplorerErr::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limited by the provider");
    }
}
