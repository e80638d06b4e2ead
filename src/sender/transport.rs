//! HTTP transport abstraction.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::config::FcmConfig;
use crate::error::Result;
use crate::request::{build_headers, FcmRequest};
use crate::response::RawResponse;

/// Executes a POST and hands back whatever status and body came back.
///
/// Non-2xx statuses are responses, not errors: only failures to get a
/// response at all (connect, timeout) are returned as `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, request: &FcmRequest) -> Result<RawResponse>;
}

/// `reqwest`-backed transport using the configured credentials and timeout
pub struct HttpTransport {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(config: &FcmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .build()?;
        Self::with_client(client, config)
    }

    /// Use a preconfigured client; headers still come from `config`
    pub fn with_client(client: reqwest::Client, config: &FcmConfig) -> Result<Self> {
        Ok(Self {
            client,
            headers: build_headers(config)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, request: &FcmRequest) -> Result<RawResponse> {
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(request.body())
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response.text().await?;

        tracing::debug!(url = %url, status, body_len = body.len(), "FCM request completed");

        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcmError;

    #[test]
    fn test_unrepresentable_timeout_is_an_error() {
        let config = FcmConfig {
            timeout_seconds: 1e30,
            ..FcmConfig::new("key", "sender")
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(FcmError::InvalidOptions(_))
        ));
    }
}
