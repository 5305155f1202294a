//! Webhook delivery
//!
//! [`Transport`] is the seam between rendering and the network. The
//! default [`HttpTransport`] posts the message as a JSON body; tests and
//! embedders can substitute their own implementation.

use super::message::WebhookMessage;
use crate::core::Result;
use async_trait::async_trait;

#[cfg(feature = "http")]
use crate::core::SinkError;
#[cfg(feature = "http")]
use std::time::Duration;

/// Default request timeout for [`HttpTransport`]
#[cfg(feature = "http")]
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts a rendered message to a webhook URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, message: &WebhookMessage) -> Result<()>;
}

/// HTTP transport backed by a shared `reqwest::Client`
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Transport with [`DEFAULT_REQUEST_TIMEOUT`]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Reuse an existing client, e.g. one configured with a proxy
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, message: &WebhookMessage) -> Result<()> {
        let response = self.client.post(url).json(message).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::webhook_rejected(status.as_u16(), body))
    }
}
