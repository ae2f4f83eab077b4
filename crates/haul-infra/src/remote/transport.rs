use async_trait::async_trait;
use tracing::debug;

use super::error::RemoteError;

/// One request/response exchange with the endpoint
///
/// Timeouts and retries live above this trait, so implementations make a
/// single attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET {url}?action={action}`, returning the response body
    async fn get(&self, url: &str, action: &str) -> Result<String, RemoteError>;

    /// POST a JSON body sent as `text/plain`; the response body is ignored
    async fn post(&self, url: &str, body: String) -> Result<(), RemoteError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, action: &str) -> Result<String, RemoteError> {
        debug!("GET {} action={}", url, action);
        let resp = self
            .http
            .get(url)
            .query(&[("action", action)])
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RemoteError::Status(resp.status().as_u16()));
        }
        Ok(resp.text().await?)
    }

    async fn post(&self, url: &str, body: String) -> Result<(), RemoteError> {
        debug!("POST {} ({} bytes)", url, body.len());
        // Apps Script endpoints reject preflighted content types
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RemoteError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
