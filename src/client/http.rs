use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, trace};

use super::models::{
    ErrorBody, ListResponse, LookupResponse, ShortLink, ShortenRequest, ShortenResponse,
};
use super::LinkApi;
use crate::config::ApiConfig;
use crate::errors::{KshortError, Result};

/// reqwest-backed [`LinkApi`]
#[derive(Clone)]
pub struct HttpLinkApi {
    client: Client,
    base_url: String,
}

impl HttpLinkApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kshort/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KshortError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join percent-encoded path segments onto the base URL
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Turn a non-2xx response into an `Upstream` error, keeping the API's `error` text
    async fn upstream_error(response: reqwest::Response) -> KshortError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        KshortError::upstream(status.as_u16(), message)
    }
}

#[async_trait]
impl LinkApi for HttpLinkApi {
    async fn list_links(&self, user_id: &str) -> Result<Vec<ShortLink>> {
        let url = self.endpoint(&["urls", user_id]);
        trace!("GET {}", url);

        let response = self.client.get(&url).header(ACCEPT, "application/json").send().await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let body: ListResponse = response.json().await?;
        Ok(body.urls.unwrap_or_default())
    }

    async fn create_link(&self, original_url: &str, user_id: &str) -> Result<String> {
        let url = self.endpoint(&["shorten"]);
        trace!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&ShortenRequest {
                original_url,
                user_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let body: ShortenResponse = response.json().await?;
        debug!("Created short code {} for user {}", body.short_code, user_id);
        Ok(body.short_code)
    }

    async fn delete_link(&self, user_id: &str, short_code: &str) -> Result<()> {
        let url = self.endpoint(&["urls", user_id, short_code]);
        trace!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }
        Ok(())
    }

    async fn lookup(&self, short_code: &str) -> Result<Option<String>> {
        let url = self.endpoint(&["urls", "lookup", short_code]);
        trace!("GET {}", url);

        let response = self.client.get(&url).header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KshortError::upstream(
                status.as_u16(),
                format!("lookup for '{}' failed", short_code),
            ));
        }

        // 2xx 但 body 为空：视为没有目标地址
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let body: LookupResponse = serde_json::from_str(&text)?;
        Ok(body.original_url.filter(|u| !u.is_empty()))
    }
}
