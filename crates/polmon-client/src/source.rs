//! Typed client for the repository contents API.
//!
//! `GET {api_url}/repos/{repo}/contents/{path}?ref={branch}` with
//! `Accept: application/vnd.github.v3.raw` returns the file body itself
//! instead of the JSON envelope.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use url::Url;

use crate::config::{ConfigError, SourceConfig};
use crate::error::ClientError;

const RAW_CONTENT: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = concat!("polmon/", env!("CARGO_PKG_VERSION"));

/// Client that downloads the source CSV.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    url: Url,
}

impl SourceClient {
    pub fn new(config: &SourceConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(RAW_CONTENT));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| ConfigError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            tracing::warn!("no GITHUB_TOKEN configured; fetching the source file anonymously");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            url: config.contents_url()?,
        })
    }

    /// URL the file is fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Download the file body. Any non-2xx status is an error.
    pub async fn fetch_csv(&self) -> Result<String, ClientError> {
        let endpoint = "GET /repos/{repo}/contents/{path}";

        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let text = resp.text().await.map_err(|e| ClientError::Body {
            endpoint: endpoint.into(),
            source: e,
        })?;
        tracing::info!(bytes = text.len(), url = %self.url, "source file fetched");
        Ok(text)
    }
}
