//! Typed client for the export mail relay.
//!
//! The relay is a script endpoint that accepts
//! `{"email", "inst", "format", "content"}` and mails the decoded file.
//! It acknowledges a successful hand-off with `302 Found`, so redirects
//! are not followed and exactly that status counts as delivered.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::config::RelayConfig;
use crate::error::ClientError;

/// JSON body of a relay request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub email: String,
    pub inst: String,
    /// `csv` or `xlsx`.
    pub format: String,
    /// Base64 of the serialized file.
    pub content: String,
}

impl ExportPayload {
    pub fn new(email: &str, inst: &str, format: &str, bytes: &[u8]) -> Self {
        Self {
            email: email.to_string(),
            inst: inst.to_string(),
            format: format.to_string(),
            content: STANDARD.encode(bytes),
        }
    }
}

/// Client for the mail relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post one export. `Ok` only for `302 Found`.
    pub async fn send(&self, payload: &ExportPayload) -> Result<(), ClientError> {
        let endpoint = "POST relay";

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status();
        if status != StatusCode::FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(format = %payload.format, "export handed to relay");
        Ok(())
    }
}
