//! reqwest-backed transport.

use std::time::Duration;

use patientor_core::{HttpTransport, TransportError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{RemoteConfig, RemoteResult};

/// Blocking HTTP transport for the patient records API.
pub struct ReqwestTransport {
    config: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Build the HTTP client from a resolved config.
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        Ok(Self { config, client })
    }

    /// Transport for the default local API.
    pub fn default_local() -> RemoteResult<Self> {
        Self::new(RemoteConfig::default())
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<String, TransportError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.connection_error(e))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn connection_error(&self, e: reqwest::Error) -> TransportError {
        let message = if e.is_connect() {
            format!("Cannot reach {}", self.config.api_base_url())
        } else if e.is_timeout() {
            format!(
                "Request timed out after {}s",
                self.config.request_timeout_secs()
            )
        } else {
            e.to_string()
        };
        tracing::warn!(error = %e, "transport failure");
        TransportError::Connection { message }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, path: String) -> Result<String, TransportError> {
        let url = self.config.url(&path);
        tracing::debug!(url = %url, "GET");
        self.send(self.client.get(url))
    }

    fn post(&self, path: String, body: String) -> Result<String, TransportError> {
        let url = self.config.url(&path);
        tracing::debug!(url = %url, "POST");
        self.send(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
    }
}
