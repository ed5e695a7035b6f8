use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::ceremony::{AuthenticateRequest, RegisterRequest};
use crate::config::CeremonyConfig;
use crate::verify_info::VerifyInfo;

use super::errors::TransportError;
use super::types::WireClient;

pub const REGISTER_PATH: &str = "/api/webauthn-register";
pub const AUTHENTICATE_PATH: &str = "/api/webauthn-authenticate";
pub const VERIFY_INFO_PATH: &str = "/api/verify-info";

/// [`WireClient`] posting JSON envelopes with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpWireClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWireClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &CeremonyConfig) -> Self {
        Self::new(&config.api_base_url, config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_envelope<T: Serialize + ?Sized>(
        &self,
        path: &str,
        envelope: &T,
    ) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Submitting ceremony envelope to {}", url);

        let response = self.client.post(&url).json(envelope).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Verifier rejected {} with {}: {}", path, status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Verifier accepted {} with {}", path, status);
        Ok(())
    }

    /// Fetches the identity and request details for the current session.
    pub async fn fetch_verify_info(&self) -> Result<VerifyInfo, TransportError> {
        let url = format!("{}{}", self.base_url, VERIFY_INFO_PATH);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let body = response.text().await?;
        let info: VerifyInfo = serde_json::from_str(&body)?;
        Ok(info)
    }
}

/// Transport-level timeouts are the only bound on a submission.
#[cfg(not(target_arch = "wasm32"))]
fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .expect("Failed to create reqwest client")
}

/// The browser's fetch owns timeouts and pooling.
#[cfg(target_arch = "wasm32")]
fn build_client(_timeout: Duration) -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl WireClient for HttpWireClient {
    async fn submit_registration(&self, request: &RegisterRequest) -> Result<(), TransportError> {
        self.post_envelope(REGISTER_PATH, request).await
    }

    async fn submit_authentication(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<(), TransportError> {
        self.post_envelope(AUTHENTICATE_PATH, request).await
    }
}
