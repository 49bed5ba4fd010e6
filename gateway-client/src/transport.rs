//! HTTP transport: posts a sealed envelope to the gateway and returns the
//! reply envelope plus enough of the raw response to let the orchestrator's
//! error-precedence logic run (§7: a structured `err` payload wins over a
//! non-2xx HTTP status).

use std::time::Duration;

use gateway_envelope::Envelope;
use reqwest::Client;

use crate::error::{GatewayClientError, Result};

/// A thin wrapper over a single shared [`reqwest::Client`].
pub struct HttpTransport {
    client: Client,
    url: String,
    bearer_token: Option<String>,
}

/// The raw shape of a transport response: the HTTP status and, when the
/// body parsed as an envelope, the envelope itself.
pub struct TransportResponse {
    pub status: u16,
    pub envelope: Option<Envelope>,
}

impl HttpTransport {
    pub fn new(base_url: &str, infer_path: &str, timeout: Duration, bearer_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;

        let url = format!("{}{}", base_url.trim_end_matches('/'), infer_path);
        Ok(Self { client, url, bearer_token })
    }

    pub async fn post_envelope(&self, envelope: &Envelope) -> Result<TransportResponse> {
        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(envelope);

        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;

        let envelope = serde_json::from_str(&body).ok();
        Ok(TransportResponse { status, envelope })
    }
}
