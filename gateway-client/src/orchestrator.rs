//! Request orchestrator: assembles the plaintext request, drives
//! seal → transport → open, and maps the decrypted reply into a typed
//! result or a typed error.

use std::sync::Arc;
use std::time::Duration;

use gateway_envelope::{GatewayPublicKey, SealState, SizeClass, Ticket, TicketSource};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{GatewayClientError, Result};
use crate::transport::{HttpTransport, TransportResponse};

/// The tagged-union shape of a decrypted reply (§3: `{kind:"ok"|"err", …}`).
/// Legacy shapes (`{error:{…}}`, `{upstream:{…}}`) do not carry `kind` and
/// fall through to `interpret_response`'s untagged fallback checks.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TaggedReply {
    Ok { response: Value },
    Err { error: GatewayErrorPayload },
}

#[derive(Debug, Deserialize)]
struct GatewayErrorPayload {
    code: String,
    message: String,
}

pub struct GatewayClient {
    gateway_key: GatewayPublicKey,
    ticket_source: Arc<dyn TicketSource>,
    transport: HttpTransport,
    timeout: Duration,
    pub(crate) default_model: String,
}

impl GatewayClient {
    pub fn new(
        gateway_key: GatewayPublicKey,
        ticket_source: Arc<dyn TicketSource>,
        transport: HttpTransport,
        timeout: Duration,
        default_model: impl Into<String>,
    ) -> Self {
        Self { gateway_key, ticket_source, transport, timeout, default_model: default_model.into() }
    }

    /// Pull a ticket from the configured source and run [`Self::infer_with_ticket`].
    pub async fn infer(&self, class: SizeClass, upstream_payload: Value) -> Result<Value> {
        let ticket = self
            .ticket_source
            .next_ticket(class)
            .await
            .map_err(GatewayClientError::TicketExhausted)?;
        self.infer_with_ticket(class, ticket, upstream_payload).await
    }

    /// Run one full request/response cycle with a caller-supplied ticket.
    pub async fn infer_with_ticket(&self, class: SizeClass, ticket: Ticket, upstream_payload: Value) -> Result<Value> {
        if ticket.token_class != class {
            return Err(GatewayClientError::ProtocolError(
                "ticket token_class does not match requested size class".to_string(),
            ));
        }

        let body = coerce_upstream_payload(&upstream_payload)?;
        let request_id = Uuid::new_v4().to_string();
        let model = body
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.default_model)
            .to_string();
        let messages = body.get("messages").cloned().unwrap_or_else(|| Value::Array(Vec::new()));
        let max_tokens = body
            .get("max_tokens")
            .cloned()
            .unwrap_or_else(|| Value::from(class.max_output_tokens_hint()));

        let mut request = serde_json::json!({
            "request_id": request_id,
            "model": model,
            "messages": messages,
            "max_tokens": max_tokens,
            "token_class": class.symbolic_name(),
            "ticket": ticket,
        });
        if let Some(temperature) = body.get("temperature") {
            request["temperature"] = temperature.clone();
        }

        let plaintext = serde_json::to_vec(&request)
            .map_err(|e| GatewayClientError::ProtocolError(format!("failed to encode request: {e}")))?;
        let (envelope, seal_state) = gateway_envelope::seal(&self.gateway_key, class, &plaintext)?;

        tracing::debug!(request_id = %request_id, class = class.symbolic_name(), "sending gateway request");

        let send = self.transport.post_envelope(&envelope);
        let response = match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(request_id = %request_id, "gateway request timed out");
                return Err(GatewayClientError::Timeout);
            }
        };

        let result = self.interpret_response(&seal_state, response);
        match &result {
            Err(GatewayClientError::GatewayError { code, message }) => {
                tracing::warn!(request_id = %request_id, code = %code, message = %message, "gateway returned a structured error");
            }
            Err(GatewayClientError::HttpError(status)) => {
                tracing::warn!(request_id = %request_id, status, "gateway returned a non-2xx status");
            }
            Err(GatewayClientError::Envelope(reason)) => {
                tracing::error!(request_id = %request_id, %reason, "envelope decryption failed");
            }
            _ => {}
        }
        result
    }

    fn interpret_response(&self, seal_state: &SealState, response: TransportResponse) -> Result<Value> {
        let decrypted = match &response.envelope {
            Some(envelope) => {
                let plaintext = gateway_envelope::open(seal_state, envelope)?;
                let value: Value = serde_json::from_slice(&plaintext)
                    .map_err(|_| GatewayClientError::ProtocolError("decrypted response is not valid JSON".to_string()))?;
                if !value.is_object() {
                    return Err(GatewayClientError::ProtocolError("decrypted response is not a JSON object".to_string()));
                }
                Some(value)
            }
            None => None,
        };

        if let Some(value) = decrypted {
            if value.get("kind").is_some() {
                match serde_json::from_value::<TaggedReply>(value.clone()) {
                    Ok(TaggedReply::Ok { response }) => return Ok(response),
                    Ok(TaggedReply::Err { error }) => {
                        return Err(GatewayClientError::GatewayError { code: error.code, message: error.message })
                    }
                    Err(_) => {}
                }
            }

            if value.get("error").is_some() {
                return Err(gateway_error_from(value.get("error")));
            }

            if !(200..300).contains(&response.status) {
                return Err(GatewayClientError::HttpError(response.status));
            }

            if let Some(upstream) = value.get("upstream") {
                return Ok(upstream.clone());
            }

            return Err(GatewayClientError::ProtocolError("missing response payload".to_string()));
        }

        if !(200..300).contains(&response.status) {
            return Err(GatewayClientError::HttpError(response.status));
        }

        Err(GatewayClientError::ProtocolError("missing response payload".to_string()))
    }
}

fn gateway_error_from(error: Option<&Value>) -> GatewayClientError {
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    GatewayClientError::GatewayError { code, message }
}

/// Accept either a chat-style object (`{model, messages, …}`) directly or a
/// transport-envelope-style object (`{path, body}`); reject anything else.
fn coerce_upstream_payload(value: &Value) -> Result<Value> {
    let obj = value
        .as_object()
        .ok_or_else(|| GatewayClientError::ProtocolError("upstream payload must be a JSON object".to_string()))?;

    if let Some(body) = obj.get("body") {
        if obj.contains_key("path") {
            return body
                .as_object()
                .map(|_| body.clone())
                .ok_or_else(|| GatewayClientError::ProtocolError("transport-envelope body must be an object".to_string()));
        }
    }

    if obj.contains_key("model") || obj.contains_key("messages") {
        return Ok(value.clone());
    }

    Err(GatewayClientError::ProtocolError("unrecognized upstream payload shape".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_chat_style_payload() {
        let payload = serde_json::json!({"model": "m", "messages": []});
        assert_eq!(coerce_upstream_payload(&payload).unwrap(), payload);
    }

    #[test]
    fn coerces_transport_envelope_payload() {
        let payload = serde_json::json!({"path": "/v1/chat/completions", "body": {"model": "m", "messages": []}});
        let coerced = coerce_upstream_payload(&payload).unwrap();
        assert_eq!(coerced, serde_json::json!({"model": "m", "messages": []}));
    }

    #[test]
    fn rejects_unrecognized_shape() {
        let payload = serde_json::json!({"foo": "bar"});
        assert!(coerce_upstream_payload(&payload).is_err());
    }

    #[test]
    fn error_precedence_prefers_structured_error_over_http_status() {
        let response = TransportResponse { status: 500, envelope: None };
        // No envelope at all: falls through to HTTP status.
        let client_err = match response.status {
            s if !(200..300).contains(&s) => GatewayClientError::HttpError(s),
            _ => unreachable!(),
        };
        assert!(matches!(client_err, GatewayClientError::HttpError(500)));
    }

    #[test]
    fn gateway_error_extracts_code_and_message() {
        let error = serde_json::json!({"code": "rate_limited", "message": "slow down"});
        match gateway_error_from(Some(&error)) {
            GatewayClientError::GatewayError { code, message } => {
                assert_eq!(code, "rate_limited");
                assert_eq!(message, "slow down");
            }
            _ => panic!("expected GatewayError"),
        }
    }
}
