//! Chat-completions convenience layered on top of [`GatewayClient::infer`].
//! Not part of the core request/response cycle — a thin repackaging of it.

use gateway_envelope::SizeClass;
use serde_json::Value;

use crate::error::Result;
use crate::orchestrator::GatewayClient;

/// One chat message: `{role, content}`.
pub fn message(role: &str, content: &str) -> Value {
    serde_json::json!({ "role": role, "content": content })
}

/// Build a chat-style upstream payload, call `infer`, and re-package the
/// decrypted `ok` response into a chat-completions-style object with a
/// single `stop`-finished assistant choice.
pub async fn chat(client: &GatewayClient, model: &str, messages: Vec<Value>, class: SizeClass) -> Result<Value> {
    let upstream_payload = serde_json::json!({
        "model": model,
        "messages": messages,
    });

    let response = client.infer(class, upstream_payload).await?;

    let content = response
        .get("output")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(serde_json::json!({
        "model": response.get("model").cloned().unwrap_or_else(|| Value::String(model.to_string())),
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content },
        }],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_builds_role_content_object() {
        assert_eq!(message("user", "hi"), serde_json::json!({"role": "user", "content": "hi"}));
    }
}
