//! Gemini `generateContent` client for compatibility readings.

use aishou_core::FortuneResult;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::decode::{DecodeError, decode_reply};
use crate::oracle::{FortuneOracle, FortuneRequest};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt, response_schema};
use crate::FortuneError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for the Gemini generative-language API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body: the prompt plus a JSON response contract at temperature 0.
    pub fn request_body(req: &FortuneRequest) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_PROMPT }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_user_prompt(req) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": 0
            }
        })
    }

    async fn generate(&self, body: &Value) -> Result<String, FortuneError> {
        let url = self.endpoint();
        info!(url = %url, "requesting reading");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "fortune service returned an error");
            return Err(FortuneError::server(status.as_u16(), &body));
        }

        let raw = resp.text().await?;
        let envelope: Value = serde_json::from_str(&raw).map_err(DecodeError::NotJson)?;
        reply_text(&envelope)
    }
}

#[async_trait]
impl FortuneOracle for GeminiClient {
    async fn tell(&self, request: &FortuneRequest) -> Result<FortuneResult, FortuneError> {
        let text = self.generate(&Self::request_body(request)).await?;
        debug!(chars = text.len(), "received reply");
        let result = decode_reply(&text)?;
        info!(score = result.score, "reading decoded");
        Ok(result)
    }
}

/// Pull the generated text out of a `generateContent` response envelope.
///
/// Text parts of the first candidate are concatenated. A prompt block or a
/// safety stop with no text is reported as [`FortuneError::Blocked`].
pub fn reply_text(envelope: &Value) -> Result<String, FortuneError> {
    if let Some(reason) = envelope
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(FortuneError::Blocked(format!("prompt blocked: {reason}")));
    }

    let Some(candidate) = envelope.pointer("/candidates/0") else {
        return Err(FortuneError::EmptyReply);
    };

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|p| !p.get("thought").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.get("finishReason").and_then(Value::as_str) {
            Some(reason) if reason != "STOP" => {
                Err(FortuneError::Blocked(format!("finish reason: {reason}")))
            }
            _ => Err(FortuneError::EmptyReply),
        };
    }
    Ok(text)
}
