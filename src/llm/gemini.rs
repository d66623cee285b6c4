//! Gemini `generateContent` client
//!
//! Sends `POST {api_base}/v1beta/models/{model}:generateContent?key=...` and
//! reads the first candidate's content. Function declarations travel in a
//! single `tools` entry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{
    Content, FunctionDeclaration, GenerateRequest, GenerateResponse, GenerativeModel, ModelError,
};
use crate::config::GeminiConfig;

/// Upstream bodies are cut to this many characters before they reach logs or
/// error details.
const BODY_SNIPPET_LIMIT: usize = 512;

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration. Fails with
    /// [`ModelError::NotConfigured`] when no API key is set.
    pub fn new(config: &GeminiConfig) -> Result<Self, ModelError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ModelError::NotConfigured)?;

        let endpoint = build_endpoint(&config.api_base, &config.model, api_key)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            endpoint,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_endpoint(api_base: &str, model: &str, api_key: &str) -> Result<Url, ModelError> {
    let raw = format!(
        "{}/v1beta/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| ModelError::Malformed(format!("invalid Gemini endpoint '{raw}': {e}")))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

fn snippet(body: String) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(body.chars().take(BODY_SNIPPET_LIMIT).collect())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireInstruction<'a>>,
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

#[derive(Serialize)]
struct WireInstruction<'a> {
    parts: [WireText<'a>; 1],
}

#[derive(Serialize)]
struct WireText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool<'a> {
    function_declarations: &'a [FunctionDeclaration],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![WireTool {
                function_declarations: &request.tools,
            }]
        };

        Self {
            system_instruction: request.system_instruction.as_deref().map(|text| {
                WireInstruction {
                    parts: [WireText { text }],
                }
            }),
            contents: &request.contents,
            tools,
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let body = WireRequest::from(&request);

        tracing::debug!(
            model = %self.model,
            contents = request.contents.len(),
            tools = request.tools.len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                model = %self.model,
                status = status.as_u16(),
                "Gemini returned an error status"
            );
            return Err(ModelError::Http {
                status: status.as_u16(),
                body: snippet(body),
            });
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.without_url().to_string()))?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            tracing::warn!(model = %self.model, "Gemini returned no candidates");
            return Ok(GenerateResponse::empty());
        };

        let mut generated = GenerateResponse::empty();
        if let Some(content) = candidate.content {
            generated.content = content;
        }
        generated.finish_reason = candidate.finish_reason;
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Part;
    use serde_json::json;

    #[test]
    fn endpoint_includes_model_and_key() {
        let url = build_endpoint(
            "https://generativelanguage.googleapis.com/",
            "gemini-2.0-flash",
            "secret",
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn missing_key_is_not_configured() {
        let config = GeminiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            GeminiClient::new(&config),
            Err(ModelError::NotConfigured)
        ));
    }

    #[test]
    fn wire_request_shape() {
        let request = GenerateRequest {
            system_instruction: Some("Eres ZIA".to_string()),
            contents: vec![Content::user_text("¿Cuánto PET tengo?")],
            tools: vec![FunctionDeclaration {
                name: "getInventory".to_string(),
                description: "Inventario".to_string(),
                parameters: None,
            }],
        };

        let value = serde_json::to_value(WireRequest::from(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "Eres ZIA" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "¿Cuánto PET tengo?" }] }],
                "tools": [{ "functionDeclarations": [{ "name": "getInventory", "description": "Inventario" }] }]
            })
        );
    }

    #[test]
    fn wire_request_omits_empty_tools() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: crate::llm::Role::User,
                parts: vec![Part::text("hola")],
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(WireRequest::from(&request)).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        assert_eq!(snippet(String::new()), None);
        assert_eq!(snippet("x".repeat(2000)).map(|s| s.len()), Some(512));
    }
}
