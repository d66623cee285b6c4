//! # Generative Model Client
//!
//! The [`GenerativeModel`] trait is the seam between the assistant flows and
//! the hosted model. [`gemini::GeminiClient`] talks to the Gemini REST API;
//! tests substitute scripted implementations.
//!
//! The content types mirror Gemini's `Content`/`Part` shapes closely enough
//! to serialize straight onto the wire.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Who produced a piece of content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Model,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of every text part, if there is any
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(|part| part.function_call.as_ref())
            .collect()
    }
}

/// A content part. Exactly one field is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(name: impl Into<String>, args: Value) -> Self {
        Self {
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
            ..Default::default()
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.into(),
                response,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// A tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments; omitted for argument-less tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// A single generation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub tools: Vec<FunctionDeclaration>,
}

/// The first candidate of a generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub content: Content,
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    /// A response with no parts, as returned when the model produced nothing
    pub fn empty() -> Self {
        Self {
            content: Content {
                role: Role::Model,
                parts: Vec::new(),
            },
            finish_reason: None,
        }
    }

    pub fn text(&self) -> Option<String> {
        self.content.text()
    }

    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.content.function_calls()
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model returned HTTP {status}")]
    Http { status: u16, body: Option<String> },
    #[error("network error calling model: {0}")]
    Network(String),
    #[error("malformed model response: {0}")]
    Malformed(String),
    #[error("generative model is not configured")]
    NotConfigured,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError>;
}

/// Stand-in used when no API key is configured; every call fails with
/// [`ModelError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredModel;

#[async_trait]
impl GenerativeModel for UnconfiguredModel {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        Err(ModelError::NotConfigured)
    }
}
