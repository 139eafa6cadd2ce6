//! Common types for generation backends
//!
//! A request is a prompt plus the schema the answer must follow; a response is the
//! raw text the backend produced.

use serde::{Deserialize, Serialize};

/// Output mode requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
}

impl ResponseFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
        }
    }
}

/// A schema-constrained generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub model: String,
    pub prompt_text: String,
    pub response_schema: serde_json::Value,
    pub response_format: ResponseFormat,
}

impl GenerationRequest {
    pub fn json(
        model: impl Into<String>,
        prompt_text: impl Into<String>,
        response_schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            prompt_text: prompt_text.into(),
            response_schema,
            response_format: ResponseFormat::Json,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Raw backend output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub model: String,
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self { text: text.into(), model: model.into(), usage: None }
    }
}

/// A model offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Models offered for analysis; the first one is the default
pub const SUPPORTED_MODELS: &[ModelInfo] =
    &[ModelInfo { id: "gemini-2.5-flash", name: "Gemini 2.5 Flash" }];

/// Identifier of the default model
pub fn default_model() -> &'static str {
    SUPPORTED_MODELS[0].id
}
