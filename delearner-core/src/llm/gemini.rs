//! Gemini REST backend with schema-constrained JSON output

use super::errors::{LLMError, LLMResult};
use super::traits::GenerationBackend;
use super::types::{GenerationRequest, GenerationResponse, Usage};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const PROVIDER: &str = "gemini";

/// Backend for Google's Gemini models
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiBackend {
    /// Build a backend, reading the credential from the environment right away
    pub fn new(config: &BackendConfig) -> LLMResult<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_api_key(config, api_key)
    }

    /// Build a backend with an explicit credential
    pub fn with_api_key(config: &BackendConfig, api_key: impl Into<String>) -> LLMResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LLMError::config(format!(
                "{} environment variable not set",
                config.api_key_env
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LLMError::config(format!("failed to build HTTP client: {}", e)))?;

        info!("Gemini backend ready at {}", config.base_url);
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn send(&self, request: &GenerationRequest) -> LLMResult<GenerateContentResponse> {
        let body = GenerateContentRequest::from_request(request);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_text));
        }

        let payload = response.text().await.map_err(|e| self.map_transport_error(e))?;
        decode_response(&payload)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> LLMError {
        if err.is_timeout() { LLMError::timeout(self.timeout) } else { LLMError::from(err) }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: GenerationRequest) -> LLMResult<GenerationResponse> {
        debug!(
            "Sending {} byte prompt to model {}",
            request.prompt_text.len(),
            request.model
        );

        let response = self.send(&request).await?;
        if let Some(reason) = response.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref())
        {
            warn!("Prompt blocked by provider: {}", reason);
        }

        let text = response.text().ok_or_else(|| LLMError::empty_response(PROVIDER))?;
        Ok(GenerationResponse {
            text,
            model: response.model_version.clone().unwrap_or_else(|| request.model.clone()),
            usage: response.usage(),
        })
    }
}

fn decode_response(payload: &str) -> LLMResult<GenerateContentResponse> {
    serde_json::from_str(payload)
        .map_err(|e| LLMError::parse(format!("unexpected generateContent response: {}", e)))
}

fn map_status(status: StatusCode, error_text: String) -> LLMError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::auth(error_text),
        StatusCode::TOO_MANY_REQUESTS => LLMError::rate_limit(error_text),
        _ => LLMError::api(status.as_u16(), error_text),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![Content { role: "user", parts: vec![Part { text: &request.prompt_text }] }],
            generation_config: GenerationConfig {
                response_mime_type: request.response_format.mime_type(),
                response_schema: &request.response_schema,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() { None } else { Some(text) }
    }

    fn usage(&self) -> Option<Usage> {
        self.usage_metadata.as_ref().map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest::json("gemini-2.5-flash", "hi", json!({"type": "OBJECT"}));
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4, "totalTokenCount": 7},
            "modelVersion": "gemini-2.5-flash-001"
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.usage().unwrap().total_tokens, 7);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            LLMError::AuthenticationError { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LLMError::RateLimitExceeded { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, String::new()),
            LLMError::ApiError { status: 400, .. }
        ));
    }

    #[test]
    fn test_undecodable_body_is_parse_error() {
        let err = decode_response("<html>bad gateway</html>").err().unwrap();
        assert!(matches!(err, LLMError::ParseError { .. }));

        let response = decode_response(r#"{"candidates": []}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_blank_key_fails_construction() {
        let err = GeminiBackend::with_api_key(&BackendConfig::default(), " ").err().unwrap();
        assert!(matches!(err, LLMError::ConfigurationError { .. }));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let config =
            BackendConfig { base_url: "http://localhost:9/v1beta/".to_string(), ..Default::default() };
        let backend = GeminiBackend::with_api_key(&config, "key").unwrap();
        assert_eq!(
            backend.endpoint("gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
