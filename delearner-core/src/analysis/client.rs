//! Analysis client
//!
//! Sends one schema-constrained request to the generation backend and turns the
//! payload into typed results. Every failure, whatever its cause, surfaces as the same
//! [`AnalysisFailure`]; the cause is only logged.

use super::prompt::AnalysisRequest;
use super::types::{AnalysisResult, SimpleResult};
use super::wire::{RawAnalysisResult, ResolveScope};
use crate::error::AnalysisFailure;
use crate::llm::GenerationBackend;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Typed payload of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "camelCase")]
pub enum AnalysisOutcome {
    Full(AnalysisResult),
    Quick(SimpleResult),
}

/// Client for the generation backend
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn GenerationBackend>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run any request; quick runs yield [`AnalysisOutcome::Quick`]
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisFailure> {
        let payload = self.fetch(request).await?;

        match request {
            AnalysisRequest::QuickRun { .. } => {
                let result = serde_json::from_str::<SimpleResult>(&payload)
                    .map_err(|e| failure(request, e))?;
                Ok(AnalysisOutcome::Quick(result))
            }
            AnalysisRequest::SingleFile { file_name, .. } => {
                let result = parse_full(&payload, ResolveScope::SingleFile(file_name))
                    .map_err(|e| failure(request, e))?;
                Ok(AnalysisOutcome::Full(result))
            }
            AnalysisRequest::Project { files, .. } => {
                let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
                let result = parse_full(&payload, ResolveScope::Project(&names))
                    .map_err(|e| failure(request, e))?;
                Ok(AnalysisOutcome::Full(result))
            }
        }
    }

    /// Run a single-file or project request
    pub async fn run_full(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
        match self.run(request).await? {
            AnalysisOutcome::Full(result) => Ok(result),
            AnalysisOutcome::Quick(_) => Err(failure(request, "quick-run request sent as full analysis")),
        }
    }

    /// Run a quick-run request
    pub async fn run_quick(&self, request: &AnalysisRequest) -> Result<SimpleResult, AnalysisFailure> {
        match self.run(request).await? {
            AnalysisOutcome::Quick(result) => Ok(result),
            AnalysisOutcome::Full(_) => Err(failure(request, "full analysis sent as quick run")),
        }
    }

    /// Call the backend and return the trimmed payload
    async fn fetch(&self, request: &AnalysisRequest) -> Result<String, AnalysisFailure> {
        info!(
            "Requesting {} analysis from {} (model {}, language {})",
            request.mode(),
            self.backend.name(),
            request.model(),
            request.language()
        );

        let response = self
            .backend
            .generate(request.to_generation_request())
            .await
            .map_err(|e| failure(request, e))?;

        if let Some(usage) = response.usage {
            debug!("Backend usage: {} tokens", usage.total_tokens);
        }
        Ok(response.text.trim().to_string())
    }
}

fn parse_full(payload: &str, scope: ResolveScope<'_>) -> Result<AnalysisResult, String> {
    let raw: RawAnalysisResult = serde_json::from_str(payload).map_err(|e| e.to_string())?;
    raw.resolve(scope).map_err(|e| e.to_string())
}

fn failure(request: &AnalysisRequest, cause: impl Display) -> AnalysisFailure {
    error!("Error getting {} analysis: {}", request.mode(), cause);
    AnalysisFailure::default()
}
