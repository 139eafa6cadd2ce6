// Command implementations

pub mod analyze;
pub mod languages;
pub mod patch;
pub mod project;
pub mod run;

use super::OutputFormat;
use anyhow::{Context, Result};
use delearner_core::llm::GeminiBackend;
use delearner_core::{AnalysisClient, CodeFile, DelearnerConfig, LanguageSelection};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Settings shared by every command
#[derive(Debug)]
pub struct CommandContext {
    pub config: DelearnerConfig,
    pub language: LanguageSelection,
    pub model: String,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(
        config: DelearnerConfig,
        language: LanguageSelection,
        model: Option<String>,
        format: OutputFormat,
    ) -> Self {
        let model = model.unwrap_or_else(|| config.session.default_model.clone());
        Self { config, language, model, format }
    }

    /// Client over the configured backend; fails right away without a credential
    pub fn client(&self) -> Result<AnalysisClient> {
        let backend = GeminiBackend::new(&self.config.backend)
            .context("failed to initialise the generation backend")?;
        Ok(AnalysisClient::new(Arc::new(backend)))
    }
}

/// Read a source file, named as it was given on the command line
pub async fn read_source(path: &Path) -> Result<CodeFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path.to_string_lossy().replace('\\', "/");
    debug!("Read {} bytes from {}", content.len(), name);
    Ok(CodeFile::new(name, content))
}
