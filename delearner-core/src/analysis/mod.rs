//! Analysis requests, results and the client that produces them
//!
//! The free functions here are the headless entry points: they run the local pre-flight
//! checks and only then reach the backend.

pub mod client;
pub mod prompt;
pub mod schema;
pub mod types;
pub mod wire;

pub use client::{AnalysisClient, AnalysisOutcome};
pub use prompt::{AnalysisRequest, PromptTemplates};
pub use types::*;

use crate::error::{CoreError, Result};
use crate::language::{self, LanguageSelection};
use crate::store::CodeFile;
use tracing::warn;

/// Reported when a single-file action targets blank content
pub const EMPTY_FILE_MESSAGE: &str = "The active file is empty.";

/// Reported when a project action has no files
pub const NO_FILES_MESSAGE: &str = "No files to analyze. Please upload a folder.";

/// Local checks that run before any backend call: empty content first, then the
/// declared/detected language mismatch when a file name is known
pub fn preflight(content: &str, file_name: Option<&str>, language: LanguageSelection) -> Result<()> {
    if content.trim().is_empty() {
        return Err(CoreError::empty_input(EMPTY_FILE_MESSAGE));
    }
    if let Some(name) = file_name {
        language::check_mismatch(language, name).inspect_err(|e| warn!("{}", e))?;
    }
    Ok(())
}

/// Full five-section analysis of one file
pub async fn analyze_file(
    client: &AnalysisClient,
    file: &CodeFile,
    language: LanguageSelection,
    model: &str,
) -> Result<AnalysisResult> {
    preflight(&file.content, Some(&file.name), language)?;

    let request = AnalysisRequest::SingleFile {
        content: file.content.clone(),
        file_name: file.name.clone(),
        language,
        model: model.to_string(),
    };
    Ok(client.run_full(&request).await?)
}

/// Full five-section analysis of several files at once
pub async fn analyze_project(
    client: &AnalysisClient,
    files: &[CodeFile],
    language: LanguageSelection,
    model: &str,
) -> Result<AnalysisResult> {
    if files.is_empty() {
        return Err(CoreError::empty_input(NO_FILES_MESSAGE));
    }

    let request =
        AnalysisRequest::Project { files: files.to_vec(), language, model: model.to_string() };
    Ok(client.run_full(&request).await?)
}

/// Predicted output and complexity of a code fragment without a file name
pub async fn quick_run(
    client: &AnalysisClient,
    content: &str,
    language: LanguageSelection,
    model: &str,
) -> Result<SimpleResult> {
    preflight(content, None, language)?;
    run_quick(client, content, language, model).await
}

/// Predicted output and complexity of a file, refusing on a language mismatch
pub async fn quick_run_file(
    client: &AnalysisClient,
    file: &CodeFile,
    language: LanguageSelection,
    model: &str,
) -> Result<SimpleResult> {
    preflight(&file.content, Some(&file.name), language)?;
    run_quick(client, &file.content, language, model).await
}

async fn run_quick(
    client: &AnalysisClient,
    content: &str,
    language: LanguageSelection,
    model: &str,
) -> Result<SimpleResult> {
    let request =
        AnalysisRequest::QuickRun { content: content.to_string(), language, model: model.to_string() };
    Ok(client.run_quick(&request).await?)
}
