//! Error types for the analysis core
//!
//! Local pre-flight checks, patch application and backend failures all surface through
//! [`CoreError`]. Backend failures are collapsed into one uniform [`AnalysisFailure`]
//! so that provider internals never reach the caller.

use crate::language::Language;
use crate::patch::PatchError;
use crate::session::Tab;
use thiserror::Error;

/// User-facing text shared by every backend or parse failure
pub const ANALYSIS_FAILURE_MESSAGE: &str = "Failed to get a valid analysis from the AI. \
     The response may be malformed or the API call failed.";

/// Uniform failure of an analysis call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AnalysisFailure {
    message: String,
}

impl AnalysisFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for AnalysisFailure {
    fn default() -> Self {
        Self::new(ANALYSIS_FAILURE_MESSAGE)
    }
}

/// Main error type for the analysis core
#[derive(Debug, Error)]
pub enum CoreError {
    /// Declared language differs from the language detected for the file
    #[error(
        "Language Mismatch: Selected language is '{}', but this appears to be a '{}' file. \
         Please switch the language or select 'All Languages'.",
        .selected.display_name(),
        .detected.display_name()
    )]
    LanguageMismatch { selected: Language, detected: Language },

    /// Nothing to analyze
    #[error("{reason}")]
    EmptyInput { reason: String },

    /// The backend call or its payload failed
    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),

    /// A patch addressed a missing file or line
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// A file name that is not in the store
    #[error("File '{name}' does not exist")]
    UnknownFile { name: String },

    /// A file name that is already taken
    #[error("File '{name}' already exists")]
    DuplicateFile { name: String },

    /// A finding index that the current result does not have
    #[error("No {kind} #{index} in the current analysis")]
    UnknownFinding { kind: &'static str, index: usize },

    /// The requested tab has no content to show
    #[error("The {tab} tab has no content for the current analysis")]
    TabDisabled { tab: Tab },

    /// Reading an uploaded folder failed
    #[error("Failed to read '{path}': {message}")]
    Ingest { path: String, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CoreError {
    /// Create an empty input error
    pub fn empty_input(reason: impl Into<String>) -> Self {
        Self::EmptyInput { reason: reason.into() }
    }

    /// Create an unknown file error
    pub fn unknown_file(name: impl Into<String>) -> Self {
        Self::UnknownFile { name: name.into() }
    }

    /// Create an ingestion error
    pub fn ingest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Ingest { path: path.into(), message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Whether the error was raised locally, before any backend call
    pub fn is_preflight(&self) -> bool {
        matches!(self, Self::LanguageMismatch { .. } | Self::EmptyInput { .. })
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_names_both_languages() {
        let err = CoreError::LanguageMismatch {
            selected: Language::Python,
            detected: Language::JavaScript,
        };
        let text = err.to_string();
        assert!(text.contains("'Python'"));
        assert!(text.contains("'JavaScript'"));
        assert!(err.is_preflight());
    }

    #[test]
    fn test_analysis_failure_is_generic() {
        let err: CoreError = AnalysisFailure::default().into();
        assert_eq!(err.to_string(), ANALYSIS_FAILURE_MESSAGE);
        assert!(!err.is_preflight());
    }
}
