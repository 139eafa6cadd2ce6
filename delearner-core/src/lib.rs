//! Core functionality for delearner
//!
//! This crate contains the analysis core of the delearner assistant: an in-memory file
//! store, language detection, schema-constrained analysis requests against a generation
//! backend, the patch engine that applies line-targeted fixes, and the session
//! coordinator that keeps files, results and view state consistent.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod language;
pub mod llm;
pub mod patch;
pub mod session;
pub mod store;

pub use analysis::{
    AnalysisClient, AnalysisOutcome, AnalysisRequest, AnalysisResult, SimpleResult,
    analyze_file, analyze_project, quick_run, quick_run_file,
};
pub use config::DelearnerConfig;
pub use error::{AnalysisFailure, CoreError, Result};
pub use language::{Language, LanguageSelection};
pub use patch::{PatchError, PatchTarget, apply_patch};
pub use session::{Disposition, SessionCoordinator, SessionState, Tab};
pub use store::{CodeFile, FileStore};

/// Rename `active` so its extension follows `language`; returns the new store and name
pub fn rename_for_language(
    store: &FileStore,
    active: &str,
    language: LanguageSelection,
) -> Result<(FileStore, String)> {
    store.rename_for_language(active, language)
}
