//! Session coordinator
//!
//! Owns the [`SessionState`] of one user session and serializes every mutation behind a
//! single lock, so a patch updates the files and the result together. Analysis calls
//! release the lock while the backend works; each call is tagged with a request token
//! and a response whose token is no longer the latest is discarded.

mod state;


pub use state::{Highlight, HighlightKind, Phase, RunState, SessionState, Tab};

use crate::analysis::{self, AnalysisClient, AnalysisRequest, CodeError};
use crate::config::SessionConfig;
use crate::error::{CoreError, Result};
use crate::ingest;
use crate::language::LanguageSelection;
use crate::patch::{self, PatchTarget};
use crate::store::FileStore;
use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Title shown above a project analysis
pub const PROJECT_TITLE: &str = "Project-Wide Analysis";

/// Whether a completed call still owned the state it wanted to update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The response was applied
    Current,
    /// A newer request or a reset superseded the call; its response was dropped
    Stale,
}

/// Latest token issued per action
#[derive(Debug, Default)]
struct RequestTokens {
    analysis: u64,
    run: u64,
}

impl RequestTokens {
    fn next_analysis(&mut self) -> u64 {
        self.analysis += 1;
        self.analysis
    }

    fn next_run(&mut self) -> u64 {
        self.run += 1;
        self.run
    }
}

struct Inner {
    state: SessionState,
    tokens: RequestTokens,
    highlight_generation: u64,
    highlight_timer: Option<JoinHandle<()>>,
}

impl Inner {
    /// Cancel any pending auto-clear
    fn cancel_highlight_timer(&mut self) {
        self.highlight_generation += 1;
        if let Some(timer) = self.highlight_timer.take() {
            timer.abort();
        }
    }

    fn clear_highlight(&mut self) {
        self.cancel_highlight_timer();
        self.state.highlight = None;
    }

    /// Reset analysis state and invalidate any analysis still in flight
    fn reset_analysis(&mut self) {
        self.tokens.next_analysis();
        self.cancel_highlight_timer();
        self.state.reset_analysis();
    }

    /// Keep the persistent debugger highlight in step with the cursor
    fn sync_debugger_highlight(&mut self) {
        if self.state.active_tab != Tab::Debugger {
            return;
        }
        self.cancel_highlight_timer();
        self.state.highlight = self.state.debugger_highlight();
    }
}

/// Which kind of finding a patch resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finding {
    Error,
    Suggestion,
}

/// Single owner of a session's state
pub struct SessionCoordinator {
    client: AnalysisClient,
    highlight_duration: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl SessionCoordinator {
    /// A session seeded with the default Fibonacci file
    pub fn new(client: AnalysisClient, config: &SessionConfig) -> Self {
        Self::with_state(
            client,
            SessionState::seeded(config.default_model.clone()),
            config.highlight_duration(),
        )
    }

    /// A session starting from an existing state
    pub fn with_state(client: AnalysisClient, state: SessionState, highlight_duration: Duration) -> Self {
        info!("Starting session with {} files", state.files.len());
        Self {
            client,
            highlight_duration,
            inner: Arc::new(Mutex::new(Inner {
                state,
                tokens: RequestTokens::default(),
                highlight_generation: 0,
                highlight_timer: None,
            })),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Make a file active; resets analysis state and follows the file's language
    pub async fn select_file(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.state.files.contains(name) {
            return Err(CoreError::unknown_file(name));
        }

        inner.reset_analysis();
        inner.state.activate(name)?;
        debug!("Selected '{}' (language {})", name, inner.state.language);
        Ok(())
    }

    /// Replace the content of the active file
    pub async fn edit_content(&self, content: impl Into<String>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let active = inner
            .state
            .files
            .active_name()
            .map(str::to_string)
            .ok_or_else(|| CoreError::empty_input(analysis::EMPTY_FILE_MESSAGE))?;
        inner.state.files.update_content(&active, content)
    }

    /// Declare a language; a concrete language renames the active file to match
    ///
    /// Returns the active file's new name when a rename happened. The current result and
    /// highlight follow the file to its new name.
    pub async fn set_language(&self, selection: LanguageSelection) -> Result<Option<String>> {
        let mut inner = self.inner.lock().await;
        inner.state.language = selection;

        if selection.is_all() {
            return Ok(None);
        }
        let Some(active) = inner.state.files.active_name().map(str::to_string) else {
            return Ok(None);
        };

        let (files, renamed) = inner.state.files.rename_for_language(&active, selection)?;
        inner.state.files = files;
        if renamed == active {
            return Ok(None);
        }

        let state = &mut inner.state;
        if let Some(result) = state.result.as_mut() {
            let moved = result.rename_file(&active, &renamed);
            debug!("Moved {} result entries from '{}' to '{}'", moved, active, renamed);
        }
        if let Some(highlight) = state.highlight.as_mut().filter(|h| h.file_path == active) {
            highlight.file_path = renamed.clone();
        }
        Ok(Some(renamed))
    }

    pub async fn set_model(&self, model: impl Into<String>) {
        self.inner.lock().await.state.model = model.into();
    }

    /// Swap in a new set of files; the first one becomes active and auto-detect is declared
    pub async fn replace_files(&self, files: FileStore) -> Result<()> {
        if files.is_empty() {
            return Err(CoreError::empty_input(analysis::NO_FILES_MESSAGE));
        }

        let mut inner = self.inner.lock().await;
        inner.reset_analysis();
        inner.state.files = files;
        inner.state.language = LanguageSelection::All;
        info!("Loaded {} files", inner.state.files.len());
        Ok(())
    }

    /// Read a folder from disk and replace the files with it
    ///
    /// Nothing changes unless every file was read.
    pub async fn upload_folder(&self, root: &Path) -> Result<()> {
        let files = ingest::read_folder(root).await?;
        self.replace_files(files).await
    }

    /// Analyze the active file
    pub async fn analyze_file(&self) -> Result<Disposition> {
        let (token, request) = {
            let mut inner = self.inner.lock().await;
            let state = &inner.state;
            let checked = match state.files.active_file() {
                Some(file) => analysis::preflight(&file.content, Some(&file.name), state.language)
                    .map(|_| file.clone()),
                None => Err(CoreError::empty_input(analysis::EMPTY_FILE_MESSAGE)),
            };
            let file = match checked {
                Ok(file) => file,
                Err(err) => {
                    inner.state.error = Some(err.to_string());
                    return Err(err);
                }
            };

            let request = AnalysisRequest::SingleFile {
                content: file.content,
                file_name: file.name.clone(),
                language: inner.state.language,
                model: inner.state.model.clone(),
            };
            inner.cancel_highlight_timer();
            let token = inner.tokens.next_analysis();
            inner.state.begin_analysis(format!("Analysis for: {}", file.name));
            (token, request)
        };

        self.complete_analysis(token, request).await
    }

    /// Analyze every file together
    pub async fn analyze_project(&self) -> Result<Disposition> {
        let (token, request) = {
            let mut inner = self.inner.lock().await;
            if inner.state.files.is_empty() {
                let err = CoreError::empty_input(analysis::NO_FILES_MESSAGE);
                inner.state.error = Some(err.to_string());
                return Err(err);
            }

            let request = AnalysisRequest::Project {
                files: inner.state.files.snapshot(),
                language: inner.state.language,
                model: inner.state.model.clone(),
            };
            inner.cancel_highlight_timer();
            let token = inner.tokens.next_analysis();
            inner.state.begin_analysis(PROJECT_TITLE.to_string());
            (token, request)
        };

        self.complete_analysis(token, request).await
    }

    async fn complete_analysis(&self, token: u64, request: AnalysisRequest) -> Result<Disposition> {
        debug!("Issued analysis token {}", token);
        let outcome = self.client.run_full(&request).await;

        let mut inner = self.inner.lock().await;
        if inner.tokens.analysis != token {
            debug!("Discarding stale analysis response (token {}, latest {})", token, inner.tokens.analysis);
            return Ok(Disposition::Stale);
        }

        match outcome {
            Ok(result) => {
                info!(
                    "Analysis ready: {} errors, {} suggestions, {} debugger steps",
                    result.review.errors.len(),
                    result.review.suggestions.len(),
                    result.debugger_trace.len()
                );
                inner.state.finish_analysis(result);
                Ok(Disposition::Current)
            }
            Err(failure) => {
                inner.state.fail_analysis(failure.message().to_string());
                Err(failure.into())
            }
        }
    }

    /// Predict output and complexity of the active file
    ///
    /// A mismatch or empty file fails the run without a backend call. Otherwise the
    /// analysis state is reset first.
    pub async fn quick_run(&self) -> Result<Disposition> {
        let (token, request) = {
            let mut inner = self.inner.lock().await;
            let state = &inner.state;
            let checked = match state.files.active_file() {
                Some(file) => analysis::preflight(&file.content, Some(&file.name), state.language)
                    .map(|_| file.content.clone()),
                None => Err(CoreError::empty_input(analysis::EMPTY_FILE_MESSAGE)),
            };
            let content = match checked {
                Ok(content) => content,
                Err(err) => {
                    inner.state.run = RunState::Failed { message: err.to_string() };
                    return Err(err);
                }
            };

            inner.reset_analysis();
            let request = AnalysisRequest::QuickRun {
                content,
                language: inner.state.language,
                model: inner.state.model.clone(),
            };
            let token = inner.tokens.next_run();
            inner.state.run = RunState::Running;
            (token, request)
        };

        let outcome = self.client.run_quick(&request).await;

        let mut inner = self.inner.lock().await;
        if inner.tokens.run != token {
            debug!("Discarding stale quick-run response (token {}, latest {})", token, inner.tokens.run);
            return Ok(Disposition::Stale);
        }

        match outcome {
            Ok(result) => {
                inner.state.run = RunState::Completed { result };
                Ok(Disposition::Current)
            }
            Err(failure) => {
                inner.state.run = RunState::Failed { message: failure.message().to_string() };
                Err(failure.into())
            }
        }
    }

    /// Apply an error's fix; `file_path` defaults to the active file
    pub async fn apply_fix(
        &self,
        file_path: Option<&str>,
        line_number: usize,
        snippet: &str,
    ) -> Result<String> {
        self.apply_finding(Finding::Error, file_path, line_number, snippet).await
    }

    /// Apply a suggestion; `file_path` defaults to the active file
    pub async fn apply_suggestion(
        &self,
        file_path: Option<&str>,
        line_number: usize,
        snippet: &str,
    ) -> Result<String> {
        self.apply_finding(Finding::Suggestion, file_path, line_number, snippet).await
    }

    /// Apply the fix of the error at `index` in the current result
    pub async fn apply_error_fix(&self, index: usize) -> Result<String> {
        let error = {
            let inner = self.inner.lock().await;
            inner
                .state
                .result
                .as_ref()
                .and_then(|r| r.review.errors.get(index))
                .cloned()
                .ok_or(CoreError::UnknownFinding { kind: "error", index })?
        };
        self.apply_fix(Some(&error.file_path), error.line_number, &error.suggested_fix).await
    }

    /// Apply the suggestion at `index` in the current result
    pub async fn apply_suggestion_at(&self, index: usize) -> Result<String> {
        let suggestion = {
            let inner = self.inner.lock().await;
            inner
                .state
                .result
                .as_ref()
                .and_then(|r| r.review.suggestions.get(index))
                .cloned()
                .ok_or(CoreError::UnknownFinding { kind: "suggestion", index })?
        };
        self.apply_suggestion(Some(&suggestion.file_path), suggestion.line_number, &suggestion.suggestion)
            .await
    }

    /// Patch the store, flag matching findings and highlight the line, all under one lock
    async fn apply_finding(
        &self,
        finding: Finding,
        file_path: Option<&str>,
        line_number: usize,
        snippet: &str,
    ) -> Result<String> {
        let mut inner = self.inner.lock().await;
        let target_file = match file_path {
            Some(path) => path.to_string(),
            None => inner
                .state
                .files
                .active_name()
                .map(str::to_string)
                .ok_or_else(|| CoreError::empty_input(analysis::EMPTY_FILE_MESSAGE))?,
        };

        let target = PatchTarget::new(target_file.clone(), line_number, snippet);
        let patched = patch::apply_patch(&inner.state.files, &target).inspect_err(|e| warn!("{}", e))?;
        inner.state.files = patched;

        if let Some(result) = inner.state.result.as_mut() {
            let marked = match finding {
                Finding::Error => result.mark_fixed(&target_file, line_number),
                Finding::Suggestion => result.mark_applied(&target_file, line_number),
            };
            debug!("Marked {} {:?} entries at {}:{}", marked, finding, target_file, line_number);
        }

        let highlight =
            Highlight { file_path: target_file.clone(), line_number, kind: HighlightKind::Patch };
        self.set_transient_highlight(&mut inner, highlight);
        info!("Applied {:?} at {}:{}", finding, target_file, line_number);
        Ok(target_file)
    }

    /// Highlight a line for the configured duration
    pub async fn highlight_line(&self, file_path: &str, line_number: usize) {
        let mut inner = self.inner.lock().await;
        let highlight =
            Highlight { file_path: file_path.to_string(), line_number, kind: HighlightKind::Focus };
        self.set_transient_highlight(&mut inner, highlight);
    }

    fn set_transient_highlight(&self, inner: &mut Inner, highlight: Highlight) {
        inner.cancel_highlight_timer();
        inner.state.highlight = Some(highlight);

        let generation = inner.highlight_generation;
        let duration = self.highlight_duration;
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        inner.highlight_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = shared.lock().await;
            if inner.highlight_generation == generation {
                inner.state.highlight = None;
                inner.highlight_timer = None;
            }
        }));
    }

    /// Switch the result panel tab
    pub async fn select_tab(&self, tab: Tab) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.state.is_tab_enabled(tab) {
            return Err(CoreError::TabDisabled { tab });
        }

        let leaving_debugger = inner.state.active_tab == Tab::Debugger && tab != Tab::Debugger;
        inner.state.active_tab = tab;

        if leaving_debugger
            && matches!(&inner.state.highlight, Some(h) if h.kind == HighlightKind::DebuggerStep)
        {
            inner.clear_highlight();
        }
        inner.sync_debugger_highlight();
        Ok(())
    }

    /// Move the debugger cursor to `step`, clamped to the trace; returns the new cursor
    pub async fn set_step(&self, step: usize) -> usize {
        let mut inner = self.inner.lock().await;
        let last = inner.state.step_count().saturating_sub(1);
        inner.state.debugger_step = step.min(last);
        inner.sync_debugger_highlight();
        inner.state.debugger_step
    }

    pub async fn next_step(&self) -> usize {
        let current = self.inner.lock().await.state.debugger_step;
        self.set_step(current.saturating_add(1)).await
    }

    pub async fn prev_step(&self) -> usize {
        let current = self.inner.lock().await.state.debugger_step;
        self.set_step(current.saturating_sub(1)).await
    }

    /// Drop the current analysis; any analysis still in flight is discarded when it lands
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.reset_analysis();
        info!("Session reset");
    }

    /// Errors in `file_path` that are still unfixed, for error-line markers
    pub async fn unfixed_errors_for(&self, file_path: &str) -> Vec<CodeError> {
        let inner = self.inner.lock().await;
        inner
            .state
            .result
            .as_ref()
            .map(|r| r.unfixed_errors(file_path).cloned().collect())
            .unwrap_or_default()
    }

    /// Variable annotation for a line, shown only for the current debugger step
    pub async fn step_annotation(&self, file_path: &str, line_number: usize) -> Option<String> {
        let inner = self.inner.lock().await;
        let state = &inner.state;
        if state.active_tab != Tab::Debugger {
            return None;
        }

        let step = state.result.as_ref()?.debugger_trace.steps.get(state.debugger_step)?;
        (step.file_path == file_path && step.line_number == line_number)
            .then(|| step.state.annotation())
    }
}
