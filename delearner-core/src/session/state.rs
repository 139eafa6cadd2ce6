//! Serializable view state of one session

use crate::analysis::{AnalysisResult, SimpleResult};
use crate::language::{self, Language, LanguageSelection};
use crate::store::FileStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result panel tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Review,
    Debugger,
    Performance,
    TestCases,
    Solutions,
}

impl Tab {
    pub const ALL: [Tab; 5] =
        [Self::Review, Self::Debugger, Self::Performance, Self::TestCases, Self::Solutions];

    /// Whether this tab has content to show for `result`
    pub fn is_enabled_for(self, result: &AnalysisResult) -> bool {
        match self {
            // carries the narrative even when every list is empty
            Self::Review => true,
            Self::Debugger => !result.debugger_trace.is_empty(),
            Self::Performance => !result.performance_profile.is_empty(),
            Self::TestCases => !result.test_cases.is_empty(),
            Self::Solutions => !result.alternative_solutions.is_empty(),
        }
    }

    /// Tabs with content for `result`, in display order
    pub fn enabled_for(result: &AnalysisResult) -> Vec<Tab> {
        Self::ALL.into_iter().filter(|tab| tab.is_enabled_for(result)).collect()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Review => write!(f, "Review"),
            Self::Debugger => write!(f, "Debugger"),
            Self::Performance => write!(f, "Performance"),
            Self::TestCases => write!(f, "Test Cases"),
            Self::Solutions => write!(f, "Solutions"),
        }
    }
}

/// Lifecycle of the analysis panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Why a line is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightKind {
    /// Just patched; cleared by a timer
    Patch,
    /// Requested explicitly; cleared by a timer
    Focus,
    /// Current debugger step; stays while the debugger tab is active
    DebuggerStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub file_path: String,
    pub line_number: usize,
    pub kind: HighlightKind,
}

/// Quick-run panel state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed { result: SimpleResult },
    Failed { message: String },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Everything the presentation layer needs to render a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub files: FileStore,
    pub language: LanguageSelection,
    pub model: String,
    pub phase: Phase,
    pub result: Option<AnalysisResult>,
    pub analysis_title: Option<String>,
    pub error: Option<String>,
    pub active_tab: Tab,
    pub debugger_step: usize,
    pub highlight: Option<Highlight>,
    pub run: RunState,
}

impl SessionState {
    /// Fresh state over `files`
    pub fn new(files: FileStore, language: LanguageSelection, model: impl Into<String>) -> Self {
        Self {
            files,
            language,
            model: model.into(),
            phase: Phase::Idle,
            result: None,
            analysis_title: None,
            error: None,
            active_tab: Tab::Review,
            debugger_step: 0,
            highlight: None,
            run: RunState::Idle,
        }
    }

    /// The default Fibonacci session, declared as JavaScript
    pub fn seeded(model: impl Into<String>) -> Self {
        Self::new(FileStore::seeded(), Language::JavaScript.into(), model)
    }

    /// Drop the current analysis and everything derived from it
    pub fn reset_analysis(&mut self) {
        self.phase = Phase::Idle;
        self.result = None;
        self.analysis_title = None;
        self.error = None;
        self.highlight = None;
        self.debugger_step = 0;
        self.active_tab = Tab::Review;
    }

    /// Enter `Loading` for a new analysis
    pub(crate) fn begin_analysis(&mut self, title: String) {
        self.reset_analysis();
        self.analysis_title = Some(title);
        self.phase = Phase::Loading;
    }

    pub(crate) fn finish_analysis(&mut self, result: AnalysisResult) {
        self.result = Some(result);
        self.error = None;
        self.debugger_step = 0;
        self.active_tab = Tab::Review;
        self.phase = Phase::Ready;
    }

    pub(crate) fn fail_analysis(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
        self.phase = Phase::Failed;
    }

    /// Make `name` active and follow its language, or auto-detect when unknown
    pub(crate) fn activate(&mut self, name: &str) -> crate::error::Result<()> {
        self.files.set_active(name)?;
        self.language = language::detect(name).map(LanguageSelection::from).unwrap_or_default();
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Whether a tab has content to show for the current result
    pub fn is_tab_enabled(&self, tab: Tab) -> bool {
        self.result.as_ref().is_some_and(|result| tab.is_enabled_for(result))
    }

    pub fn enabled_tabs(&self) -> Vec<Tab> {
        self.result.as_ref().map(Tab::enabled_for).unwrap_or_default()
    }

    /// Number of steps in the current debugger trace
    pub fn step_count(&self) -> usize {
        self.result.as_ref().map(|r| r.debugger_trace.len()).unwrap_or(0)
    }

    /// Highlight for the current debugger step, if there is one
    pub(crate) fn debugger_highlight(&self) -> Option<Highlight> {
        let step = self.result.as_ref()?.debugger_trace.steps.get(self.debugger_step)?;
        Some(Highlight {
            file_path: step.file_path.clone(),
            line_number: step.line_number,
            kind: HighlightKind::DebuggerStep,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DebuggerState, DebuggerStep, TestCase};

    fn ready_with(result: AnalysisResult) -> SessionState {
        let mut state = SessionState::seeded("m");
        state.begin_analysis("Analysis for: fibonacci.js".to_string());
        state.finish_analysis(result);
        state
    }

    #[test]
    fn test_no_result_disables_every_tab() {
        let state = SessionState::seeded("m");
        assert!(state.enabled_tabs().is_empty());
    }

    #[test]
    fn test_empty_result_enables_only_review() {
        let state = ready_with(AnalysisResult::default());
        assert_eq!(state.enabled_tabs(), vec![Tab::Review]);
        assert_eq!(state.step_count(), 0);
    }

    #[test]
    fn test_sections_enable_their_tabs() {
        let mut result = AnalysisResult::default();
        result.debugger_trace.steps.push(DebuggerStep {
            file_path: "fibonacci.js".to_string(),
            line_number: 2,
            state: DebuggerState::default(),
        });
        result.test_cases.edge_cases.push(TestCase {
            input: "0".to_string(),
            expected_output: "0".to_string(),
            description: "base".to_string(),
        });
        result.performance_profile.summary = "Exponential".to_string();

        let state = ready_with(result);
        assert_eq!(
            state.enabled_tabs(),
            vec![Tab::Review, Tab::Debugger, Tab::Performance, Tab::TestCases]
        );
        assert_eq!(state.debugger_highlight().unwrap().line_number, 2);
    }

    #[test]
    fn test_activate_follows_detected_language() {
        let mut state = SessionState::new(
            FileStore::with_files(vec![
                crate::store::CodeFile::new("a.py", "x"),
                crate::store::CodeFile::new("notes.txt", "y"),
            ])
            .unwrap(),
            LanguageSelection::All,
            "m",
        );

        state.activate("a.py").unwrap();
        assert_eq!(state.language, LanguageSelection::Specific(Language::Python));
        state.activate("notes.txt").unwrap();
        assert_eq!(state.language, LanguageSelection::All);
        assert!(state.activate("missing.rs").is_err());
    }

    #[test]
    fn test_tab_display() {
        assert_eq!(Tab::TestCases.to_string(), "Test Cases");
    }
}
