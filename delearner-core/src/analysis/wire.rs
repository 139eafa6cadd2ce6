//! Wire forms of the analysis payload
//!
//! The backend may omit `filePath` on findings. Resolution turns every raw finding into
//! its resolved form once, at the boundary: in single-file scope every finding belongs
//! to the analysed file, in project scope the path must name a file that was sent.

use super::types::{
    AlternativeSolutions, AnalysisResult, Bottleneck, CodeError, CodeSuggestion, DebuggerState,
    DebuggerStep, DebuggerTrace, Optimization, PerformanceProfile, Review, TestCases,
};
use serde::Deserialize;
use thiserror::Error;

/// Files a payload may refer to
#[derive(Debug, Clone, Copy)]
pub enum ResolveScope<'a> {
    /// One analysed file; every finding belongs to it
    SingleFile(&'a str),
    /// A project; findings must name one of these files
    Project(&'a [String]),
}

impl ResolveScope<'_> {
    fn resolve(&self, file_path: Option<String>) -> Result<String, ResolveError> {
        match self {
            Self::SingleFile(name) => Ok((*name).to_string()),
            Self::Project(names) => {
                let raw = file_path.ok_or(ResolveError::MissingPath)?;
                let wanted = raw.trim().trim_start_matches("./");
                names
                    .iter()
                    .find(|name| name.as_str() == wanted)
                    .cloned()
                    .ok_or(ResolveError::UnknownPath(raw))
            }
        }
    }
}

/// A payload that parsed but does not fit the files it was produced for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("finding without filePath in project analysis")]
    MissingPath,

    #[error("finding refers to unknown file '{0}'")]
    UnknownPath(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResult {
    pub review: RawReview,
    pub debugger_trace: RawDebuggerTrace,
    pub performance_profile: RawPerformanceProfile,
    pub test_cases: TestCases,
    pub alternative_solutions: AlternativeSolutions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub overall_explanation: String,
    pub errors: Vec<RawCodeError>,
    pub suggestions: Vec<RawCodeSuggestion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCodeError {
    pub file_path: Option<String>,
    pub line_number: usize,
    pub error_description: String,
    pub suggested_fix: String,
    pub fix_explanation: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCodeSuggestion {
    pub file_path: Option<String>,
    pub line_number: usize,
    pub suggestion: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDebuggerTrace {
    pub steps: Vec<RawDebuggerStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDebuggerStep {
    pub file_path: Option<String>,
    pub line_number: usize,
    pub state: DebuggerState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPerformanceProfile {
    pub summary: String,
    pub bottlenecks: Vec<RawBottleneck>,
    pub optimizations: Vec<Optimization>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBottleneck {
    pub file_path: Option<String>,
    pub line_number: usize,
    pub function_name: String,
    pub calls: u64,
    pub reason: String,
}

impl RawAnalysisResult {
    /// Resolve every finding's file and reset client-owned flags
    pub fn resolve(self, scope: ResolveScope<'_>) -> Result<AnalysisResult, ResolveError> {
        let errors = self
            .review
            .errors
            .into_iter()
            .map(|e| {
                Ok(CodeError {
                    file_path: scope.resolve(e.file_path)?,
                    line_number: e.line_number,
                    error_description: e.error_description,
                    suggested_fix: e.suggested_fix,
                    fix_explanation: e.fix_explanation,
                    is_fixed: false,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let suggestions = self
            .review
            .suggestions
            .into_iter()
            .map(|s| {
                Ok(CodeSuggestion {
                    file_path: scope.resolve(s.file_path)?,
                    line_number: s.line_number,
                    suggestion: s.suggestion,
                    explanation: s.explanation,
                    is_applied: false,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let steps = self
            .debugger_trace
            .steps
            .into_iter()
            .map(|s| {
                Ok(DebuggerStep {
                    file_path: scope.resolve(s.file_path)?,
                    line_number: s.line_number,
                    state: s.state,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let bottlenecks = self
            .performance_profile
            .bottlenecks
            .into_iter()
            .map(|b| {
                Ok(Bottleneck {
                    file_path: scope.resolve(b.file_path)?,
                    line_number: b.line_number,
                    function_name: b.function_name,
                    calls: b.calls,
                    reason: b.reason,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        Ok(AnalysisResult {
            review: Review {
                overall_explanation: self.review.overall_explanation,
                errors,
                suggestions,
            },
            debugger_trace: DebuggerTrace { steps },
            performance_profile: PerformanceProfile {
                summary: self.performance_profile.summary,
                bottlenecks,
                optimizations: self.performance_profile.optimizations,
            },
            test_cases: self.test_cases,
            alternative_solutions: self.alternative_solutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(file_path: serde_json::Value) -> RawAnalysisResult {
        serde_json::from_value(json!({
            "review": {
                "overallExplanation": "Computes fibonacci.",
                "errors": [{
                    "filePath": file_path,
                    "lineNumber": 2,
                    "errorDescription": "slow",
                    "suggestedFix": "if (n < 2) return n;",
                    "fixExplanation": "same",
                    "isFixed": true
                }],
                "suggestions": []
            },
            "debuggerTrace": {"steps": [{
                "lineNumber": 1,
                "state": {"execution": "enter", "variables": [{"name": "n", "value": "4"}], "callStack": ["fibonacci"]}
            }]},
            "performanceProfile": {"summary": "", "bottlenecks": [], "optimizations": []},
            "testCases": {"generated": [], "edgeCases": []},
            "alternativeSolutions": {"solutions": []}
        }))
        .unwrap()
    }

    #[test]
    fn test_single_file_scope_fills_paths_and_clears_flags() {
        let result = payload(json!(null)).resolve(ResolveScope::SingleFile("fib.js")).unwrap();
        assert_eq!(result.review.errors[0].file_path, "fib.js");
        assert!(!result.review.errors[0].is_fixed);
        assert_eq!(result.debugger_trace.steps[0].file_path, "fib.js");
    }

    #[test]
    fn test_project_scope_requires_known_path() {
        let names = vec!["src/a.js".to_string(), "src/b.js".to_string()];

        let result = payload(json!("./src/b.js")).resolve(ResolveScope::Project(&names));
        // the debugger step has no path
        assert_eq!(result.unwrap_err(), ResolveError::MissingPath);

        let err = payload(json!("src/c.js")).resolve(ResolveScope::Project(&names)).unwrap_err();
        assert_eq!(err, ResolveError::UnknownPath("src/c.js".to_string()));
    }

    #[test]
    fn test_project_scope_strips_leading_dot_slash() {
        let names = vec!["src/a.js".to_string()];
        assert_eq!(ResolveScope::Project(&names).resolve(Some("./src/a.js".into())).unwrap(), "src/a.js");
    }

    #[test]
    fn test_negative_line_is_rejected() {
        let parsed = serde_json::from_value::<RawCodeSuggestion>(json!({
            "lineNumber": -1, "suggestion": "x", "explanation": "y"
        }));
        assert!(parsed.is_err());
    }
}
