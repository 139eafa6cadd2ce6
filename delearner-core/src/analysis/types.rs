//! Analysis result types
//!
//! These are the resolved forms: every finding carries the file it belongs to, and the
//! `is_fixed`/`is_applied` flags are owned by the client. Wire forms live in
//! [`super::wire`].

use serde::{Deserialize, Serialize};

/// Full result of a single-file or project analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub review: Review,
    pub debugger_trace: DebuggerTrace,
    pub performance_profile: PerformanceProfile,
    pub test_cases: TestCases,
    pub alternative_solutions: AlternativeSolutions,
}

impl AnalysisResult {
    /// Mark every error at `(file_path, line_number)` as fixed; returns how many changed
    pub fn mark_fixed(&mut self, file_path: &str, line_number: usize) -> usize {
        let mut marked = 0;
        for error in &mut self.review.errors {
            if !error.is_fixed && error.file_path == file_path && error.line_number == line_number
            {
                error.is_fixed = true;
                marked += 1;
            }
        }
        marked
    }

    /// Mark every suggestion at `(file_path, line_number)` as applied; returns how many changed
    pub fn mark_applied(&mut self, file_path: &str, line_number: usize) -> usize {
        let mut marked = 0;
        for suggestion in &mut self.review.suggestions {
            if !suggestion.is_applied
                && suggestion.file_path == file_path
                && suggestion.line_number == line_number
            {
                suggestion.is_applied = true;
                marked += 1;
            }
        }
        marked
    }

    /// Point every entry addressed at `from` to `to`; returns how many changed
    pub fn rename_file(&mut self, from: &str, to: &str) -> usize {
        let paths = self
            .review
            .errors
            .iter_mut()
            .map(|e| &mut e.file_path)
            .chain(self.review.suggestions.iter_mut().map(|s| &mut s.file_path))
            .chain(self.debugger_trace.steps.iter_mut().map(|s| &mut s.file_path))
            .chain(self.performance_profile.bottlenecks.iter_mut().map(|b| &mut b.file_path));

        let mut renamed = 0;
        for path in paths {
            if *path == from {
                *path = to.to_string();
                renamed += 1;
            }
        }
        renamed
    }

    /// Errors in `file_path` that have not been fixed yet
    pub fn unfixed_errors<'a>(&'a self, file_path: &'a str) -> impl Iterator<Item = &'a CodeError> {
        self.review.errors.iter().filter(move |e| !e.is_fixed && e.file_path == file_path)
    }

    /// Whether every structured section is empty
    pub fn is_all_clear(&self) -> bool {
        self.review.errors.is_empty()
            && self.review.suggestions.is_empty()
            && self.debugger_trace.is_empty()
            && self.performance_profile.is_empty()
            && self.test_cases.is_empty()
            && self.alternative_solutions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub overall_explanation: String,
    pub errors: Vec<CodeError>,
    pub suggestions: Vec<CodeSuggestion>,
}

/// A bug found by the review, with a replacement for its line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeError {
    pub file_path: String,
    pub line_number: usize,
    pub error_description: String,
    pub suggested_fix: String,
    pub fix_explanation: String,
    pub is_fixed: bool,
}

/// An improvement proposed by the review, with a replacement for its line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSuggestion {
    pub file_path: String,
    pub line_number: usize,
    pub suggestion: String,
    pub explanation: String,
    pub is_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerTrace {
    pub steps: Vec<DebuggerStep>,
}

impl DebuggerTrace {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggerStep {
    pub file_path: String,
    pub line_number: usize,
    pub state: DebuggerState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggerState {
    pub execution: String,
    pub variables: Vec<DebuggerVariable>,
    pub call_stack: Vec<String>,
}

impl DebuggerState {
    /// Variables rendered as `name: value` pairs, values shown exactly as received
    pub fn annotation(&self) -> String {
        self.variables
            .iter()
            .map(|v| format!("{}: {}", v.name, v.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A variable in scope; `value` is literal syntax authored by the model and never parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub summary: String,
    pub bottlenecks: Vec<Bottleneck>,
    pub optimizations: Vec<Optimization>,
}

impl PerformanceProfile {
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.bottlenecks.is_empty() && self.optimizations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub file_path: String,
    pub line_number: usize,
    pub function_name: String,
    pub calls: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimization {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCases {
    pub generated: Vec<TestCase>,
    pub edge_cases: Vec<TestCase>,
}

impl TestCases {
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.edge_cases.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeSolutions {
    pub solutions: Vec<Solution>,
}

impl AlternativeSolutions {
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub title: String,
    pub complexity: Complexity,
    pub explanation: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}

/// Reduced result of a quick run: predicted output and complexity only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResult {
    pub output: String,
    pub time_complexity: String,
    pub space_complexity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_at(file: &str, line: usize) -> CodeError {
        CodeError {
            file_path: file.to_string(),
            line_number: line,
            error_description: "off by one".to_string(),
            suggested_fix: "i < n".to_string(),
            fix_explanation: "bound".to_string(),
            is_fixed: false,
        }
    }

    #[test]
    fn test_mark_fixed_matches_file_and_line_exactly() {
        let mut result = AnalysisResult::default();
        result.review.errors =
            vec![error_at("a.js", 3), error_at("b.js", 3), error_at("a.js", 4), error_at("a.js", 3)];

        assert_eq!(result.mark_fixed("a.js", 3), 2);
        let flags: Vec<bool> = result.review.errors.iter().map(|e| e.is_fixed).collect();
        assert_eq!(flags, vec![true, false, false, true]);

        // already fixed entries are not counted again
        assert_eq!(result.mark_fixed("a.js", 3), 0);
        assert_eq!(result.unfixed_errors("a.js").count(), 1);
    }

    #[test]
    fn test_rename_file_moves_every_section() {
        let mut result = AnalysisResult::default();
        result.review.errors = vec![error_at("a.js", 1), error_at("b.js", 2)];
        result.review.suggestions.push(CodeSuggestion {
            file_path: "a.js".to_string(),
            line_number: 1,
            suggestion: "x".to_string(),
            explanation: "y".to_string(),
            is_applied: false,
        });
        result.debugger_trace.steps.push(DebuggerStep {
            file_path: "a.js".to_string(),
            line_number: 1,
            state: DebuggerState::default(),
        });
        result.performance_profile.bottlenecks.push(Bottleneck {
            file_path: "a.js".to_string(),
            line_number: 1,
            function_name: "f".to_string(),
            calls: 3,
            reason: "hot".to_string(),
        });

        assert_eq!(result.rename_file("a.js", "a.ts"), 4);
        assert_eq!(result.review.errors[0].file_path, "a.ts");
        assert_eq!(result.review.errors[1].file_path, "b.js");
        assert_eq!(result.review.suggestions[0].file_path, "a.ts");
        assert_eq!(result.debugger_trace.steps[0].file_path, "a.ts");
        assert_eq!(result.performance_profile.bottlenecks[0].file_path, "a.ts");
        assert_eq!(result.rename_file("a.js", "a.ts"), 0);
    }

    #[test]
    fn test_annotation_keeps_values_verbatim() {
        let state = DebuggerState {
            execution: "call".to_string(),
            variables: vec![
                DebuggerVariable { name: "n".to_string(), value: "4".to_string() },
                DebuggerVariable { name: "s".to_string(), value: "\"hello\"".to_string() },
                DebuggerVariable { name: "bad".to_string(), value: "[1, ".to_string() },
            ],
            call_stack: vec![],
        };
        assert_eq!(state.annotation(), "n: 4, s: \"hello\", bad: [1, ");
    }

    #[test]
    fn test_default_result_is_all_clear() {
        assert!(AnalysisResult::default().is_all_clear());
    }
}
