//! Text and JSON rendering of command output

use anyhow::Result;
use delearner_core::analysis::{AnalysisResult, SimpleResult};
use delearner_core::llm::SUPPORTED_MODELS;
use delearner_core::{LanguageSelection, Tab};
use serde::Serialize;
use std::fmt::Write;

pub fn json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn location(file_path: &str, line_number: usize) -> String {
    format!("{}:{}", file_path, line_number)
}

pub fn analysis(title: &str, result: &AnalysisResult, enabled: &[Tab]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", title);

    let review = &result.review;
    let _ = writeln!(out, "== {} ==", Tab::Review);
    let _ = writeln!(out, "{}", review.overall_explanation);
    if review.errors.is_empty() && review.suggestions.is_empty() {
        let _ = writeln!(out, "All clear: no errors or suggestions.");
    }
    for (i, error) in review.errors.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n[error {}] {} {}",
            i,
            location(&error.file_path, error.line_number),
            error.error_description
        );
        let _ = writeln!(out, "  fix: {}", error.suggested_fix.trim());
        let _ = writeln!(out, "  why: {}", error.fix_explanation);
    }
    for (i, suggestion) in review.suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n[suggestion {}] {}",
            i,
            location(&suggestion.file_path, suggestion.line_number)
        );
        let _ = writeln!(out, "  code: {}", suggestion.suggestion.trim());
        let _ = writeln!(out, "  why: {}", suggestion.explanation);
    }

    if enabled.contains(&Tab::Debugger) {
        let _ = writeln!(out, "\n== {} ==", Tab::Debugger);
        for (i, step) in result.debugger_trace.steps.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {} {}",
                i + 1,
                location(&step.file_path, step.line_number),
                step.state.execution
            );
            if !step.state.variables.is_empty() {
                let _ = writeln!(out, "     vars: {}", step.state.annotation());
            }
            if !step.state.call_stack.is_empty() {
                let _ = writeln!(out, "     stack: {}", step.state.call_stack.join(" > "));
            }
        }
    }

    if enabled.contains(&Tab::Performance) {
        let profile = &result.performance_profile;
        let _ = writeln!(out, "\n== {} ==", Tab::Performance);
        let _ = writeln!(out, "{}", profile.summary);
        for bottleneck in &profile.bottlenecks {
            let _ = writeln!(
                out,
                "- {} {} ({} calls): {}",
                location(&bottleneck.file_path, bottleneck.line_number),
                bottleneck.function_name,
                bottleneck.calls,
                bottleneck.reason
            );
        }
        for optimization in &profile.optimizations {
            let _ = writeln!(out, "* {}: {}", optimization.title, optimization.description);
        }
    }

    if enabled.contains(&Tab::TestCases) {
        let _ = writeln!(out, "\n== {} ==", Tab::TestCases);
        let cases = &result.test_cases;
        for (label, list) in [("test", &cases.generated), ("edge", &cases.edge_cases)] {
            for case in list {
                let _ = writeln!(
                    out,
                    "- [{}] {} => {} ({})",
                    label, case.input, case.expected_output, case.description
                );
            }
        }
    }

    if enabled.contains(&Tab::Solutions) {
        let _ = writeln!(out, "\n== {} ==", Tab::Solutions);
        for solution in &result.alternative_solutions.solutions {
            let _ = writeln!(
                out,
                "\n# {} (time {}, space {})\n{}\n\n{}",
                solution.title,
                solution.complexity.time,
                solution.complexity.space,
                solution.explanation,
                solution.code
            );
        }
    }

    out
}

pub fn quick_run(result: &SimpleResult) -> String {
    format!(
        "Output:\n{}\n\nTime complexity:  {}\nSpace complexity: {}\n",
        result.output, result.time_complexity, result.space_complexity
    )
}

pub fn languages() -> String {
    let mut out = String::from("Languages:\n");
    for selection in LanguageSelection::catalogue() {
        let extension = selection.language().map(|l| format!(".{}", l.extension())).unwrap_or_default();
        let _ = writeln!(out, "  {:<12} {:<14} {}", selection.id(), selection.display_name(), extension);
    }
    out.push_str("\nModels:\n");
    for model in SUPPORTED_MODELS {
        let _ = writeln!(out, "  {:<20} {}", model.id, model.name);
    }
    out
}
