//! Prompt construction for the three analysis modes
//!
//! Each mode pairs an instruction text with the schema from [`super::schema`].

use super::schema;
use crate::language::LanguageSelection;
use crate::llm::GenerationRequest;
use crate::store::CodeFile;
use regex_utils::file_marker;
use serde::{Deserialize, Serialize};

/// Closing line shared by every prompt
const JSON_ONLY: &str = "Respond ONLY with a valid JSON object that adheres to the provided \
     schema. Do not include any text or markdown formatting outside of the JSON object.";

const VARIABLE_ENCODING: &str = "**Important**: Variable values must be JSON literal strings \
     (e.g., a number `4` becomes the string `\"4\"`, a string `hello` becomes `\"\\\"hello\\\"\"`).";

/// One request to the analysis client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum AnalysisRequest {
    #[serde(rename_all = "camelCase")]
    SingleFile { content: String, file_name: String, language: LanguageSelection, model: String },
    Project { files: Vec<CodeFile>, language: LanguageSelection, model: String },
    QuickRun { content: String, language: LanguageSelection, model: String },
}

impl AnalysisRequest {
    pub fn model(&self) -> &str {
        match self {
            Self::SingleFile { model, .. } | Self::Project { model, .. } | Self::QuickRun { model, .. } => {
                model
            }
        }
    }

    pub fn language(&self) -> LanguageSelection {
        match self {
            Self::SingleFile { language, .. }
            | Self::Project { language, .. }
            | Self::QuickRun { language, .. } => *language,
        }
    }

    /// Short label used in logs
    pub fn mode(&self) -> &'static str {
        match self {
            Self::SingleFile { .. } => "single-file",
            Self::Project { .. } => "project",
            Self::QuickRun { .. } => "quick-run",
        }
    }

    pub fn is_quick_run(&self) -> bool {
        matches!(self, Self::QuickRun { .. })
    }

    /// Instruction text for this request
    pub fn prompt(&self) -> String {
        match self {
            Self::SingleFile { content, file_name, language, .. } => {
                PromptTemplates::single_file(content, file_name, *language)
            }
            Self::Project { files, language, .. } => PromptTemplates::project(files, *language),
            Self::QuickRun { content, language, .. } => {
                PromptTemplates::quick_run(content, *language)
            }
        }
    }

    /// Output schema for this request
    pub fn schema(&self) -> serde_json::Value {
        if self.is_quick_run() { schema::quick_run_schema() } else { schema::analysis_schema() }
    }

    /// The backend request: prompt, schema and JSON output mode
    pub fn to_generation_request(&self) -> GenerationRequest {
        GenerationRequest::json(self.model(), self.prompt(), self.schema())
    }
}

/// Prompt templates for each analysis mode
pub struct PromptTemplates;

impl PromptTemplates {
    pub fn single_file(content: &str, file_name: &str, language: LanguageSelection) -> String {
        let language_rule = match language.language() {
            None => {
                "The programming language should be auto-detected from the file content and name."
                    .to_string()
            }
            Some(lang) => format!(
                "The programming language is {name}. Before proceeding with the full analysis, \
                 first verify that the code provided is valid {name}. If it is not, your entire \
                 response must be a valid JSON object adhering to the schema, but with the \
                 'overallExplanation' in the 'review' object explaining the language mismatch, and \
                 all other array fields (errors, suggestions, steps, bottlenecks, etc.) must be empty.",
                name = lang.display_name()
            ),
        };

        format!(
            "As an expert code analysis agent, your task is to perform a comprehensive, \
             multi-faceted review of the following code from the file named '{file}'.\n\
             {language_rule}\n\
             Your analysis must cover the following five areas. For any findings (errors, \
             suggestions, bottlenecks, debugger steps), you MUST set the 'filePath' field to '{file}'.\n\n\
             1. **Code Review**:\n\
             * Provide a high-level explanation of the code's purpose.\n\
             * Identify critical bugs and errors. For each, provide the file path, line number, \
             description, suggested fix, and an explanation.\n\
             * Provide suggestions for improvement. For each, provide the file path, line number, \
             the suggested code, and an explanation.\n\n\
             2. **Debugger Trace**:\n\
             * Generate a detailed, step-by-step execution trace of the code's execution path.\n\
             * For each step, include the file path ('{file}'), line number, a description of the \
             execution action, all relevant variable states, and the current call stack.\n\
             * {variables}\n\
             * {trace_rule}\n\n\
             {rest}\n\n\
             {json_only}\n\n\
             Code from {file}:\n\
             {block}",
            file = file_name,
            language_rule = language_rule,
            variables = VARIABLE_ENCODING,
            trace_rule = Self::trace_rule("the code (e.g., for non-executable code or syntax errors)"),
            rest = Self::single_file_sections(),
            json_only = JSON_ONLY,
            block = Self::fenced(content, language),
        )
    }

    pub fn project(files: &[CodeFile], language: LanguageSelection) -> String {
        let language_rule = match language.language() {
            None => "This is a multi-language project. Please auto-detect the language for each \
                     file based on its extension and content."
                .to_string(),
            Some(lang) => format!(
                "The programming language for this project is primarily {name}. Before analyzing, \
                 if you find a file that is clearly not {name}, note it in the overall explanation. \
                 If the entire project seems to be a different language, your entire response must \
                 be a valid JSON object adhering to the schema, but with the 'overallExplanation' in \
                 the 'review' object explaining the language mismatch, and all other array fields \
                 (errors, suggestions, steps, bottlenecks, etc.) must be empty.",
                name = lang.display_name()
            ),
        };

        let formatted = files
            .iter()
            .map(|file| format!("{}\n{}\n", file_marker::render(&file.name), Self::fenced(&file.content, language)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "As an expert code analysis agent, your task is to perform a comprehensive, \
             multi-faceted review of the following multi-file project.\n\
             {language_rule}\n\
             The project files are provided below, separated by \"{marker}\".\n\n\
             Your analysis must cover the following five areas, considering the project as a \
             whole. When identifying issues or suggestions, **you must specify the correct file \
             path in the 'filePath' field**, exactly as it appears in the file marker.\n\n\
             1. **Code Review**:\n\
             * Provide a high-level explanation of the entire project's purpose and architecture.\n\
             * Identify critical bugs, errors, and cross-file inconsistencies. For each, provide \
             the file path, line number, description, suggested fix, and an explanation.\n\
             * Provide suggestions for improvement (e.g., architecture, performance, readability). \
             For each, provide the file path, line number, suggested code, and explanation.\n\n\
             2. **Debugger Trace**:\n\
             * Pick the main entry point or most significant execution path of the project and \
             generate a detailed, step-by-step execution trace.\n\
             * For each step, include the correct **file path**, line number, a description of \
             the execution action, all relevant variable states, and the current call stack.\n\
             * {variables}\n\
             * {trace_rule}\n\n\
             3. **Performance Profile**:\n\
             * Provide a summary of the project's overall performance characteristics.\n\
             * Identify any performance bottlenecks, specifying the file path, line number, \
             function name, and reason.\n\
             * Suggest concrete optimizations.\n\n\
             4. **Test Cases**:\n\
             * Generate a set of integration test cases for the project with inputs, expected \
             outputs, and descriptions.\n\
             * Generate edge cases that test interactions between different parts of the project.\n\n\
             5. **Alternative Solutions**:\n\
             * Provide at least two alternative architectural or implementation patterns for the \
             given project.\n\
             * For each solution, include a title, its trade-offs, a clear explanation, and \
             example code for key parts.\n\n\
             {json_only}\n\n\
             Project Files:\n\
             {formatted}",
            language_rule = language_rule,
            marker = file_marker::render("[filename]"),
            variables = VARIABLE_ENCODING,
            trace_rule = Self::trace_rule("the project"),
            json_only = JSON_ONLY,
            formatted = formatted,
        )
    }

    pub fn quick_run(content: &str, language: LanguageSelection) -> String {
        let language_rule = match language.language() {
            None => "Analyze the following code, auto-detecting its programming language.".to_string(),
            Some(lang) => format!(
                "First, verify that the following code is valid {name} code. If it is NOT, respond \
                 with a JSON object where the 'output' field is an error message explaining the \
                 language mismatch, and the 'timeComplexity' and 'spaceComplexity' fields are empty \
                 strings (\"\"). Do not try to execute it if the language is wrong. If it IS valid \
                 {name} code, analyze it as described below.",
                name = lang.display_name()
            ),
        };

        format!(
            "{language_rule}\n\n\
             If the code is valid for the analysis, provide the following:\n\
             1. Predict its final output (e.g., from console.log). If there are multiple outputs, \
             join them with newlines. If an error would occur during execution (like a syntax \
             error), the output should describe the error.\n\
             2. Determine its time complexity (Big O notation).\n\
             3. Determine its space complexity (Big O notation).\n\n\
             {json_only}\n\n\
             Code to analyze:\n\
             {block}",
            language_rule = language_rule,
            json_only = JSON_ONLY,
            block = Self::fenced(content, language),
        )
    }

    fn trace_rule(subject: &str) -> String {
        format!(
            "**Crucially**: If a trace is not possible or applicable for {}, you MUST return a \
             valid object containing an empty array for the `steps` field, like \
             `\"debuggerTrace\": {{ \"steps\": [] }}`. Do NOT return `null` or omit the \
             `debuggerTrace` field.",
            subject
        )
    }

    fn single_file_sections() -> &'static str {
        "3. **Performance Profile**:\n\
         * Provide a summary of performance characteristics.\n\
         * Identify bottlenecks, specifying the file path, line number, function name, and reason.\n\
         * Suggest concrete optimizations.\n\n\
         4. **Test Cases**:\n\
         * Generate standard and edge test cases with inputs, expected outputs, and descriptions.\n\n\
         5. **Alternative Solutions**:\n\
         * Provide at least two alternative implementations.\n\
         * For each, include a title, time/space complexity, explanation, and full code."
    }

    /// Source wrapped in a fenced block tagged with the declared language
    fn fenced(content: &str, language: LanguageSelection) -> String {
        let tag = language.language().map(|lang| lang.id()).unwrap_or("");
        format!("```{}\n{}\n```", tag, content)
    }
}
