//! Response schemas sent with every generation request
//!
//! Written in the backend's OpenAPI subset (upper-case type names). Every top-level key
//! is required so that inapplicable sections arrive as empty arrays, never absent.

use serde_json::{Value, json};

const SNIPPET_DESCRIPTION: &str = "A minimal, concise code snippet containing only the changed \
     line(s). It should NOT include the entire function or file, just the specific code to \
     replace the original line. This snippet must not have explanations, comments, or \
     markdown fences.";

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn described_string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn integer() -> Value {
    json!({ "type": "INTEGER" })
}

fn file_path(description: &str) -> Value {
    described_string(description)
}

fn test_case() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "input": string(),
            "expectedOutput": string(),
            "description": string(),
        },
        "required": ["input", "expectedOutput", "description"],
    })
}

fn review() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallExplanation": string(),
            "errors": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filePath": file_path("The path or name of the file where the error occurred."),
                        "lineNumber": integer(),
                        "errorDescription": string(),
                        "suggestedFix": described_string(SNIPPET_DESCRIPTION),
                        "fixExplanation": string(),
                    },
                    "required": ["filePath", "lineNumber", "errorDescription", "suggestedFix", "fixExplanation"],
                },
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filePath": file_path("The path or name of the file for the suggestion."),
                        "lineNumber": integer(),
                        "suggestion": described_string(SNIPPET_DESCRIPTION),
                        "explanation": string(),
                    },
                    "required": ["filePath", "lineNumber", "suggestion", "explanation"],
                },
            },
        },
        "required": ["overallExplanation", "errors", "suggestions"],
    })
}

fn debugger_trace() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filePath": file_path("The path of the file for this execution step."),
                        "lineNumber": integer(),
                        "state": {
                            "type": "OBJECT",
                            "properties": {
                                "execution": string(),
                                "variables": {
                                    "type": "ARRAY",
                                    "description": "Variables in scope. Each has a 'name' and a 'value' holding the JSON literal text of the variable's content.",
                                    "items": {
                                        "type": "OBJECT",
                                        "properties": {
                                            "name": described_string("The name of the variable."),
                                            "value": described_string(
                                                "The JSON literal text of the value (e.g., '4', '\"hello\"', '[1, 2]')."
                                            ),
                                        },
                                        "required": ["name", "value"],
                                    },
                                },
                                "callStack": { "type": "ARRAY", "items": string() },
                            },
                            "required": ["execution", "variables", "callStack"],
                        },
                    },
                    "required": ["filePath", "lineNumber", "state"],
                },
            },
        },
        "required": ["steps"],
    })
}

fn performance_profile() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": string(),
            "bottlenecks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filePath": file_path("The path or name of the file where the bottleneck occurs."),
                        "lineNumber": integer(),
                        "functionName": string(),
                        "calls": integer(),
                        "reason": string(),
                    },
                    "required": ["filePath", "lineNumber", "functionName", "calls", "reason"],
                },
            },
            "optimizations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": { "title": string(), "description": string() },
                    "required": ["title", "description"],
                },
            },
        },
        "required": ["summary", "bottlenecks", "optimizations"],
    })
}

fn test_cases() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "generated": { "type": "ARRAY", "items": test_case() },
            "edgeCases": { "type": "ARRAY", "items": test_case() },
        },
        "required": ["generated", "edgeCases"],
    })
}

fn alternative_solutions() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "solutions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": string(),
                        "complexity": {
                            "type": "OBJECT",
                            "properties": { "time": string(), "space": string() },
                            "required": ["time", "space"],
                        },
                        "explanation": string(),
                        "code": string(),
                    },
                    "required": ["title", "complexity", "explanation", "code"],
                },
            },
        },
        "required": ["solutions"],
    })
}

/// Schema of the five-section result used by single-file and project analysis
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "review": review(),
            "debuggerTrace": debugger_trace(),
            "performanceProfile": performance_profile(),
            "testCases": test_cases(),
            "alternativeSolutions": alternative_solutions(),
        },
        "required": ["review", "debuggerTrace", "performanceProfile", "testCases", "alternativeSolutions"],
    })
}

/// Schema of the quick-run result
pub fn quick_run_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "output": described_string(
                "The predicted output of the code, as if printed to the console. Join multiple \
                 outputs with newlines. If there is no output, return an empty string."
            ),
            "timeComplexity": string(),
            "spaceComplexity": string(),
        },
        "required": ["output", "timeComplexity", "spaceComplexity"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect()
    }

    #[test]
    fn test_analysis_schema_requires_every_section() {
        let schema = analysis_schema();
        assert_eq!(
            required(&schema),
            vec!["review", "debuggerTrace", "performanceProfile", "testCases", "alternativeSolutions"]
        );
        assert_eq!(schema["properties"]["debuggerTrace"]["properties"]["steps"]["type"], "ARRAY");
        assert_eq!(
            required(&schema["properties"]["review"]["properties"]["errors"]["items"])[0],
            "filePath"
        );
    }

    #[test]
    fn test_quick_run_schema_has_three_strings() {
        let schema = quick_run_schema();
        assert_eq!(required(&schema), vec!["output", "timeComplexity", "spaceComplexity"]);
        for key in ["output", "timeComplexity", "spaceComplexity"] {
            assert_eq!(schema["properties"][key]["type"], "STRING");
        }
        assert!(schema["properties"].get("review").is_none());
    }
}
