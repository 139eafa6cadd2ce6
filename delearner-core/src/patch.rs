//! Patch engine
//!
//! Applies a line-targeted code snippet from an analysis finding to a file store. The
//! target line is replaced by the (possibly multi-line) snippet, re-indented with the
//! target line's leading whitespace. Nothing else in the file moves except the lines
//! after the target, which shift by the number of extra snippet lines.

use crate::store::FileStore;
use regex_utils::fence;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Failure to address a patch target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("Cannot apply patch: file '{file}' does not exist")]
    TargetNotFound { file: String },

    #[error("Cannot apply patch: line {line} is outside '{file}' (1..={line_count})")]
    LineOutOfRange { file: String, line: usize, line_count: usize },
}

/// Where and what to patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchTarget {
    pub file_name: String,
    /// 1-based line to replace
    pub line_number: usize,
    /// Snippet as authored by the model, possibly wrapped in a fenced block
    pub snippet: String,
}

impl PatchTarget {
    pub fn new(file_name: impl Into<String>, line_number: usize, snippet: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), line_number, snippet: snippet.into() }
    }
}

/// Strip an optional fenced wrapper from a snippet and trim it
///
/// A bare snippet and a fenced snippet with the same body sanitize to the same text.
pub fn sanitize_snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    match fence::extract_inner(trimmed) {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Leading whitespace run of a line
pub fn indentation_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Replace line `line_number` of `content` with the re-indented, sanitized snippet
///
/// On failure the error carries the content's line count.
pub fn patch_content(
    content: &str,
    line_number: usize,
    snippet: &str,
) -> std::result::Result<String, usize> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if line_number == 0 || line_number > lines.len() {
        return Err(lines.len());
    }

    let index = line_number - 1;
    let original = lines[index];
    // keep CRLF files consistent
    let (body, line_end) = match original.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (original, ""),
    };
    let indent = indentation_of(body);

    let sanitized = sanitize_snippet(snippet);
    let block = sanitized
        .split('\n')
        .map(|line| format!("{}{}{}", indent, line.strip_suffix('\r').unwrap_or(line), line_end))
        .collect::<Vec<_>>()
        .join("\n");

    lines[index] = block.as_str();
    Ok(lines.join("\n"))
}

/// Apply a patch, returning a new store in which only the target file changed
pub fn apply_patch(store: &FileStore, target: &PatchTarget) -> Result<FileStore, PatchError> {
    let file = store
        .get(&target.file_name)
        .ok_or_else(|| PatchError::TargetNotFound { file: target.file_name.clone() })?;

    let patched = patch_content(&file.content, target.line_number, &target.snippet).map_err(
        |line_count| PatchError::LineOutOfRange {
            file: target.file_name.clone(),
            line: target.line_number,
            line_count,
        },
    )?;

    debug!("Patched line {} of '{}'", target.line_number, target.file_name);
    store
        .with_content(&target.file_name, patched)
        .map_err(|_| PatchError::TargetNotFound { file: target.file_name.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::store::CodeFile;
    use std::sync::Arc;

    const FIVE_LINES: &str = "fn main() {\n    let a = 1;\n    let b = 2;\n    println!(\"{}\", a + b);\n}";

    fn store() -> FileStore {
        FileStore::with_files(vec![
            CodeFile::new("main.rs", FIVE_LINES),
            CodeFile::new("other.rs", "const X: u8 = 1;"),
        ])
        .unwrap()
    }

    #[test]
    fn test_sanitize_bare_snippet() {
        assert_eq!(sanitize_snippet("  let x = 1;  \n"), "let x = 1;");
    }

    #[test]
    fn test_sanitize_is_fence_agnostic() {
        let samples = [
            "return n;",
            "if (n <= 1) {\n  return n;\n}",
            "  indented first line\nsecond",
            "",
            "x = [1, 2, 3]",
        ];
        let mut tags = vec!["", "js", "python", "c++", "c#", "cs", "objective-c"];
        tags.extend(Language::ALL.iter().map(|lang| lang.id()));
        for sample in samples {
            for tag in &tags {
                let fenced = format!("```{}\n{}\n```", tag, sample);
                assert_eq!(sanitize_snippet(sample), sanitize_snippet(&fenced), "tag {:?}", tag);
            }
        }
    }

    #[test]
    fn test_indentation_is_preserved() {
        for snippet in ["let a = 10;", "      let a = 10;", "```rust\n\tlet a = 10;\n```"] {
            let patched = patch_content(FIVE_LINES, 2, snippet).unwrap();
            let line = patched.split('\n').nth(1).unwrap();
            assert_eq!(line, "    let a = 10;");
        }
    }

    #[test]
    fn test_multi_line_snippet_shifts_following_lines() {
        let snippet = "```rust\nlet b = 2;\nlet c = 3;\nlet d = 4;\n```";
        let patched = patch_content(FIVE_LINES, 3, snippet).unwrap();

        let original: Vec<&str> = FIVE_LINES.split('\n').collect();
        let lines: Vec<&str> = patched.split('\n').collect();
        let (n, l, m) = (original.len(), 3, 3);

        assert_eq!(lines.len(), n - 1 + m);
        assert_eq!(&lines[..l - 1], &original[..l - 1]);
        assert_eq!(&lines[l - 1..l - 1 + m], &["    let b = 2;", "    let c = 3;", "    let d = 4;"]);
        assert_eq!(&lines[l - 1 + m..], &original[l..]);
    }

    #[test]
    fn test_nested_indentation_inside_snippet_kept() {
        let patched = patch_content("  x();", 1, "if y {\n    z();\n}").unwrap();
        assert_eq!(patched, "  if y {\n      z();\n  }");
    }

    #[test]
    fn test_crlf_line_endings_kept() {
        let patched = patch_content("a\r\n  b\r\nc", 2, "d\ne").unwrap();
        assert_eq!(patched, "a\r\n  d\r\n  e\r\nc");
    }

    #[test]
    fn test_line_out_of_range() {
        assert_eq!(patch_content(FIVE_LINES, 0, "x"), Err(5));
        assert_eq!(patch_content(FIVE_LINES, 6, "x"), Err(5));
        assert!(patch_content(FIVE_LINES, 5, "x").is_ok());
    }

    #[test]
    fn test_apply_patch_touches_only_target() {
        let before = store();
        let after = apply_patch(&before, &PatchTarget::new("main.rs", 2, "let a = 5;")).unwrap();

        assert!(after.get("main.rs").unwrap().content.contains("    let a = 5;"));
        assert_eq!(before.get("main.rs").unwrap().content, FIVE_LINES);
        assert!(Arc::ptr_eq(before.shared("other.rs").unwrap(), after.shared("other.rs").unwrap()));
        assert_eq!(after.active_name(), before.active_name());
    }

    #[test]
    fn test_apply_patch_missing_file() {
        let err = apply_patch(&store(), &PatchTarget::new("nope.rs", 1, "x")).unwrap_err();
        assert_eq!(err, PatchError::TargetNotFound { file: "nope.rs".to_string() });
    }

    #[test]
    fn test_apply_patch_bad_line_leaves_store_alone() {
        let before = store();
        let err = apply_patch(&before, &PatchTarget::new("other.rs", 2, "x")).unwrap_err();
        assert_eq!(
            err,
            PatchError::LineOutOfRange { file: "other.rs".to_string(), line: 2, line_count: 1 }
        );
        assert_eq!(before, store());
    }
}
