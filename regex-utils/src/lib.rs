//! Regex utilities for delearner
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Markdown code fence handling for model-authored snippets
pub mod fence {
    use super::*;

    /// A whole text wrapped in a single fenced block: an optional language tag after the
    /// opening delimiter, then the body, then a closing delimiter at the very end.
    pub static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)^```[\w+#-]*\s*\n?(.+?)\n?```$").expect("Invalid regex pattern")
    });

    /// Return the body of a fully fenced text, or `None` when the text is not wrapped.
    ///
    /// The caller is expected to trim the input first; leading or trailing text outside
    /// the fences means the text is not considered wrapped.
    pub fn extract_inner(text: &str) -> Option<&str> {
        FENCED_BLOCK.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }
}

/// File boundary markers used when several sources share one prompt
pub mod file_marker {
    /// Render the boundary line that precedes a file's source block
    pub fn render(name: &str) -> String {
        format!("--- FILE: {} ---", name)
    }
}
