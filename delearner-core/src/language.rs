//! Language resolution from file names
//!
//! Maps file extensions to language identifiers and back, and decides when a declared
//! language conflicts with the language a file name implies.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of the auto-detect sentinel
pub const ALL_LANGUAGES_ID: &str = "all";

/// A concrete programming language the analysis understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    TypeScript,
    Java,
    CSharp,
    Go,
    Rust,
    Cpp,
}

impl Language {
    /// Every supported language, in catalogue order
    pub const ALL: [Language; 8] = [
        Language::JavaScript,
        Language::Python,
        Language::TypeScript,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Cpp,
    ];

    /// Stable identifier used in prompts and configuration
    pub fn id(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Cpp => "cpp",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::TypeScript => "TypeScript",
            Self::Java => "Java",
            Self::CSharp => "C#",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Cpp => "C++",
        }
    }

    /// Canonical extension (without the dot) for newly named files
    pub fn extension(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::TypeScript => "ts",
            Self::Java => "java",
            Self::CSharp => "cs",
            Self::Go => "go",
            Self::Rust => "rs",
            Self::Cpp => "cpp",
        }
    }

    /// Look a language up by its identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.id() == id)
    }

    /// Look a language up by a file extension (case-insensitive, without the dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "js" | "jsx" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "ts" | "tsx" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "cs" => Some(Self::CSharp),
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            "cpp" | "cxx" | "h" | "hpp" => Some(Self::Cpp),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// The language a user declared for analysis: a concrete language or auto-detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageSelection {
    #[default]
    All,
    Specific(Language),
}

impl LanguageSelection {
    pub fn id(&self) -> &'static str {
        match self {
            Self::All => ALL_LANGUAGES_ID,
            Self::Specific(lang) => lang.id(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "All Languages",
            Self::Specific(lang) => lang.display_name(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn language(&self) -> Option<Language> {
        match self {
            Self::All => None,
            Self::Specific(lang) => Some(*lang),
        }
    }

    /// The selection offered in the language picker, auto-detect first
    pub fn catalogue() -> Vec<LanguageSelection> {
        std::iter::once(Self::All).chain(Language::ALL.into_iter().map(Self::Specific)).collect()
    }
}

impl From<Language> for LanguageSelection {
    fn from(lang: Language) -> Self {
        Self::Specific(lang)
    }
}

impl fmt::Display for LanguageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for LanguageSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        if id == ALL_LANGUAGES_ID {
            return Ok(Self::All);
        }
        Language::from_id(&id).map(Self::Specific).ok_or_else(|| {
            let known: Vec<&str> = Self::catalogue().iter().map(|s| s.id()).collect();
            format!("unknown language '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

impl TryFrom<String> for LanguageSelection {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageSelection> for String {
    fn from(selection: LanguageSelection) -> Self {
        selection.id().to_string()
    }
}

/// Detect a file's language from its extension
///
/// The extension is whatever follows the last dot; names without a known extension
/// yield `None`.
pub fn detect(file_name: &str) -> Option<Language> {
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Language::from_extension(extension)
}

/// Extension used when a file is renamed to match a declared language
pub fn extension_for(selection: LanguageSelection) -> Option<&'static str> {
    selection.language().map(|lang| lang.extension())
}

/// Refuse to proceed when the declared language contradicts the file name
///
/// Auto-detect never blocks, and neither does a file whose language cannot be detected.
pub fn check_mismatch(selected: LanguageSelection, file_name: &str) -> Result<()> {
    let Some(selected) = selected.language() else {
        return Ok(());
    };

    match detect(file_name) {
        Some(detected) if detected != selected => {
            Err(CoreError::LanguageMismatch { selected, detected })
        }
        _ => Ok(()),
    }
}
