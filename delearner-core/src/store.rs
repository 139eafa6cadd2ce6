//! In-memory file store
//!
//! Holds the named text buffers of a session, in upload order, plus the name of the
//! single active buffer. Buffers are reference counted so that a store derived from
//! another one (for example by a patch) shares every file it did not touch.

use crate::analysis::NO_FILES_MESSAGE;
use crate::error::{CoreError, Result};
use crate::language::{self, LanguageSelection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the file every new session starts with
pub const DEFAULT_FILE_NAME: &str = "fibonacci.js";

/// Content of the file every new session starts with
pub const DEFAULT_FILE_CONTENT: &str = "function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

// Analyze for n=4 for a shorter trace
console.log(fibonacci(4));";

/// Stem used when a file is renamed to follow a declared language
const RENAME_STEM: &str = "main";

/// A named text buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub name: String,
    pub content: String,
}

impl CodeFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }

    /// Number of lines, counting a trailing empty line after a final newline
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

/// Ordered collection of uniquely named buffers with one active buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStore {
    files: Vec<Arc<CodeFile>>,
    active: Option<String>,
}

impl FileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the default Fibonacci program, which is active
    pub fn seeded() -> Self {
        Self {
            files: vec![Arc::new(CodeFile::new(DEFAULT_FILE_NAME, DEFAULT_FILE_CONTENT))],
            active: Some(DEFAULT_FILE_NAME.to_string()),
        }
    }

    /// Build a store from files in upload order; the first one becomes active
    pub fn with_files(files: Vec<CodeFile>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            for file in &files {
                if !seen.insert(file.name.as_str()) {
                    return Err(CoreError::DuplicateFile { name: file.name.clone() });
                }
            }
        }

        let active = files.first().map(|f| f.name.clone());
        Ok(Self { files: files.into_iter().map(Arc::new).collect(), active })
    }

    /// Build a replacement store from an ingested `(name, content)` batch
    ///
    /// An empty batch is rejected rather than producing a store without files.
    pub fn from_batch<I, N, C>(batch: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let files: Vec<CodeFile> =
            batch.into_iter().map(|(name, content)| CodeFile::new(name, content)).collect();
        if files.is_empty() {
            return Err(CoreError::empty_input(NO_FILES_MESSAGE));
        }

        info!("Replacing file store with {} uploaded files", files.len());
        Self::with_files(files)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in upload order
    pub fn files(&self) -> impl Iterator<Item = &CodeFile> {
        self.files.iter().map(|f| f.as_ref())
    }

    /// Owned copies of every file, in upload order
    pub fn snapshot(&self) -> Vec<CodeFile> {
        self.files().cloned().collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CodeFile> {
        self.files.iter().find(|f| f.name == name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Shared handle of a file, used to check which buffers two stores have in common
    pub fn shared(&self, name: &str) -> Option<&Arc<CodeFile>> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_file(&self) -> Option<&CodeFile> {
        self.active.as_deref().and_then(|name| self.get(name))
    }

    /// Make an existing file the active one
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(CoreError::unknown_file(name));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Replace the content of a file in place
    pub fn update_content(&mut self, name: &str, content: impl Into<String>) -> Result<()> {
        let slot = self.slot_mut(name)?;
        Arc::make_mut(slot).content = content.into();
        Ok(())
    }

    /// A new store in which only `name` has different content
    pub fn with_content(&self, name: &str, content: impl Into<String>) -> Result<Self> {
        let mut next = self.clone();
        next.update_content(name, content)?;
        Ok(next)
    }

    /// Rename a file, keeping its position and its active status
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return if self.contains(from) { Ok(()) } else { Err(CoreError::unknown_file(from)) };
        }
        if self.contains(to) {
            return Err(CoreError::DuplicateFile { name: to.to_string() });
        }

        let slot = self.slot_mut(from)?;
        Arc::make_mut(slot).name = to.to_string();
        if self.active.as_deref() == Some(from) {
            self.active = Some(to.to_string());
        }
        Ok(())
    }

    /// First free name of the form `stem.ext`, `stem-1.ext`, `stem-2.ext`, ...
    ///
    /// `excluding` is ignored while scanning, so a file can keep the name it already has.
    pub fn unique_name(&self, stem: &str, extension: &str, excluding: Option<&str>) -> String {
        let taken = |candidate: &str| {
            self.files.iter().any(|f| f.name == candidate && Some(f.name.as_str()) != excluding)
        };

        let mut candidate = format!("{}.{}", stem, extension);
        let mut counter = 1;
        while taken(&candidate) {
            candidate = format!("{}-{}.{}", stem, counter, extension);
            counter += 1;
        }
        candidate
    }

    /// Rename `active` so that its extension follows a newly declared language
    ///
    /// Returns the updated store and the active file's new name. Auto-detect leaves the
    /// store untouched.
    pub fn rename_for_language(
        &self,
        active: &str,
        selection: LanguageSelection,
    ) -> Result<(Self, String)> {
        if !self.contains(active) {
            return Err(CoreError::unknown_file(active));
        }

        let Some(extension) = language::extension_for(selection) else {
            debug!("No extension for {}, keeping '{}'", selection, active);
            return Ok((self.clone(), active.to_string()));
        };

        let new_name = self.unique_name(RENAME_STEM, extension, Some(active));
        let mut next = self.clone();
        next.rename(active, &new_name)?;
        next.active = Some(new_name.clone());

        info!("Renamed '{}' to '{}' for language {}", active, new_name, selection);
        Ok((next, new_name))
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut Arc<CodeFile>> {
        self.files
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::unknown_file(name))
    }
}
