//! Folder ingestion
//!
//! Turns a directory on disk into a replacement [`FileStore`]. Files are named by their
//! path relative to the folder's parent, so `project/src/main.js` keeps the folder name
//! as its first component. Every file is read concurrently and the store is only built
//! once all reads succeeded.

use crate::error::{CoreError, Result};
use crate::store::FileStore;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().map(|name| name.starts_with('.')).unwrap_or(false)
}

/// Display name of a file relative to `base`, always with forward slashes
fn relative_name(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Regular, non-hidden files below `root`, sorted by path
fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(|e| CoreError::ingest(root.display().to_string(), e.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read every file below `root` into a new store; the first file becomes active
///
/// Fails as a whole when any single file cannot be read as text, and with
/// [`CoreError::EmptyInput`] when the folder holds no files.
pub async fn read_folder(root: &Path) -> Result<FileStore> {
    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|e| CoreError::ingest(root.display().to_string(), e.to_string()))?;
    let base = root.parent().unwrap_or(&root).to_path_buf();

    let paths = collect_files(&root)?;
    debug!("Reading {} files from {}", paths.len(), root.display());

    let reads = paths.iter().map(|path| {
        let name = relative_name(path, &base);
        async move {
            tokio::fs::read_to_string(path)
                .await
                .map(|content| (name, content))
                .map_err(|e| CoreError::ingest(path.display().to_string(), e.to_string()))
        }
    });
    let batch = try_join_all(reads).await?;

    info!("Ingested {} files from {}", batch.len(), root.display());
    FileStore::from_batch(batch)
}
