//! Patch command - replace one line of a file and print the patched text
//!
//! The file on disk is left untouched.

use super::{CommandContext, read_source};
use crate::cli::OutputFormat;
use crate::cli::app::PatchArgs;
use crate::cli::render;
use anyhow::{Context, Result};
use delearner_core::{FileStore, PatchTarget, apply_patch};
use serde_json::json;

async fn snippet(args: &PatchArgs) -> Result<String> {
    match (&args.snippet, &args.snippet_file) {
        (Some(snippet), _) => Ok(snippet.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read snippet from {}", path.display())),
        (None, None) => anyhow::bail!("either --snippet or --snippet-file is required"),
    }
}

pub async fn execute(ctx: &CommandContext, args: &PatchArgs) -> Result<()> {
    let file = read_source(&args.file).await?;
    let snippet = snippet(args).await?;
    let name = file.name.clone();

    let store = FileStore::with_files(vec![file])?;
    let patched = apply_patch(&store, &PatchTarget::new(name.clone(), args.line, snippet))?;
    let content = patched.get(&name).map(|f| f.content.as_str()).unwrap_or_default();

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            render::json(&json!({ "file": name, "line": args.line, "content": content }))?
        ),
        OutputFormat::Text => println!("{}", content),
    }
    Ok(())
}
