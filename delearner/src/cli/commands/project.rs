//! Project command - analyze every file of a folder together

use super::CommandContext;
use crate::cli::{OutputFormat, render};
use anyhow::{Context, Result};
use delearner_core::ingest::read_folder;
use delearner_core::session::PROJECT_TITLE;
use delearner_core::{Tab, analyze_project};
use std::path::Path;
use tracing::info;

pub async fn execute(ctx: &CommandContext, dir: &Path) -> Result<()> {
    let store = read_folder(dir)
        .await
        .with_context(|| format!("failed to load project {}", dir.display()))?;
    info!("Loaded {} files: {}", store.len(), store.names().join(", "));

    let client = ctx.client()?;
    let result = analyze_project(&client, &store.snapshot(), ctx.language, &ctx.model).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", render::json(&result)?),
        OutputFormat::Text => {
            print!("{}", render::analysis(PROJECT_TITLE, &result, &Tab::enabled_for(&result)))
        }
    }
    Ok(())
}
