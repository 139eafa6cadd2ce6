//! Analyze command - full analysis of a single file

use super::{CommandContext, read_source};
use crate::cli::{OutputFormat, render};
use anyhow::Result;
use delearner_core::{Tab, analyze_file};
use std::path::Path;
use tracing::info;

pub async fn execute(ctx: &CommandContext, path: &Path) -> Result<()> {
    let file = read_source(path).await?;
    let client = ctx.client()?;

    info!("Analyzing {} as {}", file.name, ctx.language);
    let result = analyze_file(&client, &file, ctx.language, &ctx.model).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", render::json(&result)?),
        OutputFormat::Text => {
            let title = format!("Analysis for: {}", file.name);
            print!("{}", render::analysis(&title, &result, &Tab::enabled_for(&result)));
        }
    }
    Ok(())
}
