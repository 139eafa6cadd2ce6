//! Run command - predicted output and complexity of one file

use super::{CommandContext, read_source};
use crate::cli::{OutputFormat, render};
use anyhow::Result;
use delearner_core::quick_run_file;
use std::path::Path;

pub async fn execute(ctx: &CommandContext, path: &Path) -> Result<()> {
    let file = read_source(path).await?;
    let client = ctx.client()?;

    let result = quick_run_file(&client, &file, ctx.language, &ctx.model).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", render::json(&result)?),
        OutputFormat::Text => print!("{}", render::quick_run(&result)),
    }
    Ok(())
}
