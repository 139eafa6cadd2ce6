//! Languages command - supported languages and models

use super::CommandContext;
use crate::cli::{OutputFormat, render};
use anyhow::Result;
use delearner_core::LanguageSelection;
use delearner_core::llm::SUPPORTED_MODELS;
use serde_json::json;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    match ctx.format {
        OutputFormat::Text => print!("{}", render::languages()),
        OutputFormat::Json => {
            let languages: Vec<_> = LanguageSelection::catalogue()
                .into_iter()
                .map(|s| json!({ "id": s.id(), "name": s.display_name() }))
                .collect();
            let models: Vec<_> =
                SUPPORTED_MODELS.iter().map(|m| json!({ "id": m.id, "name": m.name })).collect();
            println!("{}", render::json(&json!({ "languages": languages, "models": models }))?);
        }
    }
    Ok(())
}
