use anyhow::{Context, Result};
use clap::Parser;
use delearner_core::DelearnerConfig;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::commands::{self, CommandContext};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // stdout carries results, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = match &cli.config {
        Some(path) => DelearnerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DelearnerConfig::default(),
    };
    debug!("Using config: {:?}", config);

    let ctx = CommandContext::new(config, cli.language, cli.model, cli.format);

    match cli.command {
        Commands::Languages => commands::languages::execute(&ctx)?,
        Commands::Analyze(args) => {
            info!("Analyze command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::analyze::execute(&ctx, &args.file))?;
        }
        Commands::Project(args) => {
            info!("Project command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::project::execute(&ctx, &args.dir))?;
        }
        Commands::Run(args) => {
            info!("Run command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::run::execute(&ctx, &args.file))?;
        }
        Commands::Patch(args) => {
            info!("Patch command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::patch::execute(&ctx, &args))?;
        }
    }

    Ok(())
}
