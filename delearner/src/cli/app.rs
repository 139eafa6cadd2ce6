use clap::{Args, Parser, Subcommand, ValueEnum};
use delearner_core::LanguageSelection;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "delearner",
    version,
    about = "DeLearner - AI code review, tracing and patching from the command line",
    long_about = "DeLearner sends source files to a generation backend for review, debugger \
                  traces, performance profiles, test cases and alternative solutions, and applies \
                  line-targeted fixes locally. Files on disk are never modified."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Declared language, or "all" to auto-detect
    #[arg(short, long, global = true, default_value = "all")]
    pub language: LanguageSelection,

    /// Model identifier (defaults to the configured model)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one file
    #[command(about = "Review, trace, profile and test a single file")]
    Analyze(FileArgs),

    /// Analyze a folder as one project
    #[command(about = "Analyze every file of a folder together")]
    Project(ProjectArgs),

    /// Predict output and complexity
    #[command(about = "Predict a file's output and its time and space complexity")]
    Run(FileArgs),

    /// Apply a snippet to one line
    #[command(about = "Replace one line of a file with a snippet and print the result")]
    Patch(PatchArgs),

    /// List supported languages and models
    #[command(about = "List supported languages and models")]
    Languages,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// Source file
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Folder to analyze
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Source file
    pub file: PathBuf,

    /// 1-based line to replace
    #[arg(long)]
    pub line: usize,

    /// Replacement snippet, optionally fenced
    #[arg(long, conflicts_with = "snippet_file", required_unless_present = "snippet_file")]
    pub snippet: Option<String>,

    /// Read the replacement snippet from a file
    #[arg(long)]
    pub snippet_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use delearner_core::Language;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "delearner", "analyze", "app.py", "--language", "Python", "-vv", "--format", "json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.language, LanguageSelection::Specific(Language::Python));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Analyze(FileArgs { ref file }) if file.ends_with("app.py")));
    }

    #[test]
    fn test_patch_requires_a_snippet() {
        assert!(Cli::try_parse_from(["delearner", "patch", "a.js", "--line", "2"]).is_err());
        assert!(
            Cli::try_parse_from([
                "delearner", "patch", "a.js", "--line", "2", "--snippet", "x", "--snippet-file", "s"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from(["delearner", "patch", "a.js", "--line", "2", "--snippet", "x"])
            .unwrap();
        assert_eq!(cli.language, LanguageSelection::All);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["delearner", "--language", "cobol", "languages"]).is_err());
    }
}
