//! CLI command definitions for Wordlens.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wordlens_core::ChartKind;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(name = "wordlens", author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, global = true, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WORDLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI
    Serve(ServeArgs),

    /// Fetch one article and print its most frequent words
    Analyze(AnalyzeArgs),
}

/// Web server arguments.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind (overrides the configuration file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides the configuration file)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// One-shot analysis arguments.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Article URL (http or https)
    pub url: String,

    /// Chart kind: word-cloud, bar, line, pie, scatter
    #[arg(short, long, default_value = "word-cloud")]
    pub kind: ChartKind,

    /// Minimum word frequency (defaults to 5, clamped to the largest count)
    #[arg(short, long)]
    pub min_freq: Option<u64>,

    /// Write the standalone chart page to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output format for `analyze`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON format
    Json,
}
