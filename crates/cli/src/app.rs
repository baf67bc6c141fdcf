//! CLI application entry point and configuration.
//!
//! Loads [`WordlensConfig`], installs logging, and dispatches to the `serve`
//! and `analyze` commands. Both commands run on a Tokio runtime built here.

use crate::commands::{AnalyzeArgs, Cli, Commands, OutputFormat, ServeArgs};
use crate::error::{CliError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;
use wordlens_analysis::chart::ChartRenderer;
use wordlens_analysis::pipeline::Analyzer;
use wordlens_analysis::rank::{rank, ThresholdBounds};
use wordlens_core::constants::DEFAULT_MIN_FREQ;
use wordlens_core::{ChartKind, RankedWords, TokenFrequencyMap, WordlensConfig};

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Effective configuration.
    pub config: WordlensConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Create an application instance from already parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Load the file named by `--config`; defaults when none is given.
    fn load_config(cli: &Cli) -> Result<WordlensConfig> {
        match &cli.config {
            Some(path) if path.exists() => Ok(WordlensConfig::load(path)?),
            Some(path) => Err(CliError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            ))),
            None => Ok(WordlensConfig::default()),
        }
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        match &self.cli.command {
            Commands::Serve(args) => runtime.block_on(self.handle_serve(args)),
            Commands::Analyze(args) => runtime.block_on(self.handle_analyze(args)),
        }
    }

    fn setup_logging(&self) {
        let level = self.config.logging.level.raised(self.cli.verbose);

        // Logs go to stderr so `analyze` output stays pipeable.
        tracing_subscriber::fmt()
            .with_max_level(level.as_tracing())
            .with_target(self.config.logging.with_target)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    }

    async fn handle_serve(&self, args: &ServeArgs) -> Result<()> {
        let config = serve_config(&self.config, args);
        info!("Starting Wordlens on http://{}:{}", config.http.host, config.http.port);
        wordlens_web::start_server(config).await?;
        Ok(())
    }

    async fn handle_analyze(&self, args: &AnalyzeArgs) -> Result<()> {
        let renderer = ChartRenderer::new(self.config.chart.clone());
        let report = analyze(&Analyzer::new(), &renderer, args).await?;

        let out = match args.format {
            OutputFormat::Text => format_text(&report),
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Argument(format!("cannot encode report: {}", e)))?,
        };
        println!("{}", out);
        Ok(())
    }
}

/// Apply `serve` overrides to the loaded configuration.
pub fn serve_config(base: &WordlensConfig, args: &ServeArgs) -> WordlensConfig {
    let mut config = base.clone();
    if let Some(host) = args.host.as_deref() {
        config.http.host = host.trim().to_string();
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    config
}

/// Result of one `analyze` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Analysed URL.
    pub url: String,
    /// Chart kind requested.
    pub kind: ChartKind,
    /// Threshold applied.
    pub min_freq: u64,
    /// Distinct countable tokens on the page.
    pub distinct_tokens: usize,
    /// Countable tokens on the page.
    pub total_tokens: u64,
    /// Top words at or above `min_freq`.
    pub words: RankedWords,
    /// Where the chart page was written, if anywhere.
    pub chart_path: Option<PathBuf>,
}

/// Fetch, count and rank `args.url`, writing the chart page to `args.output`.
///
/// No page is written when nothing reaches the threshold.
pub async fn analyze(
    analyzer: &Analyzer,
    renderer: &ChartRenderer,
    args: &AnalyzeArgs,
) -> Result<AnalysisReport> {
    let url = args.url.trim();
    if url.is_empty() {
        return Err(CliError::Argument("URL must not be empty".to_string()));
    }

    let counts = analyzer.fetch_and_count(url).await?;
    let min_freq = effective_min_freq(&counts, args.min_freq);
    let words = rank(&counts, min_freq);

    let chart_path = match &args.output {
        Some(path) if !words.is_empty() => {
            fs::write(path, renderer.render_page(args.kind, &words))?;
            info!(path = %path.display(), kind = %args.kind, "chart page written");
            Some(path.clone())
        }
        Some(path) => {
            warn!(path = %path.display(), min_freq, "no words reach the threshold, chart not written");
            None
        }
        None => None,
    };

    Ok(AnalysisReport {
        url: url.to_string(),
        kind: args.kind,
        min_freq,
        distinct_tokens: counts.len(),
        total_tokens: counts.total_tokens(),
        words,
        chart_path,
    })
}

/// Threshold for a one-shot run: the requested value (or the initial slider
/// value) raised to at least 1.
fn effective_min_freq(counts: &TokenFrequencyMap, requested: Option<u64>) -> u64 {
    let initial = ThresholdBounds::for_map(counts)
        .map(|b| b.initial)
        .unwrap_or(DEFAULT_MIN_FREQ);
    requested.unwrap_or(initial).max(1)
}

/// Plain-text rendering of a report.
pub fn format_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "URL: {}", report.url);
    let _ = writeln!(
        out,
        "Tokens: {} distinct, {} total",
        report.distinct_tokens, report.total_tokens
    );
    let _ = writeln!(
        out,
        "Chart: {} ({}), min frequency {}",
        report.kind.label(),
        report.kind,
        report.min_freq
    );

    if report.words.is_empty() {
        out.push_str("No words reach the minimum frequency.");
        return out;
    }

    // Pad by terminal columns: CJK characters are two wide.
    let width = report
        .words
        .iter()
        .map(|w| w.word.width())
        .max()
        .unwrap_or(0);
    for (i, w) in report.words.iter().enumerate() {
        let pad = width - w.word.width();
        let _ = writeln!(out, "{:>3}. {}{}  {}", i + 1, w.word, " ".repeat(pad), w.count);
    }
    if let Some(path) = &report.chart_path {
        let _ = write!(out, "Chart written to {}", path.display());
    }
    out.trim_end().to_string()
}

/// Parse arguments from the process and run.
pub fn run() -> Result<()> {
    let app = App::new()?;
    app.run()
}
