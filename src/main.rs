//! a11y-lint CLI - check a URL or HTML snippet for common accessibility issues.

use a11y_lint::{EngineConfig, InputMode, LoaderOptions, OutputFormat, Session};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Check web pages or HTML for alt text, font size and color contrast issues
#[derive(Parser)]
#[command(name = "a11y-lint")]
#[command(version, about, long_about = None)]
struct Cli {
    /// URL or HTML to analyze (auto-detected); `-` reads from stdin
    #[arg(conflicts_with_all = ["url", "html", "file"])]
    input: Option<String>,

    /// Fetch and analyze this URL
    #[arg(long, conflicts_with_all = ["html", "file"])]
    url: Option<String>,

    /// Analyze this literal HTML
    #[arg(long, conflicts_with = "file")]
    html: Option<String>,

    /// Analyze HTML read from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    format: FormatArg,

    /// JSON file overriding check thresholds and term lists
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable report
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("a11y_lint=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("a11y_lint=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn resolve_input(cli: &Cli) -> anyhow::Result<(InputMode, String)> {
    if let Some(url) = &cli.url {
        return Ok((InputMode::Url, url.clone()));
    }
    if let Some(html) = &cli.html {
        return Ok((InputMode::Html, html.clone()));
    }
    if let Some(path) = &cli.file {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok((InputMode::Html, html));
    }
    match cli.input.as_deref() {
        Some("-") | None => Ok((InputMode::Auto, read_stdin()?)),
        Some(text) => Ok((InputMode::Auto, text.to_string())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut loader_options = LoaderOptions::default();
    if let Some(timeout) = cli.timeout {
        loader_options.timeout_secs = timeout;
    }

    let (mode, text) = resolve_input(&cli)?;
    let session = Session::new(config, loader_options);
    let submission = session.submit(mode, &text);

    eprintln!("{}", submission.status);
    let rendered = submission.render(cli.format.into())?;
    write_output(&rendered, cli.output.as_deref())?;

    if submission.is_error() || submission.report.has_high_severity() {
        std::process::exit(1);
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content.trim_end());
        }
    }
    Ok(())
}
