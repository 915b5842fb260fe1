//! CLI binary for sitescout.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use sitescout::{ScrapeConfig, ScrapeReport, ScraperEngine, SearchTerm};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape any website for a batch of search terms, discovering the
/// site's search mechanism automatically.
#[derive(Parser)]
#[command(name = "sitescout", version, about)]
struct Cli {
    /// Target domain URL (homepage) to scrape.
    #[arg(short, long)]
    url: String,

    /// JSON file path or inline JSON array of search terms.
    #[arg(short, long)]
    search_terms: String,

    /// Output file path for results.
    #[arg(short, long, default_value = "scraped_results.json")]
    output: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Maximum number of results per search term.
    #[arg(long, default_value_t = 50)]
    max_results: usize,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Force the HTTP/1.1-only transport for every request.
    #[arg(long)]
    http1_only: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One pretty-printed JSON document.
    Json,
    /// One metadata line, then one compact record per line.
    Jsonl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default filter depends on -v; RUST_LOG overrides both.
    let default_filter = if cli.verbose {
        "sitescout=debug"
    } else {
        "sitescout=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "scraping failed");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let search_terms = load_search_terms(&cli.search_terms)?;
    info!(url = cli.url, terms = search_terms.len(), "starting scrape");

    let config = ScrapeConfig {
        timeout_seconds: cli.timeout,
        max_results: cli.max_results,
        http1_only: cli.http1_only,
        ..Default::default()
    };

    let engine = ScraperEngine::new(config)?;
    let report = engine.scrape(&cli.url, &search_terms).await?;

    save_report(&report, &cli.output, cli.format)?;
    info!(output = %cli.output.display(), "results saved");

    print_summary(&cli.url, &report, &cli.output);
    Ok(())
}

/// Load search terms from an inline JSON array or a file path.
fn load_search_terms(input: &str) -> anyhow::Result<Vec<SearchTerm>> {
    let json = if input.trim_start().starts_with('[') {
        input.to_string()
    } else {
        let path = Path::new(input);
        if !path.exists() {
            bail!("search terms file not found: {input}");
        }
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read search terms file {input}"))?
    };

    serde_json::from_str(&json).context("invalid search terms JSON")
}

/// Write the report in the chosen format.
fn save_report(report: &ScrapeReport, output: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let body = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Jsonl => {
            let mut lines = vec![serde_json::to_string(&report.metadata)?];
            for result in &report.results {
                lines.push(serde_json::to_string(result)?);
            }
            lines.join("\n") + "\n"
        }
    };
    std::fs::write(output, body)
        .with_context(|| format!("failed to write results to {}", output.display()))?;
    Ok(())
}

fn print_summary(url: &str, report: &ScrapeReport, output: &Path) {
    let strategy = report
        .metadata
        .search_strategy
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".into());

    println!("\n{}", "=".repeat(60));
    println!("SCRAPING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Target Domain: {url}");
    println!("Search Strategy: {strategy}");
    println!("Total Search Terms: {}", report.metadata.total_search_terms);
    println!("Total Results: {}", report.results.len());
    println!("Output File: {}", output.display());
    println!("{}", "=".repeat(60));
}
