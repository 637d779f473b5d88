use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pagecard_client::config::{DEFAULT_TIMEOUT_SECS, parse_timeout_secs};
use pagecard_client::{FetchConfig, ReqwestFetcher};
use pagecard_core::{ExtractionPipeline, ScrapeEnvelope, ScrapeService};

#[derive(Parser)]
#[command(name = "pagecard", version, about = "Contact details from public social-network pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page's About section and extract its contact details
    Scrape {
        /// Page URL; "/about" is appended when missing
        #[arg(short, long)]
        url: String,

        /// User-Agent header (a random browser UA if not provided)
        #[arg(long, env = "PAGECARD_USER_AGENT")]
        user_agent: Option<String>,

        /// Request timeout in seconds
        #[arg(
            long,
            env = "PAGECARD_TIMEOUT_SECS",
            default_value_t = DEFAULT_TIMEOUT_SECS,
            value_parser = parse_timeout
        )]
        timeout_secs: u64,
    },

    /// Extract contact details from a saved HTML page, without network access
    Extract {
        /// Path to the saved HTML file
        #[arg(short, long)]
        file: PathBuf,

        /// URL the page was saved from
        #[arg(short, long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pagecard=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let envelope = match cli.command {
        Commands::Scrape {
            url,
            user_agent,
            timeout_secs,
        } => cmd_scrape(&url, user_agent, timeout_secs).await?,
        Commands::Extract { file, url } => cmd_extract(&file, &url)?,
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if !envelope.success {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_timeout(raw: &str) -> Result<u64, String> {
    parse_timeout_secs(raw).map_err(|e| e.to_string())
}

async fn cmd_scrape(
    url: &str,
    user_agent: Option<String>,
    timeout_secs: u64,
) -> Result<ScrapeEnvelope> {
    let mut config = FetchConfig::default().with_timeout(Duration::from_secs(timeout_secs));
    if let Some(ua) = user_agent {
        config = config.with_user_agent(ua);
    }

    // The user controls the machine, so private addresses are fair game.
    let fetcher = ReqwestFetcher::new(config)
        .context("Failed to build HTTP client")?
        .allow_private_urls();

    Ok(ScrapeService::new(fetcher).scrape_envelope(url).await)
}

fn cmd_extract(file: &Path, url: &str) -> Result<ScrapeEnvelope> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;

    tracing::info!("Extracting {} bytes of HTML from {}", html.len(), file.display());
    let record = ExtractionPipeline::default().extract_html(&html, url);
    Ok(ScrapeEnvelope::ok(record))
}
