use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use apify_client::ApifyClient;
use clap::Parser;
use email_discovery::{DeepSearchFetcher, RecordResolver};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use creator_scout::{
    ActorInput, ApifyDatasetSink, ApifyScrapers, Config, JsonlFileSink, OutputTarget, Pipeline,
    PipelineMode, ResultSink, TracingObserver,
};

/// Find contact emails for creators posting under a hashtag.
#[derive(Debug, Parser)]
#[command(name = "creator-scout", version)]
struct Cli {
    /// Hashtag to search (overrides SEARCH_TERM and the input file).
    #[arg(long)]
    search_term: Option<String>,

    /// Maximum number of posts to request from the search scraper.
    #[arg(long)]
    max_posts: Option<u32>,

    /// `posts` resolves captions; `profiles` looks up each creator's bio.
    #[arg(long)]
    mode: Option<PipelineMode>,

    /// Write results as JSON lines to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Actor input JSON (`hashtag`, `max_posts`, `mode`).
    #[arg(long, env = "APIFY_INPUT_FILE")]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config.log_redacted();

    info!("Starting creator email deep search...");

    let client = Arc::new(ApifyClient::new(config.apify_token.clone()));
    let scrapers = Arc::new(ApifyScrapers::new(client.clone()));
    let fetcher = DeepSearchFetcher::with_timeout(config.deep_search_timeout)
        .context("Failed to build deep search HTTP client")?;

    let sink: Arc<dyn ResultSink> = match &config.output {
        OutputTarget::JsonLines(path) => {
            info!(path = %path.display(), "Writing results to file");
            Arc::new(JsonlFileSink::new(path.clone()))
        }
        OutputTarget::ApifyDataset(dataset_id) => {
            info!(dataset_id = %dataset_id, "Pushing results to Apify dataset");
            Arc::new(ApifyDatasetSink::new(client.clone(), dataset_id.clone()))
        }
    };

    let pipeline = Pipeline::new(
        scrapers.clone(),
        scrapers,
        RecordResolver::new(Arc::new(fetcher)),
        sink,
        Arc::new(TracingObserver),
        config.run_settings(),
    );

    match pipeline.run().await {
        Ok(summary) => {
            info!(
                processed = summary.processed,
                found = summary.found,
                "Scanned {} creators, found emails for {}",
                summary.processed,
                summary.found
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run aborted");
            Err(e.into())
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("creator_scout=info".parse()?)
        .add_directive("email_discovery=info".parse()?)
        .add_directive("apify_client=info".parse()?);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

/// Environment, then actor input file, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(path) = &cli.input {
        config.apply_input(ActorInput::from_file(path)?);
    }
    if let Some(term) = &cli.search_term {
        config.search_term = term.clone();
    }
    if let Some(max) = cli.max_posts {
        config.max_posts = max;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(path) = &cli.output {
        config.output = OutputTarget::JsonLines(path.clone());
    }

    Ok(config)
}
