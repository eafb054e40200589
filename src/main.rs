//! # Article Scraper
//!
//! Fetches a list of article URLs concurrently, extracts their title, body,
//! date, byline, section, keywords and lead image, and saves each article as
//! a Word document named after its title.
//!
//! ## Usage
//!
//! ```sh
//! article_scraper -o ./scraped_articles https://example.com/a https://example.com/b
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one HTTP GET per URL with a fixed timeout
//! 2. **Extraction**: a table of selector rules with textual fallbacks
//! 3. **Writing**: title → slug → `{output}/{slug}.docx`, lead image embedded
//! 4. **Batching**: a fixed pool of concurrent tasks, results drained in
//!    completion order
//!
//! Per-URL status lines go to stdout; diagnostics go to stderr through
//! `tracing` (filter with `RUST_LOG`).

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod batch;
mod cli;
mod error;
mod extractor;
mod fetcher;
mod models;
mod outputs;
mod sanitize;
mod utils;

use batch::scrape_multiple_urls;
use cli::Cli;
use fetcher::Fetcher;
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    info!(
        urls = args.urls.len(),
        workers = args.workers,
        timeout_secs = args.timeout_secs,
        output = %args.output.display(),
        "article_scraper starting up"
    );

    // Documents create their own directory; this only surfaces a bad path early.
    if let Err(e) = ensure_writable_dir(&args.output).await {
        warn!(
            path = %args.output.display(),
            error = %e,
            "Output directory is not writable; every save will fail"
        );
    }

    let fetcher = Arc::new(Fetcher::new(args.timeout())?);

    let mut stdout = std::io::stdout().lock();
    let report = scrape_multiple_urls(
        fetcher,
        &args.urls,
        &args.output,
        usize::from(args.workers),
        &mut stdout,
    )
    .await?;
    drop(stdout);

    let succeeded = report.articles.len();
    println!("\nScraped {succeeded} articles successfully.");

    if let Some(path) = &args.manifest {
        let manifest = json::build_manifest(&args.output, report.articles);
        if let Err(e) = json::write_manifest(&manifest, path).await {
            error!(path = %path.display(), error = %e, "Failed to write manifest");
            eprintln!("Failed to write manifest: {e}");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        succeeded,
        failed = report.failed,
        "Execution complete"
    );

    Ok(())
}
