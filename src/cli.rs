//! Command-line interface definitions.
//!
//! Everything except the URLs can also come from environment variables, so a
//! wrapper script can fix the output directory or pool size once.

use crate::batch::DEFAULT_WORKERS;
use crate::fetcher::DEFAULT_TIMEOUT;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape articles from URLs and save them as Word documents.
///
/// # Examples
///
/// ```sh
/// # Two articles into ./scraped_articles
/// article_scraper https://example.com/a https://example.com/b
///
/// # Custom directory, ten workers, JSON manifest
/// article_scraper -o ./docs -w 10 --manifest ./docs/run.json https://example.com/a
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URLs to scrape
    #[arg(required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Output directory for scraped documents
    #[arg(short, long, env = "ARTICLE_SCRAPER_OUTPUT", default_value = "scraped_articles")]
    pub output: PathBuf,

    /// Number of URLs processed concurrently
    #[arg(short, long, env = "ARTICLE_SCRAPER_WORKERS", default_value_t = DEFAULT_WORKERS,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,

    /// Timeout in seconds for each HTTP request, page or image
    #[arg(short, long = "timeout-secs", env = "ARTICLE_SCRAPER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs(),
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Also write a JSON manifest of all scraped articles to this path
    #[arg(long, env = "ARTICLE_SCRAPER_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["article_scraper", "https://example.com/a"]);

        assert_eq!(cli.urls, vec!["https://example.com/a"]);
        assert_eq!(cli.output, PathBuf::from("scraped_articles"));
        assert_eq!(cli.workers, 5);
        assert_eq!(cli.timeout(), Duration::from_secs(10));
        assert!(cli.manifest.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "article_scraper",
            "-o",
            "/tmp/docs",
            "-w",
            "8",
            "-t",
            "3",
            "https://example.com/a",
            "https://example.com/b",
        ]);

        assert_eq!(cli.output, PathBuf::from("/tmp/docs"));
        assert_eq!(cli.workers, 8);
        assert_eq!(cli.timeout_secs, 3);
        assert_eq!(cli.urls.len(), 2);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "article_scraper",
            "--output",
            "out",
            "--manifest",
            "out/run.json",
            "https://example.com/a",
        ]);

        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.manifest, Some(PathBuf::from("out/run.json")));
    }

    #[test]
    fn test_cli_requires_a_url() {
        assert!(Cli::try_parse_from(["article_scraper"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_workers() {
        assert!(Cli::try_parse_from(["article_scraper", "-w", "0", "https://example.com/a"]).is_err());
    }
}
