//! Concurrent fetch → extract → save across many URLs.
//!
//! Each URL becomes one spawned task that runs the whole pipeline for that
//! URL. At most `workers` tasks are in flight; the rest wait their turn in
//! the stream. Results are drained in completion order by the calling task,
//! which is the only place the result list is appended to and the only place
//! status lines are printed. A failing or panicking task costs exactly one
//! error line.

use crate::error::ScrapeError;
use crate::extractor::extract_article;
use crate::fetcher::Fetcher;
use crate::models::ArticleRecord;
use crate::outputs::docx::save_article;
use crate::sanitize::article_path;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Pool size used when none is configured.
pub const DEFAULT_WORKERS: u16 = 5;

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records that were extracted and saved, in completion order.
    pub articles: Vec<ArticleRecord>,
    /// Number of URLs that produced an error line.
    pub failed: usize,
}

/// Run the full pipeline for one URL.
#[instrument(level = "info", skip(fetcher, output_dir))]
pub async fn scrape_and_save(
    fetcher: &Fetcher,
    url: &str,
    output_dir: &Path,
) -> Result<ArticleRecord, ScrapeError> {
    let html = fetcher.fetch_html(url).await?;
    let record = extract_article(&html, url);
    let path = article_path(output_dir, &record.title);
    save_article(fetcher, &record, &path).await?;
    Ok(record)
}

/// Status line printed for one finished URL.
fn status_line(url: &str, outcome: &Result<ArticleRecord, ScrapeError>) -> String {
    match outcome {
        Ok(_) => format!("Scraped and saved: {url}"),
        Err(e) if e.is_fetch() => e.to_string(),
        Err(e) => format!("{url} generated an exception: {e}"),
    }
}

/// Scrape every URL with a pool of `workers` concurrent tasks.
///
/// One line per URL is written to `out` as soon as that URL finishes. Errors
/// never abort the batch; only a failure to write to `out` does.
#[instrument(level = "info", skip_all, fields(urls = urls.len(), workers = workers, output_dir = %output_dir.display()))]
pub async fn scrape_multiple_urls<W: Write>(
    fetcher: Arc<Fetcher>,
    urls: &[String],
    output_dir: &Path,
    workers: usize,
    out: &mut W,
) -> std::io::Result<BatchReport> {
    let output_dir: Arc<PathBuf> = Arc::new(output_dir.to_path_buf());

    let mut completions = stream::iter(urls.iter().cloned())
        .map(|url| {
            let fetcher = Arc::clone(&fetcher);
            let output_dir = Arc::clone(&output_dir);
            let task_url = url.clone();
            let handle = tokio::spawn(async move {
                scrape_and_save(&fetcher, &task_url, &output_dir).await
            });
            async move {
                let outcome = handle.await.map_err(ScrapeError::from).and_then(|r| r);
                (url, outcome)
            }
        })
        .buffer_unordered(workers.max(1));

    let mut report = BatchReport::default();
    while let Some((url, outcome)) = completions.next().await {
        writeln!(out, "{}", status_line(&url, &outcome))?;
        match outcome {
            Ok(record) => {
                info!(%url, title = %record.title, "Scraped article");
                report.articles.push(record);
            }
            Err(e) if e.is_fetch() => {
                warn!(%url, error = %e, "Fetch failed; skipping");
                report.failed += 1;
            }
            Err(e) => {
                error!(%url, error = %e, "Task failed; skipping");
                report.failed += 1;
            }
        }
    }

    info!(
        succeeded = report.articles.len(),
        failed = report.failed,
        "Batch complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::DEFAULT_TIMEOUT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_html(title: &str) -> String {
        format!(
            r#"<html><body><h1>{title}</h1><time datetime="2024-01-01">x</time><p>Hello world.</p></body></html>"#
        )
    }

    async fn mount_article(server: &MockServer, route: &str, title: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(article_html(title)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_batch_counts_successes_and_failures() {
        let server = MockServer::start().await;
        mount_article(&server, "/one", "First Story").await;
        mount_article(&server, "/two", "Second Story").await;
        mount_article(&server, "/three", "Third Story").await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let urls: Vec<String> = ["/one", "/gone", "/two", "/three"]
            .iter()
            .map(|p| format!("{}{p}", server.uri()))
            .chain(std::iter::once("not a url".to_string()))
            .collect();

        let tmp = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(Fetcher::new(DEFAULT_TIMEOUT).unwrap());
        let mut out = Vec::new();

        let report = scrape_multiple_urls(fetcher, &urls, tmp.path(), 2, &mut out)
            .await
            .unwrap();

        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.failed, 2);

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("Scraped and saved: ")).count(),
            3
        );
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("Error fetching ")).count(),
            2
        );

        for stem in ["First_Story", "Second_Story", "Third_Story"] {
            assert!(tmp.path().join(format!("{stem}.docx")).is_file());
        }
    }

    #[tokio::test]
    async fn test_batch_with_no_successes() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(Fetcher::new(DEFAULT_TIMEOUT).unwrap());
        let urls = vec!["not a url".to_string()];
        let mut out = Vec::new();

        let report = scrape_multiple_urls(fetcher, &urls, tmp.path(), DEFAULT_WORKERS.into(), &mut out)
            .await
            .unwrap();

        assert!(report.articles.is_empty());
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_scrape_and_save_uses_title_for_file_name() {
        let server = MockServer::start().await;
        mount_article(&server, "/cafe", "Café: A Review!").await;

        let tmp = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(DEFAULT_TIMEOUT).unwrap();
        let record = scrape_and_save(&fetcher, &format!("{}/cafe", server.uri()), tmp.path())
            .await
            .unwrap();

        assert_eq!(record.title, "Café: A Review!");
        assert_eq!(record.content, "Hello world.");
        assert_eq!(record.updated_date, "2024-01-01");
        assert!(tmp.path().join("Cafe_A_Review.docx").is_file());
    }

    #[test]
    fn test_status_line_for_write_failure() {
        let err = ScrapeError::Document("zip failure".to_string());
        assert_eq!(
            status_line("https://example.com/a", &Err(err)),
            "https://example.com/a generated an exception: failed to build document: zip failure"
        );
    }
}
