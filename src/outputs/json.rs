//! JSON manifest of a batch run.
//!
//! When `--manifest` is given, every successfully scraped [`ArticleRecord`]
//! is serialized together with the run timestamp and output directory:
//!
//! ```text
//! {
//!   "generated_at": "2025-05-06T20:30:00.123+02:00",
//!   "output_dir": "scraped_articles",
//!   "articles": [ { "title": ..., "updatedDate": ..., ... } ]
//! }
//! ```
//!
//! [`ArticleRecord`]: crate::models::ArticleRecord

use crate::error::ScrapeError;
use crate::models::{ArticleRecord, Manifest};
use chrono::Local;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Build a manifest stamped with the current local time.
pub fn build_manifest(output_dir: &Path, articles: Vec<ArticleRecord>) -> Manifest {
    Manifest {
        generated_at: Local::now().to_rfc3339(),
        output_dir: output_dir.display().to_string(),
        articles,
    }
}

/// Write `manifest` as pretty-printed JSON to `path`.
///
/// The parent directory is created if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ScrapeError> {
    let json = serde_json::to_string_pretty(manifest)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ScrapeError::io(dir, e))?;
    }

    fs::write(path, json)
        .await
        .map_err(|e| ScrapeError::io(path, e))?;
    info!(articles = manifest.articles.len(), "Wrote manifest");

    Ok(())
}
