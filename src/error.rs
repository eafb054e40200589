//! Error types for the article scraping pipeline.
//!
//! Every per-URL failure is expressed as a [`ScrapeError`]. None of them is
//! fatal to a batch: the orchestrator reports them one line per URL and moves
//! on. Image errors never even reach the orchestrator, the document writer
//! turns them into an inline note.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, extracting or saving an article.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network failure, timeout or non-success status while fetching a page.
    #[error("Error fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The lead image could not be downloaded.
    #[error("failed to download image {url}: {source}")]
    ImageDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The lead image bytes are not a decodable picture.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The word-processor document could not be assembled.
    #[error("failed to build document: {0}")]
    Document(String),

    /// Filesystem failure while writing an output file.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A worker task panicked or was cancelled before producing a result.
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScrapeError {
    /// Whether this is a page fetch failure, which is reported verbatim
    /// rather than as an unexpected task error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}
