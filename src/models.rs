//! Data models for extracted articles.
//!
//! - [`ArticleRecord`]: the structured fields pulled out of one article page
//! - [`Manifest`]: the optional JSON summary of a whole batch
//!
//! Every text field of [`ArticleRecord`] carries a sentinel instead of being
//! optional, so a record is always printable as-is.

use serde::{Deserialize, Serialize};

/// Fallback for a page without an `h1`.
pub const TITLE_NOT_FOUND: &str = "Title not found";
/// Fallback for a page without any `p` element.
pub const CONTENT_NOT_FOUND: &str = "Content not found";
/// Fallback for every other single-valued field.
pub const NOT_FOUND: &str = "Not found";

/// The structured result of extracting fields from one article's HTML.
///
/// Records are immutable once built and independent of each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Text of the first `h1`, trimmed.
    pub title: String,
    /// All paragraph texts, trimmed and joined by single spaces.
    pub content: String,
    /// `datetime` attribute of the first `time` element.
    pub updated_date: String,
    /// Text of the first `span`/`div` whose class mentions "byline".
    pub byline: String,
    /// `article:section` meta content.
    pub section: String,
    /// Every `article:tag` meta content, in document order.
    pub keywords: Vec<String>,
    /// `og:image` meta content, unvalidated.
    pub image_url: String,
    /// The URL exactly as it was given on the command line.
    pub source_url: String,
}

impl ArticleRecord {
    /// The lead image URL, unless extraction fell back to the sentinel.
    pub fn lead_image(&self) -> Option<&str> {
        if self.image_url == NOT_FOUND {
            None
        } else {
            Some(&self.image_url)
        }
    }
}

/// Summary of one batch run, written with `--manifest`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Local timestamp of manifest creation, RFC 3339.
    pub generated_at: String,
    /// Directory the documents were written to.
    pub output_dir: String,
    /// The successfully scraped records, in completion order.
    pub articles: Vec<ArticleRecord>,
}
