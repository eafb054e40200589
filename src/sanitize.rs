//! Title to file name conversion.
//!
//! [`sanitize_filename`] turns an arbitrary headline into a slug made only of
//! ASCII word characters and hyphens. [`article_file_name`] applies the
//! 100-character cap and the `.docx` extension used for output documents.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Longest slug, in characters, used as a document file stem.
pub const MAX_STEM_CHARS: usize = 100;

/// Stem used when a title has no characters that survive sanitizing.
pub const EMPTY_STEM: &str = "untitled";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Convert a title into a filesystem-safe slug.
///
/// Transliterates to ASCII, turns whitespace into underscores, strips every
/// remaining character that is not a word character or a hyphen, then trims
/// leading and trailing hyphens and underscores. The result is not truncated.
///
/// ```ignore
/// assert_eq!(sanitize_filename("Café: A Review!"), "Cafe_A_Review");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let ascii = deunicode(title);
    let underscored = WHITESPACE.replace_all(&ascii, "_");
    let stripped = DISALLOWED.replace_all(&underscored, "");
    stripped.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// File name for an article's document: the sanitized title cut to
/// [`MAX_STEM_CHARS`] characters, plus `.docx`.
pub fn article_file_name(title: &str) -> String {
    let slug: String = sanitize_filename(title)
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if slug.is_empty() {
        format!("{EMPTY_STEM}.docx")
    } else {
        format!("{slug}.docx")
    }
}

/// Full output path for an article's document inside `output_dir`.
pub fn article_path(output_dir: &Path, title: &str) -> PathBuf {
    output_dir.join(article_file_name(title))
}
