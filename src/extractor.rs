//! Field extraction from article HTML.
//!
//! Extraction is driven by [`RULES`], a table of independent lookups. Each
//! rule names the field it fills, the CSS selector it matches, how the value
//! is taken from the matches, and the fallback used when nothing matched.
//! Rules never fail: a page missing every expected element still yields a
//! complete [`ArticleRecord`] made of fallbacks.

use crate::models::{ArticleRecord, CONTENT_NOT_FOUND, NOT_FOUND, TITLE_NOT_FOUND};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Which [`ArticleRecord`] field a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Content,
    UpdatedDate,
    Byline,
    Section,
    Keywords,
    ImageUrl,
}

/// How a value is taken from the elements a selector matched.
#[derive(Clone, Copy)]
enum Take {
    /// Trimmed text of the first match.
    FirstText,
    /// Trimmed text of every match, joined by a single space.
    JoinedText,
    /// Trimmed text of the first match accepted by the predicate.
    FirstTextWhere(fn(&ElementRef<'_>) -> bool),
    /// Named attribute of the first match. Later matches are not consulted.
    FirstAttr(&'static str),
    /// Named attribute of every match that has it.
    EveryAttr(&'static str),
}

enum Value {
    Text(String),
    List(Vec<String>),
}

struct Rule {
    field: Field,
    selector: Selector,
    take: Take,
    fallback: &'static str,
}

impl Rule {
    fn new(field: Field, css: &str, take: Take, fallback: &'static str) -> Self {
        Self {
            field,
            selector: Selector::parse(css).expect("extraction selectors are valid CSS"),
            take,
            fallback,
        }
    }

    fn apply(&self, document: &Html) -> Value {
        let mut matches = document.select(&self.selector);
        let found = match self.take {
            Take::FirstText => matches.next().map(|el| element_text(&el)),
            Take::JoinedText => {
                let texts: Vec<String> = matches.map(|el| element_text(&el)).collect();
                (!texts.is_empty()).then(|| texts.join(" "))
            }
            Take::FirstTextWhere(accept) => matches.find(accept).map(|el| element_text(&el)),
            Take::FirstAttr(name) => matches
                .next()
                .and_then(|el| el.value().attr(name).map(str::to_string)),
            Take::EveryAttr(name) => {
                return Value::List(
                    matches
                        .filter_map(|el| el.value().attr(name).map(str::to_string))
                        .collect(),
                );
            }
        };
        Value::Text(found.unwrap_or_else(|| self.fallback.to_string()))
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(Field::Title, "h1", Take::FirstText, TITLE_NOT_FOUND),
        Rule::new(Field::Content, "p", Take::JoinedText, CONTENT_NOT_FOUND),
        Rule::new(
            Field::UpdatedDate,
            "time",
            Take::FirstAttr("datetime"),
            NOT_FOUND,
        ),
        Rule::new(
            Field::Byline,
            "span, div",
            Take::FirstTextWhere(has_byline_class),
            NOT_FOUND,
        ),
        Rule::new(
            Field::Section,
            r#"meta[property="article:section"]"#,
            Take::FirstAttr("content"),
            NOT_FOUND,
        ),
        Rule::new(
            Field::Keywords,
            r#"meta[property="article:tag"]"#,
            Take::EveryAttr("content"),
            NOT_FOUND,
        ),
        Rule::new(
            Field::ImageUrl,
            r#"meta[property="og:image"]"#,
            Take::FirstAttr("content"),
            NOT_FOUND,
        ),
    ]
});

/// Concatenated descendant text, trimmed at both ends.
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Case-insensitive substring match on the raw class attribute.
fn has_byline_class(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.to_lowercase().contains("byline"))
}

/// Extract an [`ArticleRecord`] from raw page HTML.
///
/// `source_url` is stored verbatim in the record.
pub fn extract_article(html: &str, source_url: &str) -> ArticleRecord {
    let document = Html::parse_document(html);

    let mut record = ArticleRecord {
        title: TITLE_NOT_FOUND.to_string(),
        content: CONTENT_NOT_FOUND.to_string(),
        updated_date: NOT_FOUND.to_string(),
        byline: NOT_FOUND.to_string(),
        section: NOT_FOUND.to_string(),
        keywords: Vec::new(),
        image_url: NOT_FOUND.to_string(),
        source_url: source_url.to_string(),
    };

    for rule in RULES.iter() {
        match (rule.field, rule.apply(&document)) {
            (Field::Keywords, Value::List(list)) => record.keywords = list,
            (Field::Title, Value::Text(text)) => record.title = text,
            (Field::Content, Value::Text(text)) => record.content = text,
            (Field::UpdatedDate, Value::Text(text)) => record.updated_date = text,
            (Field::Byline, Value::Text(text)) => record.byline = text,
            (Field::Section, Value::Text(text)) => record.section = text,
            (Field::ImageUrl, Value::Text(text)) => record.image_url = text,
            (field, _) => debug!(?field, "Rule produced a value of the wrong shape"),
        }
    }

    debug!(
        title = %record.title,
        keywords = record.keywords.len(),
        content = %truncate_for_log(&record.content, 120),
        "Extracted article"
    );
    record
}
