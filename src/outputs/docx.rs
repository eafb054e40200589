//! Word document output for a single article.
//!
//! Writing happens in two steps. [`layout`] turns an [`ArticleRecord`] into an
//! ordered list of [`Block`]s, and [`render`] packs those blocks into a
//! `.docx` archive with `docx-rs`. The document always reads, top to bottom:
//!
//! ```text
//! <title>                      (Title style)
//! By: <byline>
//! Updated: <updatedDate>
//! Section: <section>
//! Keywords: <k1>, <k2>, ...
//! <lead image, 6in wide>       (or "Error adding image: ..." when it failed)
//! <content>
//! Source: <sourceUrl>
//! ```
//!
//! The image line is omitted entirely when the page had no `og:image`.

use crate::error::ScrapeError;
use crate::fetcher::Fetcher;
use crate::models::ArticleRecord;
use docx_rs::{Docx, Paragraph, Pic, Run, Style, StyleType};
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

/// Display width of the lead image.
pub const IMAGE_WIDTH_INCHES: u32 = 6;

const EMU_PER_INCH: u64 = 914_400;
const TITLE_STYLE_ID: &str = "Title";

/// One top-level element of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Paragraph(String),
    Picture(Picture),
}

/// A decoded lead image, re-encoded as PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl Picture {
    /// Decode any supported image format and re-encode it as PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScrapeError> {
        let decoded = image::load_from_memory(bytes)?;
        let mut png = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            png,
            width_px: decoded.width(),
            height_px: decoded.height(),
        })
    }

    /// Size in EMUs at [`IMAGE_WIDTH_INCHES`] wide, height scaled to keep the
    /// aspect ratio.
    pub fn display_size_emu(&self) -> (u32, u32) {
        let width = IMAGE_WIDTH_INCHES as u64 * EMU_PER_INCH;
        let height = width * self.height_px as u64 / self.width_px.max(1) as u64;
        (width as u32, height.min(u32::MAX as u64) as u32)
    }
}

/// Resolve a possibly relative image reference against the article URL.
pub fn resolve_image_url(source_url: &str, image_url: &str) -> String {
    Url::parse(source_url)
        .and_then(|base| base.join(image_url))
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|_| image_url.to_string())
}

/// Download and decode the lead image.
#[instrument(level = "info", skip(fetcher))]
pub async fn load_picture(fetcher: &Fetcher, url: &str) -> Result<Picture, ScrapeError> {
    let bytes = fetcher.fetch_image(url).await?;
    let picture = tokio::task::spawn_blocking(move || Picture::from_bytes(&bytes)).await??;
    info!(
        width = picture.width_px,
        height = picture.height_px,
        "Decoded lead image"
    );
    Ok(picture)
}

/// Lay out the document blocks for `record`.
///
/// `picture` is `None` when the record has no lead image; a failed download
/// or decode becomes an error paragraph in the image's place.
pub fn layout(record: &ArticleRecord, picture: Option<Result<Picture, ScrapeError>>) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(record.title.clone()),
        Block::Paragraph(format!("By: {}", record.byline)),
        Block::Paragraph(format!("Updated: {}", record.updated_date)),
        Block::Paragraph(format!("Section: {}", record.section)),
        Block::Paragraph(format!("Keywords: {}", record.keywords.join(", "))),
    ];

    match picture {
        Some(Ok(picture)) => blocks.push(Block::Picture(picture)),
        Some(Err(e)) => blocks.push(Block::Paragraph(format!("Error adding image: {e}"))),
        None => {}
    }

    blocks.push(Block::Paragraph(record.content.clone()));
    blocks.push(Block::Paragraph(format!("Source: {}", record.source_url)));
    blocks
}

fn title_style() -> Style {
    Style::new(TITLE_STYLE_ID, StyleType::Paragraph)
        .name("Title")
        .size(56)
        .bold()
}

/// Pack blocks into the bytes of a `.docx` file.
pub fn render(blocks: Vec<Block>) -> Result<Vec<u8>, ScrapeError> {
    let mut docx = Docx::new().add_style(title_style());

    for block in blocks {
        let paragraph = match block {
            Block::Title(text) => Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style(TITLE_STYLE_ID),
            Block::Paragraph(text) => Paragraph::new().add_run(Run::new().add_text(text)),
            Block::Picture(picture) => {
                let (width_emu, height_emu) = picture.display_size_emu();
                let pic = Pic::new_with_dimensions(picture.png, picture.width_px, picture.height_px)
                    .size(width_emu, height_emu);
                Paragraph::new().add_run(Run::new().add_image(pic))
            }
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut out = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut out)
        .map_err(|e| ScrapeError::Document(e.to_string()))?;
    Ok(out.into_inner())
}

/// Render `record` and write it to `path`, replacing any existing file.
///
/// The parent directory is created if missing. Image problems are recorded
/// in the document and never fail the call; render and write errors do.
/// The write is not atomic.
#[instrument(level = "info", skip_all, fields(path = %path.display(), url = %record.source_url))]
pub async fn save_article(
    fetcher: &Fetcher,
    record: &ArticleRecord,
    path: &Path,
) -> Result<(), ScrapeError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ScrapeError::io(dir, e))?;
    }

    let picture = match record.lead_image() {
        Some(raw) => {
            let url = resolve_image_url(&record.source_url, raw);
            let loaded = load_picture(fetcher, &url).await;
            if let Err(e) = &loaded {
                warn!(image = %url, error = %e, "Lead image unavailable; embedding note instead");
            }
            Some(loaded)
        }
        None => None,
    };

    let bytes = render(layout(record, picture))?;
    fs::write(path, &bytes)
        .await
        .map_err(|e| ScrapeError::io(path, e))?;

    info!(bytes = bytes.len(), "Wrote document");
    Ok(())
}
