//! Output generation for scraped articles.
//!
//! # Submodules
//!
//! - [`docx`]: Renders one `ArticleRecord` into a Word document
//! - [`json`]: Writes the optional manifest describing a whole batch
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── Some_Headline.docx
//! ├── Another_Headline.docx
//! └── ...
//! ```

pub mod docx;
pub mod json;
