//! # docx-itemizer
//!
//! A Rust library for taking `.docx` containers apart and reporting on what is
//! inside them.
//!
//! ## What this crate does
//!
//! 1. **Unpack**: extracts the zip container into an `Extracted Document`
//!    directory next to a copy of the original file.
//! 2. **Itemize**: sorts every part into `XML`, `CSS`, `Media`, `RELS` or
//!    `Uncategorized`, and writes the plain text of the document body parts to
//!    `Content/<part>.txt`.
//! 3. **Find hidden images**: sniffs every part's leading bytes and copies
//!    images whose extension lies about their type into `Hidden Images`.
//! 4. **Search**: matches a regex against every part's file name and text
//!    content, copying hits into `Search` and undecodable parts into
//!    `Search/Unreadable`.
//!
//! ## Quick example
//!
//! ```no_run
//! use docx_itemizer::{Itemizer, ItemizerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ItemizerConfig {
//!     search_pattern: Some("(?i)confidential".into()),
//!     ..Default::default()
//! };
//! let itemizer = Itemizer::new(config)?;
//! let report = itemizer.itemize_document("report.docx")?;
//!
//! for mismatch in report.audit.mismatches() {
//!     if let Some(kind) = mismatch.sniffed {
//!         println!("{} is really a {kind}", mismatch.source.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod auditor;
mod classifier;
mod container;
mod output;
mod pipeline;
mod report;
mod searcher;
mod sniffer;
mod text;

pub use auditor::{audit, AuditReport, MismatchCopies, SniffRecord};
pub use classifier::{categorize, classify, Category, Classification, ExtractedText, SkippedEntry};
pub use container::{unpack, UnpackedEntry, UnpackedTree};
pub use output::{ensure_dir, OutputLayout};
pub use pipeline::{BatchReport, DocumentReport, Itemizer};
pub use report::render_lines;
pub use searcher::{search, Decoded, MatchedBy, SearchRecord, SearchReport};
pub use sniffer::{sniff, ImageKind};
pub use text::{extract_text, insert_word_breaks};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`Itemizer`].
#[derive(Debug, Clone)]
pub struct ItemizerConfig {
    /// Regex matched against every part's file name and text content.
    /// `None` or an empty string disables the search stage.
    pub search_pattern: Option<String>,

    /// Name of the directory whose files are always classified as media,
    /// whatever their extension.
    pub media_dir_name: String,

    /// Name of the directory holding the user-authored XML parts. Only XML
    /// files directly inside it get a `Content/*.txt` artifact.
    pub content_dir_name: String,

    /// Extension (without the dot) that identifies a document when walking
    /// a directory.
    pub document_extension: String,

    /// Directory under which the `<name>_Itemized(<timestamp>)` output
    /// directories are created. Defaults to each document's own directory.
    pub output_root: Option<PathBuf>,

    /// When `true`, the rendered report is also written to `log.txt` inside
    /// the output directory.
    pub write_log: bool,
}

impl Default for ItemizerConfig {
    fn default() -> Self {
        Self {
            search_pattern: None,
            media_dir_name: "media".into(),
            content_dir_name: "word".into(),
            document_extension: "docx".into(),
            output_root: None,
            write_log: true,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum ItemizeError {
    /// A filesystem I/O error occurred while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container is not a readable zip archive, or extraction failed
    /// partway through.
    #[error("Failed to unpack '{path}': {source}")]
    Unpack {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// An XML part is not well-formed UTF-8 XML.
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// The search pattern is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Walking a directory tree failed.
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// The path is a file, but not one with the configured document extension.
    #[error("Not a document: {0}")]
    NotADocument(String),

    /// The path is neither a file nor a directory.
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ItemizeError>;
