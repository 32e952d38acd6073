use crate::container::{UnpackedEntry, UnpackedTree};
use crate::output::{ensure_dir, write_copy, OutputLayout};
use crate::text::extract_text;
use crate::{ItemizerConfig, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ── Category ──────────────────────────────────────────────────────────────────

/// The bucket a part of the container is itemized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Xml,
    Css,
    Media,
    Rels,
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Xml,
        Self::Css,
        Self::Media,
        Self::Rels,
        Self::Uncategorized,
    ];

    /// Name of the output directory holding this category's copies.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Xml => "XML",
            Self::Css => "CSS",
            Self::Media => "Media",
            Self::Rels => "RELS",
            Self::Uncategorized => "Uncategorized",
        }
    }

    /// Category for an extension written without the dot. Matching is
    /// exact: `XML` is not `xml`.
    fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("xml") => Self::Xml,
            Some("css") => Self::Css,
            Some("rels") => Self::Rels,
            _ => Self::Uncategorized,
        }
    }
}

/// Decide the category of a single entry.
///
/// The media directory wins over the extension: anything directly inside a
/// directory named `media_dir_name` is [`Category::Media`], even `.xml` files.
/// A name that only starts with a dot, such as the package relationship file
/// `_rels/.rels`, has no extension and is [`Category::Uncategorized`].
///
/// ```
/// use docx_itemizer::{categorize, Category, UnpackedEntry};
///
/// let styles = UnpackedEntry::new("word/media/styles.css", vec![]);
/// assert_eq!(categorize(&styles, "media"), Category::Media);
/// ```
pub fn categorize(entry: &UnpackedEntry, media_dir_name: &str) -> Category {
    if entry.parent_dir_name().as_deref() == Some(media_dir_name) {
        return Category::Media;
    }

    Category::from_extension(entry.extension().as_deref())
}

// ── Classification results ────────────────────────────────────────────────────

/// Plain text derived from one document body part.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// The XML part the text came from.
    pub source: PathBuf,
    /// The part's file name without extension; the `.txt` is named after it.
    pub name: String,
    pub text: String,
    /// Where the `.txt` artifact was written.
    pub written_to: PathBuf,
}

/// A document body part whose text could not be extracted.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Source paths per category. Every category has a key, possibly with an
    /// empty list.
    pub buckets: BTreeMap<Category, Vec<PathBuf>>,
    pub extracted: Vec<ExtractedText>,
    pub skipped: Vec<SkippedEntry>,
}

impl Classification {
    /// Source paths classified as `category`.
    pub fn bucket(&self, category: Category) -> &[PathBuf] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of classified entries across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// The category `source` was placed in, if it was classified.
    pub fn category_of(&self, source: &Path) -> Option<Category> {
        self.buckets
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == source))
            .map(|(category, _)| *category)
    }
}

// ── classify ──────────────────────────────────────────────────────────────────

/// Copy every entry of `tree` into its category directory and write the text
/// of each document body part to `Content/<name>.txt`.
///
/// A body part that is not well-formed XML is still copied to `XML/`; it is
/// reported in [`Classification::skipped`] instead of getting a text file.
///
/// # Errors
///
/// Returns an error only when the output directory cannot be written.
pub fn classify(
    tree: &UnpackedTree,
    layout: &OutputLayout,
    config: &ItemizerConfig,
) -> Result<Classification> {
    for category in Category::ALL {
        ensure_dir(&layout.category_dir(category))?;
    }
    let content_dir = layout.content_dir();
    ensure_dir(&content_dir)?;

    let mut result = Classification {
        buckets: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        ..Default::default()
    };

    for entry in tree {
        let source = tree.source_path(entry);
        let category = categorize(entry, &config.media_dir_name);

        write_copy(&layout.category_dir(category), &entry.file_name(), &entry.contents)?;
        debug!(entry = %entry.relative_path.display(), ?category, "classified");

        let is_body_part = entry.parent_dir_name().as_deref() == Some(config.content_dir_name.as_str());
        if category == Category::Xml && is_body_part {
            match extract_text(&entry.contents) {
                Ok(text) => {
                    let name = entry.stem();
                    let written_to = write_copy(&content_dir, &format!("{name}.txt"), text.as_bytes())?;
                    result.extracted.push(ExtractedText {
                        source: source.clone(),
                        name,
                        text,
                        written_to,
                    });
                }
                Err(e) => {
                    warn!(entry = %entry.relative_path.display(), error = %e, "skipping text extraction");
                    result.skipped.push(SkippedEntry {
                        source: source.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        result.buckets.entry(category).or_default().push(source);
    }

    info!(
        entries = result.total(),
        texts = result.extracted.len(),
        skipped = result.skipped.len(),
        "classification complete"
    );
    Ok(result)
}
