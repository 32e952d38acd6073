use crate::container::UnpackedTree;
use crate::output::{ensure_dir, write_copy_once, OutputLayout};
use crate::Result;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

// ── Decoding ──────────────────────────────────────────────────────────────────

/// An entry's bytes, read as text if they are valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<'a> {
    Text(&'a str),
    /// Not valid UTF-8; content matching is not attempted.
    Binary,
}

impl<'a> Decoded<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(_) => Self::Binary,
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Which of the two targets matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    Name,
    Content,
    Both,
}

impl MatchedBy {
    fn from_hits(name: bool, content: bool) -> Option<Self> {
        match (name, content) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Name),
            (false, true) => Some(Self::Content),
            (false, false) => None,
        }
    }
}

/// Search outcome for one entry that matched, was unreadable, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub source: PathBuf,
    pub matched_by: Option<MatchedBy>,
    pub readable: bool,
}

/// Outcome of [`search`].
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    /// The pattern exactly as given.
    pub pattern: String,
    /// File the pattern was persisted to.
    pub pattern_file: PathBuf,
    /// Sources whose file name matched.
    pub name_matches: Vec<PathBuf>,
    /// Sources whose decoded content matched.
    pub content_matches: Vec<PathBuf>,
    /// Sources whose content is not valid text.
    pub unreadable: Vec<PathBuf>,
    /// Copies written to `Search/`, one per destination path.
    pub copied: Vec<PathBuf>,
    /// Copies written to `Search/Unreadable/`.
    pub unreadable_copied: Vec<PathBuf>,
    pub records: Vec<SearchRecord>,
}

impl SearchReport {
    /// `true` when anything matched by name or content.
    pub fn found_anything(&self) -> bool {
        !self.name_matches.is_empty() || !self.content_matches.is_empty() || !self.copied.is_empty()
    }
}

// ── search ────────────────────────────────────────────────────────────────────

/// Match `pattern` against the file name and the text content of every entry.
///
/// Matches are copied into `Search/`; a destination that already exists is
/// never written twice, so an entry matching by both name and content yields
/// one copy. Entries whose bytes are not valid UTF-8 are copied into
/// `Search/Unreadable/` (created on first use) whether or not their name
/// matched. The pattern itself is saved as `Search/search_term.txt`.
///
/// # Errors
///
/// Returns an error when the search directory or a copy cannot be written.
pub fn search(tree: &UnpackedTree, pattern: &Regex, layout: &OutputLayout) -> Result<SearchReport> {
    let search_dir = layout.search_dir();
    let unreadable_dir = layout.unreadable_dir();
    ensure_dir(&search_dir)?;

    let pattern_file = layout.pattern_file();
    fs::write(&pattern_file, pattern.as_str())?;

    let mut report = SearchReport {
        pattern: pattern.as_str().to_owned(),
        pattern_file,
        ..Default::default()
    };

    for entry in tree {
        let source = tree.source_path(entry);
        let file_name = entry.file_name();

        let name_hit = pattern.is_match(&file_name);
        if name_hit {
            report.name_matches.push(source.clone());
        }

        let (content_hit, readable) = match Decoded::from_bytes(&entry.contents) {
            Decoded::Text(text) => (pattern.is_match(text), true),
            Decoded::Binary => {
                report.unreadable.push(source.clone());
                if let Some(dest) = write_copy_once(&unreadable_dir, &file_name, &entry.contents)? {
                    report.unreadable_copied.push(dest);
                }
                (false, false)
            }
        };
        if content_hit {
            report.content_matches.push(source.clone());
        }

        if name_hit || content_hit {
            if let Some(dest) = write_copy_once(&search_dir, &file_name, &entry.contents)? {
                debug!(dest = %dest.display(), "search hit copied");
                report.copied.push(dest);
            }
        }

        let matched_by = MatchedBy::from_hits(name_hit, content_hit);
        if matched_by.is_some() || !readable {
            report.records.push(SearchRecord {
                source,
                matched_by,
                readable,
            });
        }
    }

    info!(
        pattern = %report.pattern,
        by_name = report.name_matches.len(),
        by_content = report.content_matches.len(),
        unreadable = report.unreadable.len(),
        "search complete"
    );
    Ok(report)
}
