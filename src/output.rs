use crate::classifier::Category;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const EXTRACTED_DIR: &str = "Extracted Document";
const CONTENT_DIR: &str = "Content";
const HIDDEN_IMAGES_DIR: &str = "Hidden Images";
const SEARCH_DIR: &str = "Search";
const UNREADABLE_DIR: &str = "Unreadable";
const PATTERN_FILE: &str = "search_term.txt";
const LOG_FILE: &str = "log.txt";

// ── OutputLayout ──────────────────────────────────────────────────────────────

/// Paths of every area inside one document's output directory.
///
/// ```text
/// report_Itemized(20190417-120000)/
///   report.docx
///   Extracted Document/
///   XML/  CSS/  Media/  Content/  RELS/  Uncategorized/
///   Hidden Images/
///   Search/search_term.txt
///   Search/Unreadable/
///   log.txt
/// ```
///
/// Creating the layout value touches nothing on disk; each stage creates the
/// directories it writes to through [`ensure_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base: PathBuf,
}

impl OutputLayout {
    /// Use `base` as the output directory.
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// Output directory for `document` under `root`, named
    /// `<stem>_Itemized(<YYYYmmdd-HHMMSS>)` from `timestamp`.
    pub fn for_document(document: &Path, root: &Path, timestamp: DateTime<Local>) -> Self {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into());
        let name = format!("{stem}_Itemized({})", timestamp.format("%Y%m%d-%H%M%S"));
        Self::new(root.join(name))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.base.join(EXTRACTED_DIR)
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.base.join(category.dir_name())
    }

    pub fn content_dir(&self) -> PathBuf {
        self.base.join(CONTENT_DIR)
    }

    pub fn hidden_images_dir(&self) -> PathBuf {
        self.base.join(HIDDEN_IMAGES_DIR)
    }

    pub fn search_dir(&self) -> PathBuf {
        self.base.join(SEARCH_DIR)
    }

    pub fn unreadable_dir(&self) -> PathBuf {
        self.search_dir().join(UNREADABLE_DIR)
    }

    pub fn pattern_file(&self) -> PathBuf {
        self.search_dir().join(PATTERN_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.base.join(LOG_FILE)
    }
}

// ── Filesystem helpers ────────────────────────────────────────────────────────

/// Create `dir` and any missing parents. An existing directory is success,
/// so concurrent or repeated calls never fail on each other.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Write `data` to `dir/file_name`, creating `dir` if needed, replacing any
/// previous file. Returns the written path.
pub(crate) fn write_copy(dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let dest = dir.join(file_name);
    fs::write(&dest, data)?;
    Ok(dest)
}

/// Write `data` to `dir/file_name` unless that path already exists.
///
/// Returns `Ok(None)` when something is already there. The existence check
/// and the create are a single `create_new` open, so two writers racing for
/// the same destination produce exactly one copy.
pub(crate) fn write_copy_once(dir: &Path, file_name: &str, data: &[u8]) -> Result<Option<PathBuf>> {
    ensure_dir(dir)?;
    let dest = dir.join(file_name);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&dest) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    file.write_all(data)?;
    Ok(Some(dest))
}
