use crate::{ItemizeError, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

// ── UnpackedEntry ─────────────────────────────────────────────────────────────

/// One file of an unpacked container.
///
/// Entries are read once when the tree is built and never change afterwards;
/// every analysis stage works from the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedEntry {
    /// Path relative to the root of the unpacked tree
    /// (e.g. `word/media/image1.png`).
    pub relative_path: PathBuf,

    /// The raw file content.
    pub contents: Vec<u8>,
}

impl UnpackedEntry {
    pub fn new<P: Into<PathBuf>>(relative_path: P, contents: Vec<u8>) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents,
        }
    }

    /// The last path component, e.g. `document.xml`.
    pub fn file_name(&self) -> String {
        self.relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the directory that directly contains this entry, or `None`
    /// for entries at the root of the tree.
    ///
    /// ```
    /// # use docx_itemizer::UnpackedEntry;
    /// let entry = UnpackedEntry::new("word/media/image1.png", vec![]);
    /// assert_eq!(entry.parent_dir_name().as_deref(), Some("media"));
    /// ```
    pub fn parent_dir_name(&self) -> Option<String> {
        self.relative_path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// The file extension without the dot, as written. Names that only
    /// start with a dot (`.rels`) have no extension.
    pub fn extension(&self) -> Option<String> {
        self.relative_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    /// The file name without its extension, e.g. `document` for
    /// `document.xml`.
    pub fn stem(&self) -> String {
        self.relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// ── UnpackedTree ──────────────────────────────────────────────────────────────

/// The complete set of files extracted from one container.
#[derive(Debug, Clone, Default)]
pub struct UnpackedTree {
    root: PathBuf,
    entries: Vec<UnpackedEntry>,
}

impl UnpackedTree {
    /// Build a tree from in-memory `(relative path, bytes)` pairs.
    /// `root` is only used to report where each entry lives.
    pub fn from_entries<R, I, P>(root: R, entries: I) -> Self
    where
        R: Into<PathBuf>,
        I: IntoIterator<Item = (P, Vec<u8>)>,
        P: Into<PathBuf>,
    {
        Self {
            root: root.into(),
            entries: entries
                .into_iter()
                .map(|(path, contents)| UnpackedEntry::new(path, contents))
                .collect(),
        }
    }

    /// Read every regular file below `root`, in lexical order.
    pub fn from_dir<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut entries = Vec::new();

        for item in WalkDir::new(root).sort_by_file_name() {
            let item = item?;
            if !item.file_type().is_file() {
                continue;
            }
            let relative = item
                .path()
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| item.path().to_path_buf());
            let contents = fs::read(item.path())?;
            entries.push(UnpackedEntry::new(relative, contents));
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[UnpackedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnpackedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Where `entry` lives on disk.
    pub fn source_path(&self, entry: &UnpackedEntry) -> PathBuf {
        self.root.join(&entry.relative_path)
    }
}

impl<'a> IntoIterator for &'a UnpackedTree {
    type Item = &'a UnpackedEntry;
    type IntoIter = std::slice::Iter<'a, UnpackedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Unpacking ─────────────────────────────────────────────────────────────────

/// Extract the zip container at `container` into `destination` and read the
/// result back as an [`UnpackedTree`].
///
/// Entry names that would escape `destination` (`../`, absolute paths) are
/// skipped with a warning.
///
/// # Errors
///
/// [`ItemizeError::Unpack`] when the file is not a zip archive or an entry
/// cannot be read; [`ItemizeError::Io`] when writing the extracted files fails.
pub fn unpack(container: &Path, destination: &Path) -> Result<UnpackedTree> {
    let unpack_error = |source| ItemizeError::Unpack {
        path: container.display().to_string(),
        source,
    };

    let reader = BufReader::new(File::open(container)?);
    let mut archive = ZipArchive::new(reader).map_err(unpack_error)?;
    fs::create_dir_all(destination)?;

    for index in 0..archive.len() {
        let mut zip_file = archive.by_index(index).map_err(unpack_error)?;

        let Some(relative) = zip_file.enclosed_name() else {
            warn!(name = zip_file.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let target = destination.join(relative);

        if zip_file.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut zip_file, &mut out)?;
        debug!(entry = %target.display(), "unpacked");
    }

    UnpackedTree::from_dir(destination)
}
