use crate::auditor::{audit, AuditReport};
use crate::classifier::{classify, Classification};
use crate::container::{unpack, UnpackedTree};
use crate::output::{ensure_dir, OutputLayout};
use crate::searcher::{search, SearchReport};
use crate::{ItemizeError, ItemizerConfig, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use walkdir::WalkDir;

// ── Reports ───────────────────────────────────────────────────────────────────

/// Everything the pipeline produced for one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// The document that was itemized.
    pub document: PathBuf,
    pub layout: OutputLayout,
    /// Copy of the original document inside the output directory.
    pub document_copy: PathBuf,
    pub classification: Classification,
    pub audit: AuditReport,
    /// `None` when no search pattern was configured.
    pub search: Option<SearchReport>,
}

/// Outcome of [`Itemizer::itemize_path`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<DocumentReport>,
    /// Documents that could not be processed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn documents_seen(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents_seen() == 0
    }
}

// ── Itemizer ──────────────────────────────────────────────────────────────────

/// Entry point: unpacks documents and runs the analysis stages over them.
///
/// # Creating an itemizer
///
/// ```no_run
/// use docx_itemizer::{Itemizer, ItemizerConfig};
///
/// // Itemize and audit only
/// let plain = Itemizer::new(ItemizerConfig::default()).unwrap();
///
/// // Also search names and contents
/// let cfg = ItemizerConfig {
///     search_pattern: Some(r"\bpassword\b".into()),
///     output_root: Some("./itemized".into()),
///     ..Default::default()
/// };
/// let searching = Itemizer::new(cfg).unwrap();
/// let batch = searching.itemize_path("./documents").unwrap();
/// println!("{} document(s) itemized", batch.reports.len());
/// ```
#[derive(Debug, Clone)]
pub struct Itemizer {
    config: ItemizerConfig,
    pattern: Option<Regex>,
}

impl Itemizer {
    /// Build an itemizer, compiling the configured search pattern once.
    ///
    /// # Errors
    ///
    /// [`ItemizeError::InvalidPattern`] when the pattern is not a valid regex.
    pub fn new(config: ItemizerConfig) -> Result<Self> {
        let pattern = match config.search_pattern.as_deref() {
            Some(p) if !p.is_empty() => Some(Regex::new(p)?),
            _ => None,
        };
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &ItemizerConfig {
        &self.config
    }

    /// Returns `true` when `path` carries the configured document extension.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(&self.config.document_extension))
            .unwrap_or(false)
    }

    // ── Single document ──────────────────────────────────────────────────────

    /// Itemize one document into a fresh `<name>_Itemized(<now>)` directory.
    pub fn itemize_document<P: AsRef<Path>>(&self, path: P) -> Result<DocumentReport> {
        self.itemize_document_at(path.as_ref(), Local::now())
    }

    /// Like [`itemize_document`](Self::itemize_document) with an explicit
    /// timestamp for the output directory name.
    pub fn itemize_document_at(&self, path: &Path, timestamp: DateTime<Local>) -> Result<DocumentReport> {
        if !path.is_file() {
            return Err(ItemizeError::PathNotFound(path.display().to_string()));
        }
        if !self.is_document(path) {
            return Err(ItemizeError::NotADocument(path.display().to_string()));
        }

        let root = match &self.config.output_root {
            Some(root) => root.clone(),
            None => parent_dir(path),
        };
        let layout = claim_layout(path, &root, timestamp)?;
        info!(document = %path.display(), output = %layout.base().display(), "itemizing document");

        let tree = unpack(path, &layout.extracted_dir())?;
        let document_copy = layout.base().join(path.file_name().unwrap_or(path.as_os_str()));
        fs::copy(path, &document_copy)?;

        let (classification, audit, search) = self.analyze(&tree, &layout)?;
        let report = DocumentReport {
            document: path.to_path_buf(),
            layout,
            document_copy,
            classification,
            audit,
            search,
        };

        if self.config.write_log {
            report.write_log()?;
        }
        Ok(report)
    }

    /// Run the classifier, the image audit and, when a pattern is
    /// configured, the search over an already unpacked tree.
    ///
    /// The stages read the same tree and write to separate areas of
    /// `layout`; none depends on another's output.
    pub fn analyze(
        &self,
        tree: &UnpackedTree,
        layout: &OutputLayout,
    ) -> Result<(Classification, AuditReport, Option<SearchReport>)> {
        let classification = classify(tree, layout, &self.config)?;
        let audit = audit(tree, layout)?;
        let search = match &self.pattern {
            Some(pattern) => Some(search(tree, pattern, layout)?),
            None => None,
        };
        Ok((classification, audit, search))
    }

    // ── Batches ──────────────────────────────────────────────────────────────

    /// Itemize a single document, or every document found below a directory.
    ///
    /// Documents in a directory are processed in lexical order; one that
    /// fails is logged and recorded in [`BatchReport::failures`] without
    /// stopping the others.
    ///
    /// # Errors
    ///
    /// For a single file, whatever [`itemize_document`](Self::itemize_document)
    /// returns. [`ItemizeError::PathNotFound`] when `path` does not exist.
    pub fn itemize_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport> {
        let path = path.as_ref();
        let mut batch = BatchReport::default();

        if path.is_file() {
            batch.reports.push(self.itemize_document(path)?);
            return Ok(batch);
        }
        if !path.is_dir() {
            return Err(ItemizeError::PathNotFound(path.display().to_string()));
        }

        // Collect first: itemizing writes new directories (and document
        // copies) into the tree being walked.
        let mut documents = Vec::new();
        for item in WalkDir::new(path).sort_by_file_name() {
            let item = item?;
            if item.file_type().is_file() && self.is_document(item.path()) {
                documents.push(item.into_path());
            }
        }

        for document in documents {
            match self.itemize_document(&document) {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    error!(document = %document.display(), error = %e, "failed to itemize document");
                    batch.failures.push((document, e.to_string()));
                }
            }
        }

        Ok(batch)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Create the output directory, adding `-2`, `-3`, … when a directory of
/// that name already exists (same document name, same second).
fn claim_layout(document: &Path, root: &Path, timestamp: DateTime<Local>) -> Result<OutputLayout> {
    ensure_dir(root)?;
    let preferred = OutputLayout::for_document(document, root, timestamp);

    let mut layout = preferred.clone();
    let mut attempt = 1;
    loop {
        match fs::create_dir(layout.base()) {
            Ok(()) => return Ok(layout),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                attempt += 1;
                let mut name = preferred.base().as_os_str().to_owned();
                name.push(format!("-{attempt}"));
                layout = OutputLayout::new(name);
            }
            Err(e) => return Err(e.into()),
        }
    }
}
