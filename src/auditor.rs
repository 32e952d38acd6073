use crate::container::UnpackedTree;
use crate::output::{write_copy, OutputLayout};
use crate::sniffer::{sniff, ImageKind};
use crate::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// The two copies written for a mislabeled image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchCopies {
    /// Copy under the original file name.
    pub verbatim: PathBuf,
    /// Copy named `<stem>.<canonical extension>`.
    pub corrected: PathBuf,
}

/// What the signature check found for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffRecord {
    pub source: PathBuf,
    /// Extension as written in the file name, without the dot.
    pub declared_extension: Option<String>,
    /// Image type found in the leading bytes, `None` for non-images.
    pub sniffed: Option<ImageKind>,
    /// Set only when the entry is an image whose extension does not match.
    pub copies: Option<MismatchCopies>,
}

impl SniffRecord {
    pub fn is_mismatch(&self) -> bool {
        self.copies.is_some()
    }
}

/// Outcome of [`audit`]: one record per entry of the tree, in tree order.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub records: Vec<SniffRecord>,
}

impl AuditReport {
    /// Records of images hiding behind the wrong extension.
    pub fn mismatches(&self) -> impl Iterator<Item = &SniffRecord> {
        self.records.iter().filter(|r| r.is_mismatch())
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches().count()
    }
}

/// Sniff every entry and copy images with a misleading extension into
/// `Hidden Images/`, once as-is and once with the corrected extension.
///
/// The `Hidden Images` directory is only created when the first mismatch is
/// found. Entries without an image signature are recorded as clean.
///
/// # Errors
///
/// Returns an error when a copy cannot be written.
pub fn audit(tree: &UnpackedTree, layout: &OutputLayout) -> Result<AuditReport> {
    let hidden_dir = layout.hidden_images_dir();
    let mut report = AuditReport::default();

    for entry in tree {
        let declared_extension = entry.extension();
        let sniffed = sniff(&entry.contents);

        let copies = match sniffed {
            Some(kind) if !kind.matches_extension(declared_extension.as_deref()) => {
                warn!(
                    entry = %entry.relative_path.display(),
                    declared = declared_extension.as_deref().unwrap_or(""),
                    actual = %kind,
                    "image with mismatched extension"
                );
                let corrected_name = format!("{}.{}", entry.stem(), kind.canonical_extension());
                Some(MismatchCopies {
                    verbatim: write_copy(&hidden_dir, &entry.file_name(), &entry.contents)?,
                    corrected: write_copy(&hidden_dir, &corrected_name, &entry.contents)?,
                })
            }
            _ => None,
        };

        report.records.push(SniffRecord {
            source: tree.source_path(entry),
            declared_extension,
            sniffed,
            copies,
        });
    }

    info!(
        examined = report.records.len(),
        mismatches = report.mismatch_count(),
        "image audit complete"
    );
    Ok(report)
}
