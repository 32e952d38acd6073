//! Human-readable rendering of a [`DocumentReport`].

use crate::pipeline::DocumentReport;
use crate::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const RULE: &str = "~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~";

/// Render `report` as log lines, each prefixed with `indent` except the
/// leading document name and the closing rule.
pub fn render_lines(report: &DocumentReport, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut push = |depth: usize, text: String| {
        lines.push(format!("{indent}{}{text}", "\t".repeat(depth)));
    };

    push(0, format!("Processing Document: {}", display(&report.document)));
    push(0, "Completed Itemizing Document".into());
    push(0, format!("Itemized Files Location: {}", display(report.layout.base())));

    let classification = &report.classification;
    for (category, paths) in &classification.buckets {
        push(1, format!("{}: {} file(s)", category.dir_name(), paths.len()));
    }
    push(1, format!("Content: {} text file(s)", classification.extracted.len()));
    if !classification.skipped.is_empty() {
        push(1, "Skipped Text Extraction:".into());
        for skipped in &classification.skipped {
            push(2, format!("{} ({})", display(&skipped.source), skipped.reason));
        }
    }

    push(0, RULE.into());
    push(0, "Finding Hidden Images".into());
    let mismatches: Vec<_> = report.audit.mismatches().collect();
    if mismatches.is_empty() {
        push(0, "No Hidden Images Found".into());
    } else {
        push(0, "Hidden Images Found:".into());
        for (i, record) in mismatches.iter().enumerate() {
            let name = record
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            push(1, format!("Hidden Image File {}: {name}", i + 1));
            push(2, format!("Hidden Image Found At: {}", display(&record.source)));
            if let Some(kind) = record.sniffed {
                push(2, format!("Actual Type: {kind}"));
            }
            if let Some(copies) = &record.copies {
                push(2, format!("Copy Of Hidden Image At: {}", display(&copies.verbatim)));
                push(
                    2,
                    format!("Copy Of Hidden Image With Correct Extension: {}", display(&copies.corrected)),
                );
            }
            if i + 1 < mismatches.len() {
                push(1, RULE.into());
            }
        }
    }

    if let Some(search) = &report.search {
        push(0, RULE.into());
        push(0, format!("Searching File Names And Contents For: {}", search.pattern));
        let sections: [(&str, &[PathBuf]); 5] = [
            ("File Names Match:", search.name_matches.as_slice()),
            ("File Contents Match:", search.content_matches.as_slice()),
            ("Found Search Term Files Copied To:", search.copied.as_slice()),
            ("Unreadable File Contents:", search.unreadable.as_slice()),
            ("Unreadable Files Copied To:", search.unreadable_copied.as_slice()),
        ];
        for (title, paths) in sections {
            if paths.is_empty() {
                continue;
            }
            push(1, title.into());
            for path in paths {
                push(2, display(path));
            }
        }
        if !search.found_anything() {
            push(0, "Search Term Not Found".into());
        }
    }

    let name = report
        .document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    lines.insert(0, format!("Document Name: {name}"));
    lines.push(RULE.into());
    lines
}

fn display(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

impl DocumentReport {
    /// Append the rendered report to `log.txt` in the output directory.
    pub fn write_log(&self) -> Result<PathBuf> {
        let path = self.layout.log_file();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for line in render_lines(self, "") {
            writeln!(file, "{line}")?;
        }
        Ok(path)
    }
}
