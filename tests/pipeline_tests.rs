// End-to-end tests: real .docx containers written to a temporary directory.

use chrono::{Local, TimeZone};
use docx_itemizer::{render_lines, Category, ImageKind, ItemizeError, Itemizer, ItemizerConfig};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01];

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>helloWorld</w:t></w:r></w:p></w:body></w:document>"#;

fn build_docx(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory("word/", options).unwrap();
    for (name, data) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn sample_docx() -> Vec<u8> {
    build_docx(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("_rels/.rels", b"<Relationships/>"),
        ("word/document.xml", DOCUMENT_XML.as_bytes()),
        ("word/styles.xml", b"<w:styles xmlns:w=\"urn:w\"/>"),
        ("word/media/pic.bin", JPEG),
        ("word/_rels/document.xml.rels", b"<Relationships/>"),
    ])
}

fn write_docx(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, sample_docx()).unwrap();
    path
}

fn fixed_time() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2019, 4, 17, 12, 0, 0).unwrap()
}

fn itemizer(output_root: &Path, pattern: Option<&str>) -> Itemizer {
    Itemizer::new(ItemizerConfig {
        search_pattern: pattern.map(str::to_owned),
        output_root: Some(output_root.to_path_buf()),
        ..Default::default()
    })
    .unwrap()
}

// ── Single document ───────────────────────────────────────────────────────────

#[test]
fn itemizes_a_document_into_a_timestamped_directory() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let out = dir.path().join("out");

    let report = itemizer(&out, None).itemize_document_at(&doc, fixed_time()).unwrap();

    let base = out.join("report_Itemized(20190417-120000)");
    assert_eq!(report.layout.base(), base);
    assert_eq!(report.document_copy, base.join("report.docx"));
    assert_eq!(fs::read(&report.document_copy).unwrap(), sample_docx());
    assert!(base.join("Extracted Document/word/document.xml").is_file());
    assert!(base.join("Extracted Document/word/media/pic.bin").is_file());

    assert_eq!(fs::read_to_string(base.join("Content/document.txt")).unwrap(), "hello\nWorld");
    assert_eq!(fs::read_to_string(base.join("Content/styles.txt")).unwrap(), "");
    assert!(base.join("Media/pic.bin").is_file());
    assert!(base.join("Uncategorized/.rels").is_file());
    assert!(base.join("RELS/document.xml.rels").is_file());
    assert!(base.join("XML/[Content_Types].xml").is_file());

    assert_eq!(report.classification.total(), 6);
    assert_eq!(report.classification.bucket(Category::Xml).len(), 3);
    assert!(report.search.is_none());
    assert!(!base.join("Search").exists());
}

#[test]
fn finds_the_hidden_image() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let report = itemizer(&dir.path().join("out"), None)
        .itemize_document_at(&doc, fixed_time())
        .unwrap();

    let mismatches: Vec<_> = report.audit.mismatches().collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].sniffed, Some(ImageKind::Jpeg));
    assert!(mismatches[0].source.ends_with("word/media/pic.bin"));

    let hidden = report.layout.hidden_images_dir();
    assert!(hidden.join("pic.bin").is_file());
    assert!(hidden.join("pic.jpeg").is_file());
}

#[test]
fn searches_when_a_pattern_is_configured() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let report = itemizer(&dir.path().join("out"), Some("World|pic"))
        .itemize_document_at(&doc, fixed_time())
        .unwrap();

    let search = report.search.as_ref().unwrap();
    assert_eq!(search.content_matches.len(), 1);
    assert!(search.content_matches[0].ends_with("word/document.xml"));
    assert_eq!(search.name_matches.len(), 1);
    assert!(search.name_matches[0].ends_with("word/media/pic.bin"));
    assert_eq!(search.copied.len(), 2);
    assert!(report.layout.unreadable_dir().join("pic.bin").is_file());
    assert_eq!(
        fs::read_to_string(report.layout.pattern_file()).unwrap(),
        "World|pic"
    );
}

#[test]
fn writes_the_report_to_log_txt() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let report = itemizer(&dir.path().join("out"), Some("nomatch"))
        .itemize_document_at(&doc, fixed_time())
        .unwrap();

    let log = fs::read_to_string(report.layout.log_file()).unwrap();
    assert!(log.starts_with("Document Name: report.docx\n"));
    assert!(log.contains("Hidden Images Found:"));
    assert!(log.contains("Hidden Image File 1: pic.bin"));
    assert!(log.contains("Search Term Not Found"));

    let lines = render_lines(&report, "\t");
    assert_eq!(lines[0], "Document Name: report.docx");
    assert!(lines[1].starts_with("\tProcessing Document: "));
}

#[test]
fn log_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let itemizer = Itemizer::new(ItemizerConfig {
        output_root: Some(dir.path().join("out")),
        write_log: false,
        ..Default::default()
    })
    .unwrap();

    let report = itemizer.itemize_document_at(&doc, fixed_time()).unwrap();
    assert!(!report.layout.log_file().exists());
}

#[test]
fn same_name_and_second_gets_a_suffixed_directory() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let itemizer = itemizer(&dir.path().join("out"), None);

    let first = itemizer.itemize_document_at(&doc, fixed_time()).unwrap();
    let second = itemizer.itemize_document_at(&doc, fixed_time()).unwrap();

    assert_ne!(first.layout.base(), second.layout.base());
    assert!(second
        .layout
        .base()
        .to_string_lossy()
        .ends_with("report_Itemized(20190417-120000)-2"));
}

#[test]
fn output_defaults_to_the_document_directory() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_docx(dir.path(), "report.docx");
    let report = Itemizer::new(ItemizerConfig::default())
        .unwrap()
        .itemize_document_at(&doc, fixed_time())
        .unwrap();

    assert_eq!(report.layout.base(), dir.path().join("report_Itemized(20190417-120000)"));
}

// ── Rejected input ────────────────────────────────────────────────────────────

#[test]
fn corrupt_container_is_an_unpack_error() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("broken.docx");
    fs::write(&doc, b"this is not a zip archive").unwrap();

    let err = itemizer(&dir.path().join("out"), None)
        .itemize_document_at(&doc, fixed_time())
        .unwrap_err();
    assert!(matches!(err, ItemizeError::Unpack { .. }), "got {err:?}");
}

#[test]
fn wrong_extension_and_missing_path_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, b"hello").unwrap();
    let itemizer = itemizer(&dir.path().join("out"), None);

    assert!(matches!(itemizer.itemize_document(&notes), Err(ItemizeError::NotADocument(_))));
    assert!(matches!(
        itemizer.itemize_path(dir.path().join("missing")),
        Err(ItemizeError::PathNotFound(_))
    ));
}

#[test]
fn entries_escaping_the_extraction_directory_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("evil.docx");
    fs::write(
        &doc,
        build_docx(&[
            ("word/document.xml", DOCUMENT_XML.as_bytes()),
            ("../escaped.txt", b"outside"),
            ("word/../../escaped2.txt", b"outside"),
        ]),
    )
    .unwrap();

    let report = itemizer(&dir.path().join("out"), None)
        .itemize_document_at(&doc, fixed_time())
        .unwrap();

    let base = report.layout.base();
    assert!(!base.join("escaped.txt").exists());
    assert!(!base.join("escaped2.txt").exists());
    assert!(!dir.path().join("out/escaped.txt").exists());
    assert_eq!(report.classification.total(), 1);
    assert_eq!(report.classification.bucket(Category::Xml).len(), 1);
}

// ── Batches ───────────────────────────────────────────────────────────────────

#[test]
fn batch_isolates_failing_documents() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("nested")).unwrap();
    write_docx(&docs, "good.docx");
    write_docx(&docs.join("nested"), "also good.DOCX");
    fs::write(docs.join("broken.docx"), b"garbage").unwrap();
    fs::write(docs.join("notes.txt"), b"not a document").unwrap();

    let batch = itemizer(&dir.path().join("out"), None).itemize_path(&docs).unwrap();

    assert_eq!(batch.documents_seen(), 3);
    assert_eq!(batch.reports.len(), 2);
    assert_eq!(batch.failures.len(), 1);
    assert!(batch.failures[0].0.ends_with("broken.docx"));
    assert!(batch.failures[0].1.contains("unpack"));
}

#[test]
fn batch_does_not_pick_up_its_own_document_copies() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(dir.path(), "only.docx");
    let itemizer = Itemizer::new(ItemizerConfig::default()).unwrap();

    let batch = itemizer.itemize_path(dir.path()).unwrap();
    assert_eq!(batch.reports.len(), 1);
    assert!(batch.failures.is_empty());
}

#[test]
fn empty_directory_yields_an_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let batch = itemizer(&dir.path().join("out"), None).itemize_path(dir.path()).unwrap();
    assert!(batch.is_empty());
}
