//! Minimal CLI that itemizes one document and reports hidden images and
//! search hits.
//!
//! Usage:
//!   cargo run --example search_docx -- report.docx
//!   cargo run --example search_docx -- report.docx "invoice|total" ./output

use docx_itemizer::{Category, Itemizer, ItemizerConfig};
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <docx_file> [pattern] [output_dir]", args[0]);
        process::exit(1);
    }

    let docx_path = &args[1];
    let config = ItemizerConfig {
        search_pattern: args.get(2).cloned(),
        output_root: args.get(3).map(Into::into),
        write_log: false,
        ..Default::default()
    };

    let itemizer = Itemizer::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    println!("Itemizing: {docx_path}");
    let report = itemizer.itemize_document(docx_path).unwrap_or_else(|e| {
        eprintln!("Error itemizing document: {e}");
        process::exit(1);
    });
    println!("✓ Output in {}", report.layout.base().display());

    // 1. What is inside?
    for category in Category::ALL {
        let count = report.classification.bucket(category).len();
        if count > 0 {
            println!("  {:<14} {count} file(s)", category.dir_name());
        }
    }
    for skipped in &report.classification.skipped {
        println!("⚠ No text from {}: {}", skipped.source.display(), skipped.reason);
    }

    // 2. Any images under the wrong name?
    let hidden = report.audit.mismatch_count();
    if hidden == 0 {
        println!("✓ No hidden images");
    } else {
        println!("⚠ {hidden} hidden image(s)");
        for record in report.audit.mismatches() {
            let actual = record.sniffed.map(|k| k.to_string()).unwrap_or_default();
            println!("    {} is really {actual}", record.source.display());
        }
    }

    // 3. Search results
    let Some(search) = &report.search else {
        return;
    };
    if !search.found_anything() {
        println!("  '{}' not found", search.pattern);
        return;
    }
    for path in &search.name_matches {
        println!("  name match:    {}", path.display());
    }
    for path in &search.content_matches {
        println!("  content match: {}", path.display());
    }
    if !search.unreadable.is_empty() {
        println!("  {} file(s) could not be read as text", search.unreadable.len());
    }
}
