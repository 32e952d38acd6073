//! CLI for itemizing `.docx` documents.
//!
//! Runs the itemizer over one document or every document below a directory,
//! prints the report of each and leaves a `log.txt` in each output directory.

use clap::Parser;
use docx_itemizer::{render_lines, Itemizer, ItemizerConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docx-itemizer", version, about = "Docx Itemizer")]
struct Cli {
    /// Path to a .docx file or a directory containing .docx file(s)
    path: PathBuf,

    /// Regex matched against file names and file contents while itemizing
    search_term: Option<String>,

    /// Create output directories here instead of next to each document
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory name whose files are always itemized as media
    #[arg(long, default_value = "media")]
    media_dir: String,

    /// Directory name holding the parts converted to plain text
    #[arg(long, default_value = "word")]
    content_dir: String,

    /// Do not write log.txt into the output directories
    #[arg(long)]
    no_log: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docx_itemizer=warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ItemizerConfig {
        search_pattern: cli.search_term,
        media_dir_name: cli.media_dir,
        content_dir_name: cli.content_dir,
        output_root: cli.output_dir,
        write_log: !cli.no_log,
        ..Default::default()
    };

    let itemizer = match Itemizer::new(config) {
        Ok(itemizer) => itemizer,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let batch = match itemizer.itemize_path(&cli.path) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if batch.is_empty() {
        println!(
            "No .{} Files Found In: {}",
            itemizer.config().document_extension,
            cli.path.display()
        );
        return;
    }

    let indent = if cli.path.is_dir() { "\t" } else { "" };
    for report in &batch.reports {
        for line in render_lines(report, indent) {
            println!("{line}");
        }
    }
    for (document, reason) in &batch.failures {
        eprintln!("Failed To Itemize {}: {reason}", document.display());
    }

    if !batch.failures.is_empty() {
        process::exit(1);
    }
}
