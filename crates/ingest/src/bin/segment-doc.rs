//! segment-doc: split a PDF, text file or video transcript into chapters.
//!
//! Pipeline flow: file → text extraction → chapter segmentation → JSON on stdout
//!
//! Segmenter thresholds come from `SEGMENT_*` environment variables (and a
//! `.env` file), resolved through the `ANYRPG_PROFILE` profile scheme.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use anyrpg_core::config::{load_dotenv, Config};
use anyrpg_core::{DocumentMetadata, ParsedDocument};
use anyrpg_ingest::{extract_file, parse_pdf_text};

// ── CLI ─────────────────────────────────────────────────────────────

/// Split a document into quiz-sized chapters.
#[derive(Parser, Debug)]
#[command(name = "segment-doc", version, about)]
struct Cli {
    /// PDF, text or transcript JSON file to segment.
    file: PathBuf,

    /// Page count override (defaults to the extracted page count).
    #[arg(long)]
    pages: Option<u32>,

    /// Declared document title.
    #[arg(long, env = "SEGMENT_DOC_TITLE")]
    title: Option<String>,

    /// Declared document author.
    #[arg(long, env = "SEGMENT_DOC_AUTHOR")]
    author: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print one line per chapter instead of JSON.
    #[arg(long)]
    summary: bool,
}

fn print_summary(doc: &ParsedDocument) {
    println!("{}", doc.title);
    if let Some(author) = &doc.author {
        println!("by {author}");
    }
    println!(
        "{} pages, {} chapters, {} levels",
        doc.total_pages,
        doc.chapters.len(),
        doc.level_count()
    );
    for ch in &doc.chapters {
        println!(
            "  {:>3}  {:<50}  {:>6} chars  ~{} tokens",
            ch.chapter_number,
            ch.title,
            ch.char_count(),
            ch.estimated_tokens()
        );
    }
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    let extracted = extract_file(&cli.file)
        .with_context(|| format!("failed to extract text from {}", cli.file.display()))?;
    info!(
        file = %cli.file.display(),
        pages = extracted.page_count(),
        chars = extracted.total_chars(),
        "extracted"
    );

    // The title step strips the extension itself.
    let metadata = extracted.metadata_with(DocumentMetadata {
        title: cli.title,
        author: cli.author,
        filename: Some(extracted.filename.clone()),
    });
    let num_pages = cli.pages.unwrap_or_else(|| extracted.page_count());

    let doc = parse_pdf_text(&extracted.full_text(), num_pages, &metadata, &config.segmenter);

    if cli.summary {
        print_summary(&doc);
    } else if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", serde_json::to_string(&doc)?);
    }
    Ok(())
}
