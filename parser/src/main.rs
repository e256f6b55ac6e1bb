use anyhow::{Context, Result};
use clap::Parser;
use scraper::{ElementRef, Html, Selector};
use search_core::record::format_record;
use search_core::Document;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "parser")]
#[command(about = "Strip HTML documentation into the raw corpus consumed by the search server", long_about = None)]
struct Cli {
    /// Directory of .html files, walked recursively
    #[arg(long, default_value = "data/input")]
    input: PathBuf,
    /// Raw corpus file to write, one document per line
    #[arg(long, default_value = "data/output/raw")]
    output: PathBuf,
    /// Public URL under which the input tree is served
    #[arg(long, default_value = "https://www.boost.org/doc/libs/1_82_0/doc/html")]
    url_prefix: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ParseStats {
    written: usize,
    skipped: usize,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let stats = run(&cli.input, &cli.output, &cli.url_prefix)?;
    tracing::info!(written = stats.written, skipped = stats.skipped, output = %cli.output.display(), "parse complete");
    Ok(())
}

fn run(input: &Path, output: &Path, url_prefix: &str) -> Result<ParseStats> {
    let files = enum_files(input)?;
    tracing::info!(files = files.len(), input = %input.display(), "found html files");

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut out = BufWriter::new(File::create(output).with_context(|| format!("creating {}", output.display()))?);

    let mut stats = ParseStats::default();
    for file in files {
        let content = match fs::read_to_string(&file) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "cannot read file, skipping");
                stats.skipped += 1;
                continue;
            }
        };
        let url = doc_url(url_prefix, input, &file);
        match parse_html(&content, url) {
            Some(doc) => {
                out.write_all(format_record(&doc).as_bytes())?;
                stats.written += 1;
            }
            None => {
                tracing::warn!(file = %file.display(), "no <title>, skipping");
                stats.skipped += 1;
            }
        }
    }
    out.flush()?;
    Ok(stats)
}

/// Every regular `.html` file below `root`, in a stable order.
fn enum_files(root: &Path) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(root.exists(), "{} does not exist", root.display());
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|s| s.to_str()) == Some("html") {
            tracing::debug!(file = %p.display(), "queued");
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

fn parse_html(content: &str, url: String) -> Option<Document> {
    let html = Html::parse_document(content);
    let sel_title = Selector::parse("title").ok()?;
    let sel_body = Selector::parse("body").ok()?;

    let title = html.select(&sel_title).next()?.text().collect::<String>();
    let title = collapse_whitespace(&title);
    let root = html.select(&sel_body).next().unwrap_or_else(|| html.root_element());
    Some(Document { title, body: visible_text(root), url })
}

/// Text nodes under `root`, skipping script and style contents.
fn visible_text(root: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| matches!(parent.value().name(), "script" | "style"));
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn doc_url(url_prefix: &str, root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let rel = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
    format!("{}/{}", url_prefix.trim_end_matches('/'), rel)
}
