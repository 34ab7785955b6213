//! Scan command implementation

use super::{load_document, Viewport, TEXT_EXTENSIONS};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pagemark_core::build_layout;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

struct ScanRow {
    name: String,
    pages: usize,
    chapters: usize,
}

/// Paginate every text document in a directory
pub fn scan(input_dir: &str, viewport: &Viewport, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);

    let mut files: Vec<PathBuf> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read directory: {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No text documents found in {}", input_dir);
        return Ok(());
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let error_count = AtomicUsize::new(0);
    let metrics = viewport.metrics();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;

    let rows: Vec<ScanRow> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|path| {
                let result = scan_file(path, metrics);
                progress.inc(1);
                match result {
                    Ok(row) => Some(row),
                    Err(e) => {
                        error_count.fetch_add(1, Ordering::Relaxed);
                        tracing::error!("Failed to scan {:?}: {:#}", path, e);
                        None
                    }
                }
            })
            .collect()
    });

    progress.finish_and_clear();

    for row in &rows {
        println!("{:<40} {:>6} pages {:>5} chapters", row.name, row.pages, row.chapters);
    }

    let errors = error_count.load(Ordering::Relaxed);
    println!("\nScanned {} documents, {} errors", rows.len(), errors);

    if errors > 0 {
        bail!("Scan completed with {} errors", errors);
    }

    Ok(())
}

fn scan_file(path: &Path, metrics: pagemark_core::PageMetrics) -> Result<ScanRow> {
    let input = path.to_str().context("Path is not valid UTF-8")?;
    let document = load_document(input)?;
    let layout = build_layout(&document.text, metrics);

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(input)
        .to_string();

    Ok(ScanRow {
        name,
        pages: layout.total_pages(),
        chapters: layout.chapters.len(),
    })
}
