//! Filters every rendered page of an output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tinct::{ColorizeSyntax, Configuration, FilterReport};
use walkdir::WalkDir;

/// Options for the processor.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Directory of rendered pages.
    pub input_dir: PathBuf,
    /// Output directory (if None, modifies in place).
    pub output_dir: Option<PathBuf>,
}

/// A page that was not written.
#[derive(Debug)]
pub struct PageFailure {
    pub path: PathBuf,
    pub error: ProcessError,
}

/// Statistics from processing.
#[derive(Debug, Default)]
pub struct ProcessorStats {
    /// Number of HTML files filtered successfully.
    pub files_processed: usize,
    /// Pages whose highlighting failed.
    pub failures: Vec<PageFailure>,
    /// Number of code blocks highlighted.
    pub blocks_highlighted: usize,
    /// Number of `<pre>` elements without a class.
    pub blocks_skipped: usize,
    /// Tags that fell through to the fallback highlighter.
    pub fallback_tags: Vec<String>,
    /// Total bytes read from input HTML files.
    pub bytes_input: u64,
    /// Total bytes written to output HTML files.
    pub bytes_output: u64,
    /// Time spent filtering pages (excludes clone time).
    pub process_duration: Duration,
}

impl ProcessorStats {
    /// Calculate HTML inflation percentage ((output - input) / input * 100).
    pub fn html_inflation_percent(&self) -> f64 {
        if self.bytes_input == 0 {
            0.0
        } else {
            (self.bytes_output as f64 - self.bytes_input as f64) / self.bytes_input as f64 * 100.0
        }
    }

    /// Calculate processing throughput in MB/s (excludes clone time).
    pub fn throughput_mb_s(&self) -> f64 {
        let secs = self.process_duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            (self.bytes_input as f64 / (1024.0 * 1024.0)) / secs
        }
    }
}

/// Runs the colorize-syntax filter over a directory of pages.
pub struct Processor {
    options: ProcessOptions,
    filter: ColorizeSyntax,
    config: Configuration,
}

impl Processor {
    pub fn new(options: ProcessOptions, filter: ColorizeSyntax, config: Configuration) -> Self {
        Self {
            options,
            filter,
            config,
        }
    }

    /// Filter every `*.html` file.
    ///
    /// Failing pages are collected in [`ProcessorStats::failures`] rather than
    /// aborting the run; only directory-level problems return `Err`.
    pub fn process(&mut self) -> Result<ProcessorStats, ProcessError> {
        let input_dir = fs::canonicalize(&self.options.input_dir)?;
        let output_dir = match &self.options.output_dir {
            Some(out) => absolute(out)?,
            None => input_dir.clone(),
        };
        let output_dir = output_dir.as_path();
        let input_dir = input_dir.as_path();
        let cloned = output_dir != input_dir;

        if cloned {
            if output_dir.starts_with(input_dir) || input_dir.starts_with(output_dir) {
                return Err(ProcessError::NestedOutput {
                    input: input_dir.to_path_buf(),
                    output: output_dir.to_path_buf(),
                });
            }

            if output_dir.exists() {
                fs::remove_dir_all(output_dir)?;
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Cloning directory tree...");
            spinner.enable_steady_tick(Duration::from_millis(80));

            clonetree::clone_tree(input_dir, output_dir, &clonetree::Options::new())
                .map_err(|e| ProcessError::Clone(e.to_string()))?;

            spinner.finish_and_clear();
        }

        let html_files: Vec<PathBuf> = WalkDir::new(output_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
            .map(|e| e.into_path())
            .collect();

        tracing::info!(pages = html_files.len(), dir = %output_dir.display(), "filtering");

        let progress = ProgressBar::new(html_files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );

        let process_start = Instant::now();

        let files_processed = AtomicUsize::new(0);
        let blocks_highlighted = AtomicUsize::new(0);
        let blocks_skipped = AtomicUsize::new(0);
        let bytes_input = AtomicUsize::new(0);
        let bytes_output = AtomicUsize::new(0);
        let fallback_tags = Mutex::new(Vec::<String>::new());
        let failures = Mutex::new(Vec::<PageFailure>::new());

        let config = &self.config;

        // One filter handle per worker thread.
        html_files.par_iter().for_each_init(
            || self.filter.clone(),
            |filter, path| {
                tracing::debug!(page = %path.display(), "processing");

                match Self::process_page(path, filter, config) {
                    Ok((report, input_size, output_size)) => {
                        files_processed.fetch_add(1, Ordering::Relaxed);
                        blocks_highlighted.fetch_add(report.blocks_highlighted, Ordering::Relaxed);
                        blocks_skipped.fetch_add(report.blocks_skipped, Ordering::Relaxed);
                        bytes_input.fetch_add(input_size, Ordering::Relaxed);
                        bytes_output.fetch_add(output_size, Ordering::Relaxed);

                        if !report.fallback_tags.is_empty()
                            && let Ok(mut tags) = fallback_tags.lock()
                        {
                            for tag in report.fallback_tags {
                                if !tags.contains(&tag) {
                                    tags.push(tag);
                                }
                            }
                        }
                    }
                    Err(error) => {
                        tracing::error!(page = %path.display(), %error, "page not written");
                        if cloned && let Err(e) = fs::remove_file(path) {
                            tracing::warn!(page = %path.display(), error = %e, "could not remove cloned page");
                        }
                        if let Ok(mut failures) = failures.lock() {
                            failures.push(PageFailure {
                                path: path.clone(),
                                error,
                            });
                        }
                    }
                }
                progress.inc(1);
            },
        );

        let process_duration = process_start.elapsed();
        progress.finish_and_clear();

        let mut fallback_tags = fallback_tags.into_inner().unwrap_or_default();
        fallback_tags.sort();
        let mut failures = failures.into_inner().unwrap_or_default();
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ProcessorStats {
            files_processed: files_processed.load(Ordering::Relaxed),
            failures,
            blocks_highlighted: blocks_highlighted.load(Ordering::Relaxed),
            blocks_skipped: blocks_skipped.load(Ordering::Relaxed),
            fallback_tags,
            bytes_input: bytes_input.load(Ordering::Relaxed) as u64,
            bytes_output: bytes_output.load(Ordering::Relaxed) as u64,
            process_duration,
        })
    }

    /// Filter a single page, returning (report, input_bytes, output_bytes).
    fn process_page(
        path: &Path,
        filter: &ColorizeSyntax,
        config: &Configuration,
    ) -> Result<(FilterReport, usize, usize), ProcessError> {
        let html = fs::read_to_string(path)?;
        let input_size = html.len();

        // No container, nothing to parse.
        if !html.contains("<pre") {
            return Ok((FilterReport::default(), input_size, input_size));
        }

        let (filtered, report) = filter.run_with_report(&html, config)?;
        if report.blocks_highlighted == 0 {
            return Ok((report, input_size, input_size));
        }

        fs::write(path, &filtered)?;
        Ok((report, input_size, filtered.len()))
    }
}

/// Absolute form of `path` with symlinks resolved in its longest existing prefix.
fn absolute(path: &Path) -> io::Result<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(absolute(parent)?.join(name))
        }
        _ => std::path::absolute(path),
    }
}

/// Errors that can occur during processing.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Filter(#[from] tinct::Error),

    #[error("cloning output directory: {0}")]
    Clone(String),

    #[error("output {} and input {} must not contain one another", output.display(), input.display())]
    NestedOutput { input: PathBuf, output: PathBuf },
}
