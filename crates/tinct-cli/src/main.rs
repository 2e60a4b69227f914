//! tinct CLI - syntax-highlight code blocks in rendered HTML.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use tinct::{ColorizeSyntax, Configuration, Filter};
use tinct_cli::{FileConfig, ProcessOptions, Processor};
use tracing_subscriber::EnvFilter;

/// Replace the content of every `<pre class="...">` with highlighted markup.
///
/// The class of each block names its language; blocks in languages with no
/// configured highlighter are HTML-escaped by the fallback.
#[derive(Debug, Parser)]
#[command(name = "tinct", version)]
struct Args {
    /// Directory of rendered pages, or `-` to filter one fragment from stdin
    input: PathBuf,

    /// Output directory (defaults to modifying input in place)
    output: Option<PathBuf>,

    /// TOML file with fallback, colorizers and params
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the highlighter of one tag for this run (repeatable)
    #[arg(long = "colorizer", value_name = "TAG=HIGHLIGHTER")]
    colorizers: Vec<String>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("TINCT_LOG").unwrap_or_else(|_| {
        if verbose { "tinct=debug".to_string() } else { "tinct=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let filter = ColorizeSyntax::new(Arc::new(file_config.registry()?));
    let config = file_config.configuration(&args.colorizers)?;

    if args.input.as_os_str() == "-" {
        return filter_stdin(&filter, &config);
    }

    if !args.input.exists() {
        bail!("Input directory does not exist: {}", args.input.display());
    }

    if !args.input.is_dir() {
        bail!("Input path is not a directory: {}", args.input.display());
    }

    let options = ProcessOptions {
        input_dir: args.input.clone(),
        output_dir: args.output.clone(),
    };
    let mut processor = Processor::new(options, filter, config);

    eprintln!(
        "{} Highlighting pages in: {}",
        "tinct".green().bold(),
        args.input.display()
    );

    if let Some(out) = &args.output {
        eprintln!("  Output: {}", out.display());
    } else {
        eprintln!("  {} Modifying in place", "Note:".yellow());
    }

    eprintln!();

    let start = Instant::now();
    let stats = processor.process()?;
    let elapsed = start.elapsed();

    eprintln!("{}", "Results:".bold());
    eprintln!(
        "  {} HTML files processed",
        stats.files_processed.to_string().cyan()
    );
    eprintln!(
        "  {} code blocks highlighted",
        stats.blocks_highlighted.to_string().green()
    );
    eprintln!(
        "  {} code blocks skipped (no class)",
        stats.blocks_skipped.to_string().yellow()
    );

    if !stats.fallback_tags.is_empty() {
        eprintln!(
            "\n  {} Highlighted with the fallback: {}",
            "Note:".yellow(),
            stats.fallback_tags.join(", ")
        );
    }

    eprintln!(
        "\n  Completed in {:.2}s ({:.1} MB/s, {:+.1}% HTML)",
        elapsed.as_secs_f64(),
        stats.throughput_mb_s(),
        stats.html_inflation_percent()
    );

    if !stats.failures.is_empty() {
        eprintln!();
        for failure in &stats.failures {
            eprintln!(
                "  {} {}: {}",
                "✗".red(),
                failure.path.display(),
                failure.error
            );
        }
        bail!("{} page(s) failed to highlight", stats.failures.len());
    }

    Ok(())
}

fn filter_stdin(filter: &ColorizeSyntax, config: &Configuration) -> Result<()> {
    let mut html = String::new();
    io::stdin()
        .read_to_string(&mut html)
        .context("reading fragment from stdin")?;

    let filtered = filter.run(&html, config)?;
    io::stdout().write_all(filtered.as_bytes())?;
    Ok(())
}
