//! Syntax-highlight the code blocks of a directory of rendered pages.
//!
//! # Usage
//!
//! ```bash
//! tinct ./output ./output-highlighted --config tinct.toml
//! tinct - < fragment.html
//! ```
//!
//! Pages are filtered in parallel with the [`tinct::ColorizeSyntax`] filter.
//! Highlighters come from a TOML file ([`FileConfig`]) and from
//! `--colorizer TAG=HIGHLIGHTER` flags, which override the file for one run.

mod config;
mod processor;

pub use config::{ColorizerSpec, ConfigError, FileConfig, parse_override};
pub use processor::{PageFailure, ProcessError, ProcessOptions, Processor, ProcessorStats};
