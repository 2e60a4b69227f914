//! The colorize-syntax filter.

use std::sync::Arc;

use crate::config::Configuration;
use crate::dispatch::dispatch;
use crate::error::Error;
use crate::registry::Registry;
use crate::scan::scan;

/// A content transformation step of the site build.
pub trait Filter {
    /// Transform `content` using the options in `config`.
    fn run(&self, content: &str, config: &Configuration) -> Result<String, Error>;
}

/// Statistics for one filtered fragment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterReport {
    /// Code blocks whose content was replaced.
    pub blocks_highlighted: usize,
    /// `<pre>` elements without a class, left as they were.
    pub blocks_skipped: usize,
    /// Tags no override or default matched.
    pub fallback_tags: Vec<String>,
}

/// Rewrites the content of every classed `<pre>` with highlighted markup.
#[derive(Debug, Clone, Default)]
pub struct ColorizeSyntax {
    registry: Arc<Registry>,
}

impl ColorizeSyntax {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Like [`Filter::run`], also returning what was done.
    pub fn run_with_report(
        &self,
        content: &str,
        config: &Configuration,
    ) -> Result<(String, FilterReport), Error> {
        let (fragment, scanned) = scan(content);
        let table = self.registry.table(config);
        let dispatched = dispatch(&scanned.blocks, &table, config)?;

        let report = FilterReport {
            blocks_highlighted: dispatched.highlighted,
            blocks_skipped: scanned.skipped,
            fallback_tags: dispatched.fallback_tags,
        };
        Ok((fragment.to_html()?, report))
    }
}

impl Filter for ColorizeSyntax {
    fn run(&self, content: &str, config: &Configuration) -> Result<String, Error> {
        self.run_with_report(content, config).map(|(html, _)| html)
    }
}
