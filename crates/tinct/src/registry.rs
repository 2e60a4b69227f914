//! Language tag → highlighter resolution.
//!
//! The [`Registry`] holds the process-wide defaults and is read-only once the
//! build has started. Caller overrides live in the [`Configuration`] of each
//! run; [`Registry::table`] merges both into a fresh [`ColorizerTable`] so no
//! run ever observes another run's overrides.
//!
//! Resolution is total: a tag nobody registered resolves to the fallback
//! highlighter instead of failing.

use std::collections::HashMap;

use crate::config::{Configuration, Highlighter};
use crate::highlighters;

/// Name of the reserved fallback entry.
pub const DEFAULT: &str = "default";

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The run's configuration overrides this tag.
    Override,
    /// The registry has a process-wide default for this tag.
    Default,
    /// Nothing matched; the fallback highlighter is used.
    Fallback,
}

/// Process-wide default highlighters plus the fallback.
#[derive(Debug, Clone)]
pub struct Registry {
    defaults: HashMap<String, Highlighter>,
    fallback: Highlighter,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Create a registry with no defaults and the given fallback.
    pub fn new(fallback: Highlighter) -> Self {
        Self {
            defaults: HashMap::new(),
            fallback,
        }
    }

    /// Registry whose fallback escapes code without highlighting it.
    pub fn builtin() -> Self {
        Self::new(highlighters::plain())
    }

    /// Register a process-wide default for `tag`.
    pub fn with_default(mut self, tag: impl Into<String>, highlighter: Highlighter) -> Self {
        self.defaults.insert(tag.into(), highlighter);
        self
    }

    /// The highlighter used when nothing else matches.
    pub fn fallback(&self) -> &Highlighter {
        &self.fallback
    }

    /// Resolve the highlighter for `tag`: override, then default, then fallback.
    pub fn resolve<'a>(&'a self, tag: &str, config: &'a Configuration) -> &'a Highlighter {
        config
            .colorizers
            .get(tag)
            .or_else(|| self.defaults.get(tag))
            .unwrap_or(&self.fallback)
    }

    /// Merge the defaults with the overrides of one run.
    pub fn table(&self, config: &Configuration) -> ColorizerTable {
        let mut entries: HashMap<String, (Highlighter, Resolution)> = self
            .defaults
            .iter()
            .map(|(tag, hl)| (tag.clone(), (hl.clone(), Resolution::Default)))
            .collect();

        for (tag, hl) in &config.colorizers {
            entries.insert(tag.clone(), (hl.clone(), Resolution::Override));
        }

        ColorizerTable {
            entries,
            fallback: self.fallback.clone(),
        }
    }
}

/// The effective tag → highlighter mapping for one filter run.
#[derive(Debug, Clone)]
pub struct ColorizerTable {
    entries: HashMap<String, (Highlighter, Resolution)>,
    fallback: Highlighter,
}

impl ColorizerTable {
    /// Resolve `tag`, reporting which tier answered.
    pub fn resolve(&self, tag: &str) -> (&Highlighter, Resolution) {
        match self.entries.get(tag) {
            Some((hl, resolution)) => (hl, *resolution),
            None => (&self.fallback, Resolution::Fallback),
        }
    }
}
