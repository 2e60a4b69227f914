//! Highlighter function values and the per-run configuration.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::HighlightError;

/// Signature every highlighter satisfies.
pub type HighlightFn =
    dyn Fn(&str, &Configuration) -> Result<String, HighlightError> + Send + Sync;

/// A named highlighting function.
///
/// Cloning is cheap: the function is shared behind an `Arc`, so one highlighter
/// can be registered under several tags and used from several threads.
#[derive(Clone)]
pub struct Highlighter {
    name: Arc<str>,
    func: Arc<HighlightFn>,
}

impl Highlighter {
    /// Wrap a function as a highlighter. `name` is used in logs and errors.
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&str, &Configuration) -> Result<String, HighlightError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The name this highlighter was registered with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn source code into highlighted markup.
    pub fn highlight(&self, code: &str, config: &Configuration) -> Result<String, HighlightError> {
        (self.func)(code, config)
    }
}

impl fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Highlighter").field(&self.name).finish()
    }
}

/// Options passed through a whole filter run.
///
/// `colorizers` overrides the registry's defaults for individual language tags;
/// `params` carries free-form options that highlighters may read. A value is
/// built once per run and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub colorizers: HashMap<String, Highlighter>,
    pub params: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the highlighter used for `tag`.
    pub fn colorizer(mut self, tag: impl Into<String>, highlighter: Highlighter) -> Self {
        self.colorizers.insert(tag.into(), highlighter);
        self
    }

    /// Set a free-form option.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a free-form option.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_receives_config() {
        let hl = Highlighter::new("shout", |code, config| {
            let suffix = config.get_param("suffix").unwrap_or("");
            Ok(format!("{}{}", code.to_uppercase(), suffix))
        });
        let config = Configuration::new().param("suffix", "!");

        assert_eq!(hl.name(), "shout");
        assert_eq!(hl.highlight("puts 1", &config).unwrap(), "PUTS 1!");
    }

    #[test]
    fn test_clones_share_function() {
        let hl = Highlighter::new("echo", |code, _| Ok(code.to_string()));
        let copy = hl.clone();
        assert_eq!(copy.highlight("x", &Configuration::new()).unwrap(), "x");
        assert_eq!(format!("{copy:?}"), r#"Highlighter("echo")"#);
    }
}
