//! Highlighter configuration from TOML files and command-line overrides.
//!
//! ```toml
//! fallback = "plain"                # for tags nothing else matches
//!
//! [colorizers]
//! ruby = "pygmentize"               # pygmentize -l ruby
//! c = { command = "highlight", args = ["--syntax=c", "--out-format=html", "--fragment"] }
//!
//! [params]
//! theme = "monokai"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tinct::{Configuration, DEFAULT, Highlighter, Registry, highlighters};

/// Contents of a `tinct.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Highlighter for tags with no override or default.
    #[serde(default)]
    pub fallback: Option<ColorizerSpec>,
    /// Process-wide highlighters by language tag.
    #[serde(default)]
    pub colorizers: BTreeMap<String, ColorizerSpec>,
    /// Free-form options handed to every highlighter.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// How to build a highlighter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorizerSpec {
    /// A built-in highlighter: `plain` or `pygmentize`.
    Named(String),
    /// An external program reading code on stdin and printing HTML.
    Command {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown highlighter `{name}` for tag `{tag}` (expected `plain`, `pygmentize` or a command table)")]
    UnknownHighlighter { tag: String, name: String },

    #[error("invalid override `{0}`: expected TAG=HIGHLIGHTER or TAG=cmd:PROGRAM [ARGS...]")]
    BadOverride(String),
}

impl ColorizerSpec {
    /// Build the highlighter this spec names for `tag`.
    pub fn build(&self, tag: &str) -> Result<Highlighter, ConfigError> {
        match self {
            ColorizerSpec::Named(name) => match (name.as_str(), tag) {
                ("plain", _) => Ok(highlighters::plain()),
                // pygmentize has no language to use for the fallback; let it guess.
                ("pygmentize", DEFAULT) => Ok(highlighters::command(
                    "pygmentize(guess)",
                    "pygmentize",
                    ["-g", "-f", "html", "-O", "nowrap"].map(String::from).to_vec(),
                )),
                ("pygmentize", _) => Ok(highlighters::pygmentize(tag)),
                _ => Err(ConfigError::UnknownHighlighter {
                    tag: tag.to_string(),
                    name: name.clone(),
                }),
            },
            ColorizerSpec::Command { command, args } => Ok(highlighters::command(
                format!("{command}({tag})"),
                command.clone(),
                args.clone(),
            )),
        }
    }
}

impl FileConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the process-wide registry.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = match &self.fallback {
            Some(spec) => Registry::new(spec.build(DEFAULT)?),
            None => Registry::builtin(),
        };

        for (tag, spec) in &self.colorizers {
            registry = registry.with_default(tag.clone(), spec.build(tag)?);
        }

        Ok(registry)
    }

    /// Build the configuration of one run, with `overrides` from the command line.
    pub fn configuration(&self, overrides: &[String]) -> Result<Configuration, ConfigError> {
        let mut config = Configuration::new();
        config.params = self.params.clone();

        for flag in overrides {
            let (tag, spec) = parse_override(flag)?;
            let highlighter = spec.build(&tag)?;
            config = config.colorizer(tag, highlighter);
        }

        Ok(config)
    }
}

/// Parse a `TAG=HIGHLIGHTER` or `TAG=cmd:PROGRAM ARGS...` flag.
pub fn parse_override(flag: &str) -> Result<(String, ColorizerSpec), ConfigError> {
    let bad = || ConfigError::BadOverride(flag.to_string());

    let (tag, value) = flag.split_once('=').ok_or_else(bad)?;
    let value = value.trim();

    let spec = match value.strip_prefix("cmd:") {
        Some(command_line) => {
            let mut words = command_line.split_whitespace().map(String::from);
            let command = words.next().ok_or_else(bad)?;
            ColorizerSpec::Command {
                command,
                args: words.collect(),
            }
        }
        None if value.is_empty() => return Err(bad()),
        None => ColorizerSpec::Named(value.to_string()),
    };

    Ok((tag.trim().to_string(), spec))
}
