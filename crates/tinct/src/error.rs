//! Error types for the highlighting filter.

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// A highlighter could not produce markup for a code block.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The highlighter rejected its input.
    #[error("{highlighter} failed: {message}")]
    Failed { highlighter: String, message: String },

    /// An external highlighting tool is not installed.
    #[error("highlighting tool `{program}` was not found on PATH")]
    ToolNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// An external highlighting tool exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Talking to an external highlighting tool failed.
    #[error("I/O error while running highlighter: {0}")]
    Io(#[from] io::Error),
}

impl HighlightError {
    /// Convenience constructor for highlighters that reject their input.
    pub fn failed(highlighter: impl Into<String>, message: impl Into<String>) -> Self {
        HighlightError::Failed {
            highlighter: highlighter.into(),
            message: message.into(),
        }
    }
}

/// Errors that abort a filter run for one fragment.
#[derive(Debug, Error)]
pub enum Error {
    /// The highlighter resolved for a code block failed.
    #[error("highlighting `{tag}` block with {highlighter}: {source}")]
    Highlight {
        tag: String,
        highlighter: String,
        #[source]
        source: HighlightError,
    },

    /// Writing the fragment back out failed.
    #[error("serializing fragment: {0}")]
    Serialize(#[from] io::Error),

    /// The serializer produced bytes that are not UTF-8.
    #[error("serialized fragment is not UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}
