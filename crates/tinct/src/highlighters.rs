//! Built-in highlighters.
//!
//! Lexing itself is left to external tools: [`plain`] only escapes code, and
//! [`command`] pipes code through any program that prints HTML markup.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::config::Highlighter;
use crate::error::HighlightError;
use crate::escape::html_escape;

/// Escape the code and nothing else.
pub fn plain() -> Highlighter {
    Highlighter::new("plain", |code, _| Ok(html_escape(code)))
}

/// Run `program args...` with the code on stdin and use its stdout as markup.
///
/// The program is looked up on `PATH` when the highlighter runs, so a missing
/// tool only fails the pages that actually need it.
pub fn command(name: impl Into<Arc<str>>, program: impl Into<String>, args: Vec<String>) -> Highlighter {
    let program = program.into();
    Highlighter::new(name, move |code, _| run_tool(&program, &args, code))
}

/// `pygmentize` emitting bare spans for `language`.
pub fn pygmentize(language: &str) -> Highlighter {
    command(
        format!("pygmentize({language})"),
        "pygmentize",
        vec![
            "-l".to_string(),
            language.to_string(),
            "-f".to_string(),
            "html".to_string(),
            "-O".to_string(),
            "nowrap".to_string(),
        ],
    )
}

fn run_tool(program: &str, args: &[String], code: &str) -> Result<String, HighlightError> {
    let path = which::which(program).map_err(|source| HighlightError::ToolNotFound {
        program: program.to_string(),
        source,
    })?;

    tracing::trace!(program, bytes = code.len(), "running external highlighter");

    let mut child = Command::new(&path)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // stdin is fed from its own thread: the tool may fill its stdout pipe
    // before it has consumed all of its input.
    let mut stdin = child.stdin.take().ok_or_else(|| {
        HighlightError::failed(program, "stdin of child process was not captured")
    })?;
    let input = code.to_string();
    let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child.wait_with_output()?;
    let written = writer
        .join()
        .map_err(|_| HighlightError::failed(program, "stdin writer panicked"))?;

    if !output.status.success() {
        return Err(HighlightError::ToolFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    written?;

    String::from_utf8(output.stdout)
        .map_err(|e| HighlightError::failed(program, format!("output is not UTF-8: {e}")))
}
