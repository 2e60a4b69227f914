//! Syntax-highlight the code blocks of rendered HTML fragments.
//!
//! A static site renders its pages to HTML first; this crate post-processes
//! each page, finding `<pre class="...">` blocks and replacing their content
//! with markup produced by a highlighter chosen from the block's class.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tinct::{ColorizeSyntax, Configuration, Filter, Highlighter, Registry};
//!
//! let registry = Registry::builtin().with_default(
//!     "ruby",
//!     Highlighter::new("ruby", |code, _| Ok(format!("<b>{code}</b>"))),
//! );
//! let filter = ColorizeSyntax::new(Arc::new(registry));
//!
//! let html = filter
//!     .run(r#"<pre class="ruby"><code>puts 1</code></pre>"#, &Configuration::new())
//!     .unwrap();
//! assert_eq!(html, r#"<pre class="ruby"><code><b>puts 1</b></code></pre>"#);
//! ```
//!
//! # How it works
//!
//! 1. **Scan**: the fragment (or whole page) is parsed with html5ever and
//!    every `<pre>` that carries a `class` attribute becomes a [`CodeBlock`].
//!    Its tag is the whole class value; its code is the text of its first
//!    child. A block nested inside another block is part of the outer one.
//!
//! 2. **Resolve**: the [`Registry`] merges its process-wide defaults with the
//!    run's [`Configuration`] overrides. Unknown tags get the fallback
//!    highlighter, so resolution never fails.
//!
//! 3. **Dispatch**: each block is highlighted; the markup replaces the first
//!    child's content. If any highlighter fails, the whole fragment fails.
//!
//! 4. **Serialize**: the tree is written back out as UTF-8 HTML.

mod config;
mod dispatch;
mod error;
mod escape;
mod filter;
mod fragment;
mod registry;
mod scan;
mod serialize;

pub mod highlighters;

pub use config::{Configuration, HighlightFn, Highlighter};
pub use dispatch::{DispatchReport, dispatch};
pub use error::{Error, HighlightError};
pub use escape::html_escape;
pub use filter::{ColorizeSyntax, Filter, FilterReport};
pub use fragment::Fragment;
pub use registry::{ColorizerTable, DEFAULT, Registry, Resolution};
pub use scan::{CodeBlock, ScanResult, TERMINAL_CLASS, scan, scan_fragment};
