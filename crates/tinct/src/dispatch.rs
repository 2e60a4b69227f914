//! Highlight dispatch: resolve, invoke and reinject.
//!
//! Dispatch runs in two phases. Every block is highlighted first; only when
//! all highlighters succeeded is any markup written into the tree. A failing
//! highlighter therefore aborts the run with the fragment untouched.

use crate::config::Configuration;
use crate::error::Error;
use crate::fragment;
use crate::registry::{ColorizerTable, Resolution};
use crate::scan::CodeBlock;

/// What a dispatch pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of blocks whose content was replaced.
    pub highlighted: usize,
    /// Tags that resolved to the fallback highlighter, in first-seen order.
    pub fallback_tags: Vec<String>,
}

/// Highlight `blocks` and replace their content with the resulting markup.
///
/// The markup is inserted as HTML, not escaped: highlighters are responsible
/// for producing safe output.
pub fn dispatch(
    blocks: &[CodeBlock],
    table: &ColorizerTable,
    config: &Configuration,
) -> Result<DispatchReport, Error> {
    let mut report = DispatchReport::default();
    let mut rendered = Vec::with_capacity(blocks.len());

    for block in blocks {
        let tag = block.tag();
        let (highlighter, resolution) = table.resolve(tag);
        tracing::debug!(
            tag,
            highlighter = highlighter.name(),
            ?resolution,
            "highlighting code block"
        );

        if resolution == Resolution::Fallback && !report.fallback_tags.iter().any(|t| t == tag) {
            report.fallback_tags.push(tag.to_string());
        }

        let markup = highlighter
            .highlight(block.raw_text(), config)
            .map_err(|source| Error::Highlight {
                tag: tag.to_string(),
                highlighter: highlighter.name().to_string(),
                source,
            })?;
        rendered.push(markup);
    }

    for (block, markup) in blocks.iter().zip(rendered) {
        inject(block, &markup);
        report.highlighted += 1;
    }

    Ok(report)
}

/// Write `markup` into the first-child region of the block's container.
fn inject(block: &CodeBlock, markup: &str) {
    let pre = &block.element;
    let first = pre.children.borrow().first().cloned();

    match first {
        Some(child) => match fragment::element_name(&child).cloned() {
            // <pre><code>…</code></pre>: the code element keeps its attributes.
            Some(context) => {
                fragment::replace_children(&child, fragment::parse_nodes(markup, context));
            }
            None => {
                let Some(context) = fragment::element_name(pre).cloned() else {
                    return;
                };
                fragment::replace_child(pre, 0, fragment::parse_nodes(markup, context));
            }
        },
        None => {
            let Some(context) = fragment::element_name(pre).cloned() else {
                return;
            };
            fragment::replace_children(pre, fragment::parse_nodes(markup, context));
        }
    }
}
