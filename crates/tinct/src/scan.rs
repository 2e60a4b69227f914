//! Code-block discovery.

use std::fmt;

use markup5ever_rcdom::Handle;

use crate::fragment::{self, Fragment};

/// Class marking terminal transcripts; such blocks are dispatched like any other.
pub const TERMINAL_CLASS: &str = "term";

/// A `<pre>` element selected for highlighting.
#[derive(Clone)]
pub struct CodeBlock {
    pub(crate) element: Handle,
    tag: String,
    raw_text: String,
}

impl CodeBlock {
    /// The language tag: the whole `class` attribute value, possibly empty.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Text of the container's first child node, or empty if it has none.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

impl fmt::Debug for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeBlock")
            .field("tag", &self.tag)
            .field("raw_text", &self.raw_text)
            .finish_non_exhaustive()
    }
}

/// Result of scanning a fragment.
#[derive(Debug)]
pub struct ScanResult {
    /// Code blocks in document order.
    pub blocks: Vec<CodeBlock>,
    /// `<pre>` elements left alone because they carry no class.
    pub skipped: usize,
}

/// Parse `html` and locate its code blocks.
pub fn scan(html: &str) -> (Fragment, ScanResult) {
    let fragment = Fragment::parse(html);
    let result = scan_fragment(&fragment);
    (fragment, result)
}

/// Locate the code blocks of an already parsed fragment.
///
/// The contents of a code block belong to it: a classed `<pre>` nested inside
/// another one is not a block of its own.
pub fn scan_fragment(fragment: &Fragment) -> ScanResult {
    let mut blocks = Vec::new();
    let mut skipped = 0;

    fragment.walk(|node| {
        if !fragment::is_element(node, "pre") {
            return true;
        }

        let class = fragment::attribute(node, "class");
        if !is_code_block(class.as_deref()) {
            tracing::trace!("skipping <pre> without class");
            skipped += 1;
            return true;
        }

        let raw_text = node
            .children
            .borrow()
            .first()
            .map(fragment::text_content)
            .unwrap_or_default();

        blocks.push(CodeBlock {
            element: node.clone(),
            tag: class.unwrap_or_default(),
            raw_text,
        });
        false
    });

    ScanResult { blocks, skipped }
}

/// Any class marks a code block, the terminal marker included; only a
/// missing class attribute excludes one.
fn is_code_block(class: Option<&str>) -> bool {
    match class {
        Some(TERMINAL_CLASS) => true,
        Some(_) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_finds_blocks_in_document_order() {
        let html = indoc! {r#"
            <pre class="ruby"><code>puts 1</code></pre>
            <div><pre class="python">print(1)</pre></div>
            <pre class="term">$ ls</pre>
        "#};
        let (_, result) = scan(html);
        let found: Vec<(&str, &str)> = result
            .blocks
            .iter()
            .map(|b| (b.tag(), b.raw_text()))
            .collect();
        assert_eq!(
            found,
            [("ruby", "puts 1"), ("python", "print(1)"), ("term", "$ ls")]
        );
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_pre_without_class_is_skipped() {
        let (_, result) = scan("<pre>plain</pre><pre class=\"\">empty class</pre>");
        assert_eq!(result.skipped, 1);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].tag(), "");
        assert_eq!(result.blocks[0].raw_text(), "empty class");
    }

    #[test]
    fn test_whole_class_value_is_the_tag() {
        let (_, result) = scan(r#"<pre class="ruby linenums">x</pre>"#);
        assert_eq!(result.blocks[0].tag(), "ruby linenums");
    }

    #[test]
    fn test_only_first_child_is_read() {
        let (_, result) = scan(r#"<pre class="c"><code>int a;</code><code>int b;</code></pre>"#);
        assert_eq!(result.blocks[0].raw_text(), "int a;");
    }

    #[test]
    fn test_entities_are_decoded() {
        let (_, result) = scan(r#"<pre class="c"><code>a &lt; b &amp;&amp; c</code></pre>"#);
        assert_eq!(result.blocks[0].raw_text(), "a < b && c");
    }

    #[test]
    fn test_empty_pre_has_empty_text() {
        let (_, result) = scan(r#"<pre class="c"></pre>"#);
        assert_eq!(result.blocks[0].raw_text(), "");
    }

    #[test]
    fn test_terminal_marker_is_a_code_block() {
        assert!(is_code_block(Some(TERMINAL_CLASS)));
        assert!(is_code_block(Some("")));
        assert!(!is_code_block(None));
    }

    #[test]
    fn test_nested_block_belongs_to_outer_block() {
        let (_, result) = scan(r#"<pre class="ruby"><pre class="ruby">x</pre></pre><pre class="c">y</pre>"#);
        let found: Vec<(&str, &str)> = result
            .blocks
            .iter()
            .map(|b| (b.tag(), b.raw_text()))
            .collect();
        assert_eq!(found, [("ruby", "x"), ("c", "y")]);
    }

    #[test]
    fn test_block_inside_classless_pre_is_found() {
        let (_, result) = scan(r#"<pre><pre class="sh">ls</pre></pre>"#);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].tag(), "sh");
    }

    #[test]
    fn test_blocks_found_in_whole_document() {
        let (fragment, result) = scan(
            "<!DOCTYPE html><html><head><title>T</title></head><body><pre class=\"sh\">ls</pre></body></html>",
        );
        assert!(fragment.is_document());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].raw_text(), "ls");
    }

    #[test]
    fn test_malformed_input_is_tolerated() {
        let (_, result) = scan("<div><pre class=\"sh\">echo <b>hi");
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].raw_text(), "echo ");

        let (_, result) = scan("</pre></pre><<>>");
        assert!(result.blocks.is_empty());
    }
}
