//! HTML fragments: forgiving parsing, node helpers and serialization.
//!
//! Input is parsed with html5ever. A fragment is parsed as the contents of a
//! `<body>` element; input that starts with a doctype or an `<html>` tag is
//! parsed as a whole document so its doctype, `<head>` and `<body>` survive.
//! In both modes stray end tags are dropped and unclosed elements are closed
//! the way a browser would. Parsing never fails.

use std::mem;
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::Error;
use crate::serialize::Markup;

pub(crate) const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed HTML fragment or document.
///
/// The tree is reference counted and not `Send`: a fragment lives on the
/// thread that parsed it, for the duration of one filter run.
pub struct Fragment {
    dom: RcDom,
    document: bool,
}

impl Fragment {
    /// Parse `html`, as a document if it starts like one and as the contents
    /// of a `<body>` element otherwise.
    pub fn parse(html: &str) -> Self {
        if looks_like_document(html) {
            Self::parse_document(html)
        } else {
            Self::parse_fragment(html)
        }
    }

    /// Parse `html` as the contents of a `<body>` element.
    pub fn parse_fragment(html: &str) -> Self {
        Self {
            dom: parse_in_context(html, html_name("body")),
            document: false,
        }
    }

    /// Parse `html` as a complete document, doctype included.
    pub fn parse_document(html: &str) -> Self {
        Self {
            dom: parse_document(RcDom::default(), ParseOpts::default()).one(html),
            document: true,
        }
    }

    /// True if this was parsed as a complete document.
    pub fn is_document(&self) -> bool {
        self.document
    }

    /// The node whose children are the top-level nodes: the document itself,
    /// or the synthetic `<html>` element of a fragment.
    pub(crate) fn root(&self) -> Option<Handle> {
        if self.document {
            return Some(self.dom.document.clone());
        }
        self.dom.document.children.borrow().first().cloned()
    }

    /// Serialize back to UTF-8 HTML.
    pub fn to_html(&self) -> Result<String, Error> {
        let Some(root) = self.root() else {
            return Ok(String::new());
        };

        let mut bytes = Vec::new();
        serialize(
            &mut bytes,
            &Markup(&root),
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )?;

        Ok(String::from_utf8(bytes)?)
    }

    /// Visit every node below the root in document (pre-order) order.
    /// Returning `false` from `visit` skips that node's subtree.
    ///
    /// `<template>` contents live outside the tree and are not visited.
    pub(crate) fn walk(&self, mut visit: impl FnMut(&Handle) -> bool) {
        let Some(root) = self.root() else {
            return;
        };

        let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
        while let Some(node) = stack.pop() {
            if visit(&node) {
                stack.extend(node.children.borrow().iter().rev().cloned());
            }
        }
    }

    /// All nodes below the root in document order.
    #[cfg(test)]
    pub(crate) fn descendants(&self) -> Vec<Handle> {
        let mut out = Vec::new();
        self.walk(|node| {
            out.push(node.clone());
            true
        });
        out
    }
}

/// Doctype or `<html>` first, ignoring a BOM and leading whitespace.
fn looks_like_document(html: &str) -> bool {
    let start = html.trim_start_matches(|c: char| c == '\u{feff}' || c.is_ascii_whitespace());
    if starts_with_ignore_case(start, "<!doctype") {
        return true;
    }
    starts_with_ignore_case(start, "<html")
        && matches!(
            start.as_bytes().get(5),
            Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
        )
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

fn parse_in_context(html: &str, context: QualName) -> RcDom {
    parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![]).one(html)
}

/// Parse `markup` as the children of an element named `context` and detach
/// the resulting top-level nodes.
pub(crate) fn parse_nodes(markup: &str, context: QualName) -> Vec<Handle> {
    let dom = parse_in_context(markup, context);
    let Some(root) = dom.document.children.borrow().first().cloned() else {
        return Vec::new();
    };
    let nodes = mem::take(&mut *root.children.borrow_mut());
    for node in &nodes {
        node.parent.set(None);
    }
    nodes
}

/// The element's qualified name, if `node` is an element.
pub(crate) fn element_name(node: &Handle) -> Option<&QualName> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name),
        _ => None,
    }
}

/// True if `node` is an HTML element with the given local name.
pub(crate) fn is_element(node: &Handle, local: &str) -> bool {
    element_name(node).is_some_and(|name| &*name.local == local)
}

/// The value of attribute `local` on an element.
pub(crate) fn attribute(node: &Handle, local: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == local)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Text of a node: a text node's text, a comment's contents, or the
/// concatenated text below an element.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    match &node.data {
        NodeData::Comment { contents } => text.push_str(contents),
        _ => collect_text(node, &mut text),
    }
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

/// Replace all children of `parent` with `nodes`.
pub(crate) fn replace_children(parent: &Handle, nodes: Vec<Handle>) {
    adopt(parent, &nodes);
    let old = mem::replace(&mut *parent.children.borrow_mut(), nodes);
    for node in old {
        node.parent.set(None);
    }
}

/// Replace the child of `parent` at `index` with `nodes`.
pub(crate) fn replace_child(parent: &Handle, index: usize, nodes: Vec<Handle>) {
    adopt(parent, &nodes);
    let removed: Vec<Handle> = parent
        .children
        .borrow_mut()
        .splice(index..=index, nodes)
        .collect();
    for node in removed {
        node.parent.set(None);
    }
}

fn adopt(parent: &Handle, nodes: &[Handle]) {
    for node in nodes {
        node.parent.set(Some(Rc::downgrade(parent)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn round_trip(html: &str) -> String {
        Fragment::parse(html).to_html().unwrap()
    }

    #[test]
    fn test_round_trip_plain_markup() {
        let html = indoc! {r#"
            <h1 id="top">Title</h1>
            <p class="lead">Some <em>text</em> &amp; more.</p>
            <ul>
              <li><a href="/posts/one/">One</a></li>
            </ul>
        "#};
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let html = r#"<p>a<br>b</p><img src="x.png" alt="x"><hr>"#;
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_unclosed_tags_are_closed() {
        assert_eq!(round_trip("<p><b>bold"), "<p><b>bold</b></p>");
        assert_eq!(round_trip("text</div>"), "text");
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_pre_leading_blank_line_survives() {
        let html = "<pre>\n\nindented</pre><textarea>\n\nnote</textarea>";
        assert_eq!(round_trip(html), html);
        assert_eq!(round_trip(&round_trip(html)), html);
    }

    #[test]
    fn test_pre_single_leading_newline_is_dropped() {
        assert_eq!(round_trip("<pre>\ncode</pre>"), "<pre>code</pre>");
    }

    #[test]
    fn test_document_keeps_its_structure() {
        let html = indoc! {r#"
            <!DOCTYPE html>
            <html lang="en"><head><meta charset="utf-8"><title>T</title></head><body><p>x</p></body></html>"#};
        let fragment = Fragment::parse(html);
        assert!(fragment.is_document());
        assert_eq!(
            fragment.to_html().unwrap(),
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>T</title></head><body><p>x</p></body></html>"#
        );
    }

    #[test]
    fn test_document_detection() {
        assert!(looks_like_document("<!doctype html><p>x"));
        assert!(looks_like_document("\u{feff}\n  <!DOCTYPE html>"));
        assert!(looks_like_document("<HTML lang=\"en\">"));
        assert!(looks_like_document("<html>"));
        assert!(!looks_like_document("<htmlish>"));
        assert!(!looks_like_document("<p>text</p><html>"));
        assert!(!looks_like_document(""));
    }

    #[test]
    fn test_html_without_head_gets_one() {
        assert_eq!(
            round_trip("<html><body><p>x</p></body></html>"),
            "<html><head></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_walk_can_skip_subtrees() {
        let fragment = Fragment::parse("<div><p>a</p></div><p>b</p>");
        let mut seen = Vec::new();
        fragment.walk(|node| {
            if let Some(name) = element_name(node) {
                seen.push(name.local.to_string());
            }
            !is_element(node, "div")
        });
        assert_eq!(seen, ["div", "p"]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let fragment = Fragment::parse("<div><p>a</p><pre>b</pre></div><pre>c</pre>");
        let names: Vec<String> = fragment
            .descendants()
            .iter()
            .filter_map(|n| element_name(n).map(|q| q.local.to_string()))
            .collect();
        assert_eq!(names, ["div", "p", "pre", "pre"]);
    }

    #[test]
    fn test_text_content_of_element() {
        let fragment = Fragment::parse("<code>a <b>b</b><!-- c --> d</code>");
        let code = fragment.descendants()[0].clone();
        assert_eq!(text_content(&code), "a b d");
    }

    #[test]
    fn test_replace_children_parses_markup() {
        let fragment = Fragment::parse(r#"<pre class="x"><code>old</code></pre>"#);
        let code = fragment
            .descendants()
            .into_iter()
            .find(|n| is_element(n, "code"))
            .unwrap();
        let context = element_name(&code).unwrap().clone();
        replace_children(&code, parse_nodes("<span>new</span> &amp; more", context));
        assert_eq!(
            fragment.to_html().unwrap(),
            r#"<pre class="x"><code><span>new</span> &amp; more</code></pre>"#
        );
    }
}
