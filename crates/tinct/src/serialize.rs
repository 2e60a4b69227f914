//! Tree serialization that round-trips `<pre>` leading newlines.
//!
//! The HTML5 parser drops a newline directly after the start tag of `pre`,
//! `textarea` and `listing`, and the stock serializer never writes one back,
//! so `<pre>\n\nx</pre>` would lose a line on every pass.

use std::io;

use html5ever::serialize::{Serialize, Serializer, TraversalScope};
use markup5ever_rcdom::{Handle, NodeData};

use crate::fragment::HTML_NAMESPACE;

/// Serializable view of a node and its subtree.
pub(crate) struct Markup<'a>(pub(crate) &'a Handle);

enum Op {
    Open(Handle),
    Close(html5ever::QualName),
}

impl Serialize for Markup<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        // Reversed: the next node to write is at the end.
        let mut ops: Vec<Op> = match traversal_scope {
            TraversalScope::IncludeNode => vec![Op::Open(self.0.clone())],
            TraversalScope::ChildrenOnly(_) => self
                .0
                .children
                .borrow()
                .iter()
                .rev()
                .map(|child| Op::Open(child.clone()))
                .collect(),
        };

        while let Some(op) = ops.pop() {
            let handle = match op {
                Op::Open(handle) => handle,
                Op::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
            };

            match &handle.data {
                NodeData::Element { name, attrs, .. } => {
                    serializer.start_elem(
                        name.clone(),
                        attrs.borrow().iter().map(|at| (&at.name, &at.value[..])),
                    )?;
                    if drops_leading_newline(&handle) {
                        serializer.write_text("\n")?;
                    }

                    ops.push(Op::Close(name.clone()));
                    ops.extend(
                        handle
                            .children
                            .borrow()
                            .iter()
                            .rev()
                            .map(|child| Op::Open(child.clone())),
                    );
                }
                NodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
                NodeData::Text { contents } => serializer.write_text(&contents.borrow())?,
                NodeData::Comment { contents } => serializer.write_comment(contents)?,
                NodeData::ProcessingInstruction { target, contents } => {
                    serializer.write_processing_instruction(target, contents)?
                }
                // Only reachable as the root, which ChildrenOnly never writes.
                NodeData::Document => {}
            }
        }

        Ok(())
    }
}

/// True if a reparse would eat the first newline of this element's text.
fn drops_leading_newline(node: &Handle) -> bool {
    let NodeData::Element { name, .. } = &node.data else {
        return false;
    };
    if &*name.ns != HTML_NAMESPACE || !matches!(&*name.local, "pre" | "textarea" | "listing") {
        return false;
    }

    match node.children.borrow().first().map(|child| &child.data) {
        Some(NodeData::Text { contents }) => contents.borrow().starts_with('\n'),
        _ => false,
    }
}
