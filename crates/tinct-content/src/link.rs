//! Anchor rendering for content views.

use tinct::html_escape;

use crate::item::Item;

/// Renders an anchor pointing at an item.
pub trait LinkRenderer {
    fn link_to(&self, label: &str, target: &Item) -> String;
}

/// `<a href="path">label</a>` with both parts escaped.
///
/// Items without an output path link to their identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkRenderer;

impl LinkRenderer for HtmlLinkRenderer {
    fn link_to(&self, label: &str, target: &Item) -> String {
        let href = target.path().unwrap_or(target.identifier());
        format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(href),
            html_escape(label)
        )
    }
}
