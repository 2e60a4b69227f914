//! Typed views over content items.

use std::cell::OnceCell;

use chrono::{DateTime, FixedOffset};

use crate::error::ContentError;
use crate::item::Item;
use crate::link::LinkRenderer;
use crate::section::Section;
use crate::timestamp::{DATE_FORMAT, parse_timestamp};

/// Attribute holding a post's creation time.
pub const TIMESTAMP_ATTRIBUTE: &str = "now";

/// Attribute holding an item's title.
pub const TITLE_ATTRIBUTE: &str = "title";

/// Accessors shared by every view.
pub trait ContentView {
    /// The underlying record.
    fn item(&self) -> &Item;

    /// Output path of the item.
    fn url(&self) -> Option<&str> {
        self.item().path()
    }

    fn title(&self) -> Option<&str> {
        self.item().str_attribute(TITLE_ATTRIBUTE)
    }

    /// Anchor to the item labelled with its title, or its identifier when untitled.
    fn link(&self, renderer: &dyn LinkRenderer) -> String {
        let label = self.title().unwrap_or(self.item().identifier());
        renderer.link_to(label, self.item())
    }
}

/// A dated entry from the `/posts/` namespace.
#[derive(Debug, Clone)]
pub struct Post<'a> {
    item: &'a Item,
    created: OnceCell<DateTime<FixedOffset>>,
}

impl<'a> Post<'a> {
    /// All posts among `items`, most recent first.
    ///
    /// Posts created at the same instant keep their input order. A post with a
    /// missing or malformed timestamp fails the whole listing.
    pub fn all<I>(items: I) -> Result<Vec<Post<'a>>, ContentError>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut dated = Vec::new();
        for post in items.into_iter().filter_map(Post::of) {
            dated.push((post.creation_time()?, post));
        }

        dated.sort_by(|(a, _), (b, _)| b.cmp(a));
        tracing::debug!(count = dated.len(), "collected posts");

        Ok(dated.into_iter().map(|(_, post)| post).collect())
    }

    /// View `item` as a post, if it lives in the posts namespace.
    pub fn of(item: &'a Item) -> Option<Post<'a>> {
        Section::Posts.contains(item.identifier()).then(|| Post {
            item,
            created: OnceCell::new(),
        })
    }

    /// Creation time, parsed on first successful access and cached afterwards.
    pub fn creation_time(&self) -> Result<DateTime<FixedOffset>, ContentError> {
        if let Some(time) = self.created.get() {
            return Ok(*time);
        }
        let time = self.parse_creation_time()?;
        Ok(*self.created.get_or_init(|| time))
    }

    /// Creation date in long form, e.g. `Tuesday 05 March 2024`.
    pub fn date(&self) -> Result<String, ContentError> {
        Ok(self.creation_time()?.format(DATE_FORMAT).to_string())
    }

    fn parse_creation_time(&self) -> Result<DateTime<FixedOffset>, ContentError> {
        let identifier = self.item.identifier();
        let value = self.item.attribute(TIMESTAMP_ATTRIBUTE).ok_or_else(|| {
            ContentError::MissingAttribute {
                identifier: identifier.to_string(),
                attribute: TIMESTAMP_ATTRIBUTE,
            }
        })?;

        value
            .as_str()
            .and_then(parse_timestamp)
            .ok_or_else(|| ContentError::InvalidTimestamp {
                identifier: identifier.to_string(),
                value: value.to_string(),
            })
    }
}

impl ContentView for Post<'_> {
    fn item(&self) -> &Item {
        self.item
    }
}

/// An undated entry from the `/projects/` namespace.
#[derive(Debug, Clone, Copy)]
pub struct Project<'a> {
    item: &'a Item,
}

impl<'a> Project<'a> {
    /// All projects among `items`, in discovery order.
    pub fn all<I>(items: I) -> Vec<Project<'a>>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items.into_iter().filter_map(Project::of).collect()
    }

    /// View `item` as a project, if it lives in the projects namespace.
    pub fn of(item: &'a Item) -> Option<Project<'a>> {
        Section::Projects
            .contains(item.identifier())
            .then_some(Project { item })
    }
}

impl ContentView for Project<'_> {
    fn item(&self) -> &Item {
        self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::HtmlLinkRenderer;

    fn post(id: &str, now: &str) -> Item {
        Item::new(format!("/posts/{id}/"))
            .with_attribute(TITLE_ATTRIBUTE, id)
            .with_attribute(TIMESTAMP_ATTRIBUTE, now)
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let items = vec![
            post("t2", "2024-02-01"),
            post("t1", "2024-01-01"),
            Item::new("/about/"),
            post("t3", "2024-03-01"),
        ];
        let titles: Vec<_> = Post::all(&items)
            .unwrap()
            .iter()
            .map(|p| p.title().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["t3", "t2", "t1"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![
            post("a", "2024-01-01 12:00:00"),
            post("b", "2024-01-01T13:00:00+01:00"),
            post("c", "2024-01-01 12:00:00 +0000"),
        ];
        let titles: Vec<_> = Post::all(&items)
            .unwrap()
            .iter()
            .map(|p| p.title().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn test_creation_time_is_cached() {
        let item = post("x", "2024-03-05 10:00:00 +0100");
        let view = Post::of(&item).unwrap();
        assert!(view.created.get().is_none());

        let first = view.creation_time().unwrap();
        assert_eq!(view.created.get(), Some(&first));
        assert_eq!(view.creation_time().unwrap(), first);
    }

    #[test]
    fn test_date_is_long_form() {
        let item = post("x", "2024-03-05 23:30:00 +0100");
        assert_eq!(Post::of(&item).unwrap().date().unwrap(), "Tuesday 05 March 2024");
    }

    #[test]
    fn test_missing_timestamp_fails() {
        let items = vec![post("ok", "2024-01-01"), Item::new("/posts/undated/")];
        let err = Post::all(&items).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingAttribute { attribute: TIMESTAMP_ATTRIBUTE, .. }
        ));
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let item = post("bad", "sometime last week");
        let err = Post::of(&item).unwrap().creation_time().unwrap_err();
        assert!(matches!(err, ContentError::InvalidTimestamp { .. }));

        let numeric = Item::new("/posts/n/").with_attribute(TIMESTAMP_ATTRIBUTE, 1_700_000_000);
        let err = Post::of(&numeric).unwrap().date().unwrap_err();
        assert!(matches!(err, ContentError::InvalidTimestamp { ref value, .. } if value == "1700000000"));
    }

    #[test]
    fn test_projects_keep_discovery_order() {
        let items = vec![
            Item::new("/projects/zeta/"),
            Item::new("/posts/p/"),
            Item::new("/projects/alpha/"),
        ];
        let ids: Vec<_> = Project::all(&items)
            .iter()
            .map(|p| p.item().identifier().to_string())
            .collect();
        assert_eq!(ids, ["/projects/zeta/", "/projects/alpha/"]);
    }

    #[test]
    fn test_of_outside_namespace_is_none() {
        let page = Item::new("/about/");
        assert!(Post::of(&page).is_none());
        assert!(Project::of(&page).is_none());
    }

    #[test]
    fn test_view_accessors() {
        let item = Item::new("/projects/tinct/")
            .with_attribute(TITLE_ATTRIBUTE, "tinct")
            .with_path("/projects/tinct/index.html");
        let project = Project::of(&item).unwrap();

        assert_eq!(project.url(), Some("/projects/tinct/index.html"));
        assert_eq!(project.title(), Some("tinct"));
        assert_eq!(
            project.link(&HtmlLinkRenderer),
            r#"<a href="/projects/tinct/index.html">tinct</a>"#
        );
    }

    #[test]
    fn test_untitled_link_uses_identifier() {
        let item = Item::new("/posts/untitled/").with_attribute(TIMESTAMP_ATTRIBUTE, "2024-01-01");
        let view = Post::of(&item).unwrap();
        assert_eq!(view.link(&HtmlLinkRenderer), r#"<a href="/posts/untitled/">/posts/untitled/</a>"#);
    }
}
