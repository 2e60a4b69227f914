//! Typed, ordered views over static site content.
//!
//! Listing pages need content grouped by kind: dated posts newest first,
//! projects in the order they were found. Items are classified by identifier
//! namespace ([`Section`]) and wrapped in read-only views ([`Post`],
//! [`Project`]) that expose what templates need: title, URL, a rendered link
//! and, for posts, the creation date.
//!
//! ```rust
//! use tinct_content::{ContentView, HtmlLinkRenderer, Item, Post};
//!
//! let items = vec![
//!     Item::new("/posts/old/").with_attribute("title", "Old").with_attribute("now", "2010-01-01"),
//!     Item::new("/posts/new/").with_attribute("title", "New").with_attribute("now", "2011-01-01"),
//!     Item::new("/about/"),
//! ];
//!
//! let posts = Post::all(&items).unwrap();
//! assert_eq!(posts[0].title(), Some("New"));
//! assert_eq!(posts[0].date().unwrap(), "Saturday 01 January 2011");
//! assert_eq!(posts[1].link(&HtmlLinkRenderer), r#"<a href="/posts/old/">Old</a>"#);
//! ```

mod error;
mod item;
mod link;
mod section;
mod timestamp;
mod view;

pub use error::ContentError;
pub use item::{Item, find_by_identifier};
pub use link::{HtmlLinkRenderer, LinkRenderer};
pub use section::Section;
pub use timestamp::{DATE_FORMAT, parse_timestamp};
pub use view::{ContentView, Post, Project, TIMESTAMP_ATTRIBUTE, TITLE_ATTRIBUTE};
