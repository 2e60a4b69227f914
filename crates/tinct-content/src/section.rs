//! Identifier namespaces that select a content view.

/// The namespace an item's identifier falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Dated, chronological entries under `/posts/`.
    Posts,
    /// Undated project pages under `/projects/`.
    Projects,
}

impl Section {
    /// Identifier prefix of the namespace.
    pub fn prefix(self) -> &'static str {
        match self {
            Section::Posts => "/posts/",
            Section::Projects => "/projects/",
        }
    }

    /// Classify an identifier. Most identifiers belong to neither namespace.
    pub fn of(identifier: &str) -> Option<Section> {
        [Section::Posts, Section::Projects]
            .into_iter()
            .find(|section| identifier.starts_with(section.prefix()))
    }

    pub fn contains(self, identifier: &str) -> bool {
        identifier.starts_with(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Section::of("/posts/hello/"), Some(Section::Posts));
        assert_eq!(Section::of("/projects/tinct/"), Some(Section::Projects));
        assert_eq!(Section::of("/about/"), None);
        assert_eq!(Section::of("/posts"), None);
        assert_eq!(Section::of("/drafts/posts/x/"), None);
    }
}
