//! Content records as supplied by the site's content provider.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One content item: identifier, attributes and resolved output path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    identifier: String,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default)]
    path: Option<String>,
}

impl Item {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            attributes: Map::new(),
            path: None,
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the output path of the item's first rendition.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// A string attribute; `None` when absent or not a string.
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    /// Output path of the item, if it is written anywhere.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Find the item with exactly this identifier.
pub fn find_by_identifier<'a>(items: &'a [Item], identifier: &str) -> Option<&'a Item> {
    items.iter().find(|item| item.identifier == identifier)
}
