//! Errors raised while projecting content records.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// A record lacks an attribute its view requires.
    #[error("{identifier} has no `{attribute}` attribute")]
    MissingAttribute {
        identifier: String,
        attribute: &'static str,
    },

    /// A creation timestamp could not be parsed.
    #[error("{identifier}: cannot parse timestamp {value:?}")]
    InvalidTimestamp { identifier: String, value: String },
}
