//! Error types for EDMX reading.

use thiserror::Error;

use crate::resolve::ResolveError;

/// Errors that can occur while reading an EDMX document.
#[derive(Debug, Error)]
pub enum EdmxError {
    /// Malformed XML.
    #[error("XML error at position {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("invalid UTF-8 in metadata: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document contains no `<Schema>` element.
    #[error("no <Schema> element found in metadata")]
    MissingSchema,

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// The document was read but could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl EdmxError {
    pub fn xml(position: u64, message: impl Into<String>) -> Self {
        Self::Xml {
            position,
            message: message.into(),
        }
    }
}
