//! EDMX metadata documents (OData CSDL v3 and v4).
//!
//! ```text
//! $metadata bytes ──Edmx::read──▶ SchemaTree ──resolve──▶ ResolvedModel
//! ```
//!
//! The reader is deliberately shallow: it maps elements to the raw tree and
//! leaves every semantic check to [`SchemaModel::normalize`](crate::schema::SchemaModel::normalize).

mod error;
mod reader;

use std::path::Path;

use tracing::debug;

pub use error::EdmxError;

use crate::config::GenerationConfig;
use crate::resolve::{ResolvedModel, resolve};
use crate::schema::SchemaTree;
use reader::EdmxReader;

/// A parsed EDMX document.
#[derive(Clone, Debug, PartialEq)]
pub struct Edmx {
    /// `Version` of the root `<edmx:Edmx>` element (`"1.0"` for v3,
    /// `"4.0"` for v4). `None` for a bare `<Schema>` document.
    pub version: Option<String>,
    pub tree: SchemaTree,
}

impl Edmx {
    /// Parse a document from bytes.
    pub fn read(input: &[u8]) -> Result<Self, EdmxError> {
        let (tree, version) = EdmxReader::new().read(input)?;
        debug!(
            "Read EDMX {} with {} schema(s)",
            version.as_deref().unwrap_or("(no version)"),
            tree.schemas.len()
        );
        Ok(Self { version, tree })
    }

    /// Parse a document from a file.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Self, EdmxError> {
        let path = path.as_ref();
        debug!("Reading EDMX from {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::read(&bytes)
    }

    pub fn into_tree(self) -> SchemaTree {
        self.tree
    }
}

/// Read and resolve a document in one step.
pub fn resolve_edmx(input: &[u8], config: &GenerationConfig) -> Result<ResolvedModel, EdmxError> {
    let edmx = Edmx::read(input)?;
    Ok(resolve(&edmx.tree, config)?)
}
