//! Error types for schema normalization.

use thiserror::Error;

use crate::base::QualifiedName;

/// Fatal conditions that stop a run before any resolution begins.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input tree has no `<Schema>` at all.
    #[error("no <Schema> found in metadata")]
    EmptySchema,

    /// Schemas were found but none declares a type.
    #[error(
        "no declarations found: expected at least one EntityType, ComplexType or EnumType \
         across {namespaces} namespace(s)"
    )]
    NoDeclarations { namespaces: usize },

    /// Namespace + local name is declared twice.
    #[error("duplicate declaration '{name}': already declared as {existing}")]
    DuplicateDeclaration {
        name: QualifiedName,
        existing: &'static str,
    },

    /// A declaration has an empty `Name`.
    #[error("{kind} without a name in namespace '{namespace}'")]
    UnnamedDeclaration {
        kind: &'static str,
        namespace: String,
    },
}
