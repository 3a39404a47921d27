//! Foundation types for the edmgen toolchain.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`QualifiedName`] - `Namespace.LocalName` identity of a declaration
//! - [`Nullability`] - Three-valued nullability of a property
//! - [`SchemaAliases`] - Schema alias expansion for type references
//! - [`Diagnostic`], [`Diagnostics`] - Recoverable warnings collected during a run
//!
//! This module has NO dependencies on other edmgen modules.

mod diagnostics;
mod name;

pub use diagnostics::{Diagnostic, Diagnostics, Severity, codes};
pub use name::{EDM_NAMESPACE, Nullability, QualifiedName, SchemaAliases, split_qualified};
