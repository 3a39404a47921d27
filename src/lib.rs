//! # edmgen-base
//!
//! Core library for EDM schema normalization, type resolution and enum codec
//! planning. Renderers (Rust, TypeScript, Go, ...) sit on top of the
//! [`ResolvedModel`] this crate produces and never look at raw metadata.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! edmx      → EDMX (CSDL v3/v4) reader → SchemaTree          [interchange]
//!   ↓
//! resolve   → namespaces, type descriptors, dependencies, enum plans
//!   ↓
//! schema    → raw input tree, normalized SchemaModel
//!   ↓
//! config    → GenerationConfig (qualification, decimal encoding)
//!   ↓
//! base      → QualifiedName, Nullability, Diagnostics
//! ```

// ============================================================================
// MODULES (dependency order: base → config → schema → resolve → edmx)
// ============================================================================

/// Foundation types: qualified names, nullability, diagnostics
pub mod base;

/// Generation options and their file formats
pub mod config;

/// Raw schema tree and the normalized schema model
pub mod schema;

/// Type resolution, dependency graph, enum planning
pub mod resolve;

/// EDMX metadata reader
#[cfg(feature = "interchange")]
pub mod edmx;

// Re-export the pipeline entry points
pub use config::GenerationConfig;
pub use resolve::{ResolveError, ResolvedModel, resolve};
pub use schema::{SchemaModel, SchemaTree};

#[cfg(feature = "interchange")]
pub use edmx::{Edmx, EdmxError, resolve_edmx};

// Re-export foundation types
pub use base::{Diagnostic, Diagnostics, Nullability, QualifiedName};
