//! Schema Model: raw input tree and normalized declarations.
//!
//! ```text
//! SchemaTree (raw, as parsed)  ──normalize──▶  SchemaModel (immutable)
//! ```
//!
//! The raw tree is what an external reader produces; the model is what every
//! resolution step consumes. See [`raw`] for the input boundary and
//! [`SchemaModel::normalize`] for the rules applied on the way in.

mod error;
mod model;
mod normalize;
pub mod raw;

pub use error::SchemaError;
pub use model::{
    Association, AssociationEnd, AssociationLink, DeclarationKind, Declared, EnumMember, EnumType,
    Multiplicity, Namespace, NavigationReference, Property, SchemaModel, TypeDeclaration,
};
pub use raw::SchemaTree;
