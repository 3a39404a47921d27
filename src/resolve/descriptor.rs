//! Resolved type descriptors.

use std::fmt;
use std::sync::Arc;

use super::primitive::{PrimitiveKind, PrimitiveRepr};
use crate::base::QualifiedName;

/// What kind of declaration a [`LazyRef`] points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefKind {
    Entity,
    Complex,
    Enum,
    /// The name did not resolve to any declaration.
    Unknown,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Complex => "complex",
            Self::Enum => "enum",
            Self::Unknown => "unknown",
        }
    }
}

/// A reference to a declaration by qualified name.
///
/// Lazy references are never dereferenced during resolution, so cycles in
/// the type graph need no special handling here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LazyRef {
    pub name: QualifiedName,
    pub kind: RefKind,
}

impl LazyRef {
    pub fn new(name: QualifiedName, kind: RefKind) -> Self {
        Self { name, kind }
    }
}

impl fmt::Display for LazyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.name)
    }
}

/// The element type of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Primitive(PrimitiveKind, PrimitiveRepr),
    Enum(QualifiedName),
    /// An entity or complex type.
    Structured(LazyRef),
    /// A name that resolved to nothing. Carries the raw text.
    Unknown(Arc<str>),
}

impl BaseType {
    /// Whether a nullable single value of this type must be wrapped.
    fn needs_wrapper(&self) -> bool {
        match self {
            Self::Primitive(_, PrimitiveRepr::OpaqueString) => false,
            Self::Primitive(kind, PrimitiveRepr::Native) => !kind.is_empty_representable(),
            Self::Enum(_) | Self::Structured(_) => true,
            Self::Unknown(_) => false,
        }
    }
}

/// How a renderer should express nullability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NullabilityStrategy {
    /// Wrap the value in an optional.
    OptionalWrapper,
    /// Render the value as is.
    NoWrapper,
    /// A collection, where "no elements" stands in for null.
    CollectionImpliesNullable,
}

/// A fully resolved type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub base: BaseType,
    pub collection: bool,
    pub nullability: NullabilityStrategy,
}

impl TypeDescriptor {
    /// A single (non-collection) value.
    pub fn single(base: BaseType, nullable: bool) -> Self {
        let nullability = if nullable && base.needs_wrapper() {
            NullabilityStrategy::OptionalWrapper
        } else {
            NullabilityStrategy::NoWrapper
        };
        Self {
            base,
            collection: false,
            nullability,
        }
    }

    /// A collection of `base`.
    pub fn collection(base: BaseType) -> Self {
        Self {
            base,
            collection: true,
            nullability: NullabilityStrategy::CollectionImpliesNullable,
        }
    }

    /// Placeholder for a reference that could not be resolved.
    pub fn unknown(raw: &str) -> Self {
        Self {
            base: BaseType::Unknown(Arc::from(raw)),
            collection: false,
            nullability: NullabilityStrategy::NoWrapper,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.base, BaseType::Unknown(_))
    }

    pub fn is_optional(&self) -> bool {
        self.nullability == NullabilityStrategy::OptionalWrapper
    }

    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.base {
            BaseType::Primitive(kind, _) => Some(kind),
            _ => None,
        }
    }

    /// The declaration this descriptor points at, if any.
    pub fn lazy_ref(&self) -> Option<LazyRef> {
        match &self.base {
            BaseType::Enum(name) => Some(LazyRef::new(name.clone(), RefKind::Enum)),
            BaseType::Structured(lazy) => Some(lazy.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match &self.base {
            BaseType::Primitive(kind, PrimitiveRepr::Native) => kind.to_string(),
            BaseType::Primitive(kind, PrimitiveRepr::OpaqueString) => format!("{kind} as string"),
            BaseType::Enum(name) => name.to_string(),
            BaseType::Structured(lazy) => lazy.name.to_string(),
            BaseType::Unknown(raw) => format!("?{raw}"),
        };
        match self.nullability {
            NullabilityStrategy::CollectionImpliesNullable => write!(f, "Collection({base})"),
            NullabilityStrategy::OptionalWrapper => write!(f, "{base}?"),
            NullabilityStrategy::NoWrapper => f.write_str(&base),
        }
    }
}
