//! Normalized schema model.
//!
//! ```text
//! SchemaModel
//! ├── namespaces: IndexMap<namespace, Namespace>   (document order)
//! │   ├── declarations: IndexMap<local, TypeDeclaration>
//! │   ├── enums:        IndexMap<local, EnumType>
//! │   └── associations: IndexMap<local, Association>   (EDM v3)
//! └── aliases: schema alias → namespace
//! ```
//!
//! Built once by [`SchemaModel::normalize`] and immutable afterwards.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::base::{Nullability, QualifiedName, SchemaAliases};

// ============================================================================
// MODEL
// ============================================================================

/// All declarations of one schema load.
#[derive(Clone, Debug, Default)]
pub struct SchemaModel {
    pub(super) namespaces: IndexMap<Arc<str>, Namespace>,
    pub(super) aliases: SchemaAliases,
}

/// A declaration found by qualified name.
#[derive(Clone, Copy, Debug)]
pub enum Declared<'a> {
    Type(&'a TypeDeclaration),
    Enum(&'a EnumType),
}

impl SchemaModel {
    /// Namespaces in document order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Every entity and complex type, namespace by namespace.
    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.namespaces.values().flat_map(|ns| ns.declarations.values())
    }

    /// Every enum type, namespace by namespace.
    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.namespaces.values().flat_map(|ns| ns.enums.values())
    }

    /// Every association, namespace by namespace.
    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.namespaces.values().flat_map(|ns| ns.associations.values())
    }

    /// Number of entity, complex and enum declarations.
    pub fn declaration_count(&self) -> usize {
        self.namespaces
            .values()
            .map(|ns| ns.declarations.len() + ns.enums.len())
            .sum()
    }

    /// Schema alias → namespace map.
    pub fn aliases(&self) -> &SchemaAliases {
        &self.aliases
    }

    /// Map a reference qualifier to its namespace, expanding schema aliases.
    pub fn canonical_namespace<'a>(&'a self, qualifier: &'a str) -> &'a str {
        self.aliases.canonical_namespace(qualifier)
    }

    /// Qualify a possibly-unqualified, possibly-aliased reference against
    /// `context_namespace`.
    pub fn qualify(&self, reference: &str, context_namespace: &str) -> QualifiedName {
        self.aliases.qualify(reference, context_namespace)
    }

    pub fn declaration(&self, name: &QualifiedName) -> Option<&TypeDeclaration> {
        self.namespaces
            .get(name.namespace())?
            .declarations
            .get(name.name())
    }

    pub fn enum_type(&self, name: &QualifiedName) -> Option<&EnumType> {
        self.namespaces.get(name.namespace())?.enums.get(name.name())
    }

    pub fn association(&self, name: &QualifiedName) -> Option<&Association> {
        self.namespaces
            .get(name.namespace())?
            .associations
            .get(name.name())
    }

    /// Look up any entity, complex or enum declaration.
    pub fn lookup(&self, name: &QualifiedName) -> Option<Declared<'_>> {
        if let Some(decl) = self.declaration(name) {
            return Some(Declared::Type(decl));
        }
        self.enum_type(name).map(Declared::Enum)
    }
}

/// One namespace and everything declared in it.
#[derive(Clone, Debug)]
pub struct Namespace {
    pub(super) name: Arc<str>,
    pub(super) alias: Option<Arc<str>>,
    pub(super) declarations: IndexMap<Arc<str>, TypeDeclaration>,
    pub(super) enums: IndexMap<Arc<str>, EnumType>,
    pub(super) associations: IndexMap<Arc<str>, Association>,
}

impl Namespace {
    pub(super) fn new(name: Arc<str>) -> Self {
        Self {
            name,
            alias: None,
            declarations: IndexMap::new(),
            enums: IndexMap::new(),
            associations: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Schema alias declared for this namespace, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.enums.values()
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    /// Local names of everything declared here (types and enums).
    pub fn local_names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.declarations.keys().chain(self.enums.keys())
    }

    pub(super) fn contains(&self, local: &str) -> Option<&'static str> {
        if let Some(decl) = self.declarations.get(local) {
            Some(decl.kind.display())
        } else if self.enums.contains_key(local) {
            Some("EnumType")
        } else {
            None
        }
    }
}

// ============================================================================
// TYPE DECLARATIONS
// ============================================================================

/// An entity or complex type.
///
/// Both kinds share the same shape; entities additionally own their keys.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDeclaration {
    pub name: QualifiedName,
    /// Raw base type reference (qualified or aliased), if any.
    pub base_type: Option<Arc<str>>,
    pub properties: Vec<Property>,
    pub navigation: Vec<NavigationReference>,
    pub kind: DeclarationKind,
}

/// Entity vs complex type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Entity { keys: Vec<Arc<str>> },
    Complex,
}

impl DeclarationKind {
    pub fn display(&self) -> &'static str {
        match self {
            Self::Entity { .. } => "EntityType",
            Self::Complex => "ComplexType",
        }
    }
}

impl TypeDeclaration {
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, DeclarationKind::Entity { .. })
    }

    /// Key property names (empty for complex types).
    pub fn keys(&self) -> &[Arc<str>] {
        match &self.kind {
            DeclarationKind::Entity { keys } => keys,
            DeclarationKind::Complex => &[],
        }
    }

    pub fn is_key(&self, property: &str) -> bool {
        self.keys().iter().any(|k| &**k == property)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| &*p.name == name)
    }
}

/// A structural property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: Arc<str>,
    /// Raw type reference, e.g. `Edm.String` or `Collection(Sales.Item)`.
    pub type_ref: Arc<str>,
    pub nullability: Nullability,
}

/// A navigation property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationReference {
    pub name: Arc<str>,
    /// Raw type reference. `None` when an association-based target could not
    /// be resolved.
    pub type_ref: Option<Arc<str>>,
    pub nullability: Nullability,
    /// v4 `Partner` attribute.
    pub partner: Option<Arc<str>>,
    /// v3 association the target was derived from.
    pub association: Option<AssociationLink>,
}

/// v3 link from a navigation property to an association.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssociationLink {
    pub relationship: QualifiedName,
    pub from_role: Arc<str>,
    pub to_role: Arc<str>,
}

// ============================================================================
// ENUMS
// ============================================================================

/// An enumeration type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: QualifiedName,
    /// Raw `UnderlyingType`; `None` means `Edm.Int32`.
    pub underlying_type: Option<Arc<str>>,
    pub is_flags: bool,
    pub members: Vec<EnumMember>,
}

/// An enum member with its raw (unparsed) value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: Arc<str>,
    pub value: Option<Arc<str>>,
}

// ============================================================================
// ASSOCIATIONS (EDM v3)
// ============================================================================

/// An EDM v3 association between two entity types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Association {
    pub name: QualifiedName,
    pub ends: Vec<AssociationEnd>,
}

impl Association {
    pub fn end(&self, role: &str) -> Option<&AssociationEnd> {
        self.ends.iter().find(|e| &*e.role == role)
    }
}

/// One end of an association.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssociationEnd {
    pub role: Arc<str>,
    pub type_ref: Arc<str>,
    pub multiplicity: Multiplicity,
}

/// Association end multiplicity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// `1`
    One,
    /// `0..1`
    ZeroOrOne,
    /// `*` or `0..*`
    Many,
}

impl Multiplicity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(Self::One),
            "0..1" => Some(Self::ZeroOrOne),
            "*" | "0..*" => Some(Self::Many),
            _ => None,
        }
    }
}
