//! Raw schema tree: the input boundary of the engine.
//!
//! These value objects mirror the EDMX document structure one-to-one and carry
//! no semantics beyond what the document says: names are plain strings, type
//! references are unparsed, and nothing has been checked for uniqueness.
//! Whoever tokenizes the XML (see `crate::edmx`) produces a [`SchemaTree`];
//! [`SchemaModel::normalize`](super::SchemaModel::normalize) turns it into the
//! normalized model.
//!
//! Builder helpers make it easy to assemble trees in code:
//!
//! ```
//! use edmgen::schema::raw::{RawEntityType, RawProperty, RawSchema, SchemaTree};
//!
//! let tree = SchemaTree::new().with_schema(
//!     RawSchema::new("Sales").with_entity(
//!         RawEntityType::new("Order")
//!             .with_key("ID")
//!             .with_property(RawProperty::new("ID", "Edm.Int32").not_nullable()),
//!     ),
//! );
//! assert_eq!(tree.schemas.len(), 1);
//! ```

use crate::base::Nullability;

/// A parsed metadata document: one entry per `<Schema>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaTree {
    pub schemas: Vec<RawSchema>,
}

impl SchemaTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema.
    pub fn with_schema(mut self, schema: RawSchema) -> Self {
        self.schemas.push(schema);
        self
    }
}

/// A `<Schema>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSchema {
    /// `Namespace` attribute.
    pub namespace: String,
    /// `Alias` attribute, usable in place of the namespace in type references.
    pub alias: Option<String>,
    pub entity_types: Vec<RawEntityType>,
    pub complex_types: Vec<RawComplexType>,
    pub enum_types: Vec<RawEnumType>,
    /// EDM v3 `<Association>` elements.
    pub associations: Vec<RawAssociation>,
}

impl RawSchema {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_entity(mut self, entity: RawEntityType) -> Self {
        self.entity_types.push(entity);
        self
    }

    pub fn with_complex(mut self, complex: RawComplexType) -> Self {
        self.complex_types.push(complex);
        self
    }

    pub fn with_enum(mut self, enum_type: RawEnumType) -> Self {
        self.enum_types.push(enum_type);
        self
    }

    pub fn with_association(mut self, association: RawAssociation) -> Self {
        self.associations.push(association);
        self
    }
}

/// An `<EntityType>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEntityType {
    pub name: String,
    pub base_type: Option<String>,
    /// `<Key><PropertyRef Name=".."/></Key>` names, in document order.
    pub keys: Vec<String>,
    pub properties: Vec<RawProperty>,
    pub navigation: Vec<RawNavigation>,
}

impl RawEntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    pub fn with_property(mut self, property: RawProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_navigation(mut self, navigation: RawNavigation) -> Self {
        self.navigation.push(navigation);
        self
    }
}

/// A `<ComplexType>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawComplexType {
    pub name: String,
    pub base_type: Option<String>,
    pub properties: Vec<RawProperty>,
    pub navigation: Vec<RawNavigation>,
}

impl RawComplexType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    pub fn with_property(mut self, property: RawProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_navigation(mut self, navigation: RawNavigation) -> Self {
        self.navigation.push(navigation);
        self
    }
}

/// An `<EnumType>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEnumType {
    pub name: String,
    /// `UnderlyingType` attribute (e.g. `Edm.Int64`).
    pub underlying_type: Option<String>,
    /// `IsFlags="true"`.
    pub is_flags: bool,
    pub members: Vec<RawEnumMember>,
}

impl RawEnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mark as a flags (bit-union) enum.
    pub fn flags(mut self) -> Self {
        self.is_flags = true;
        self
    }

    pub fn with_underlying(mut self, underlying_type: impl Into<String>) -> Self {
        self.underlying_type = Some(underlying_type.into());
        self
    }

    /// Add a member without an explicit value.
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.members.push(RawEnumMember {
            name: name.into(),
            value: None,
        });
        self
    }

    /// Add a member with an explicit (unparsed) value.
    pub fn with_member_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.push(RawEnumMember {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }
}

/// A `<Member>` of an enum type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEnumMember {
    pub name: String,
    pub value: Option<String>,
}

/// A `<Property>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawProperty {
    pub name: String,
    /// `Type` attribute, e.g. `Edm.String` or `Collection(Sales.Item)`.
    pub type_ref: String,
    pub nullable: Nullability,
}

impl RawProperty {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            nullable: Nullability::Unspecified,
        }
    }

    /// `Nullable="true"`.
    pub fn nullable(mut self) -> Self {
        self.nullable = Nullability::Nullable;
        self
    }

    /// `Nullable="false"`.
    pub fn not_nullable(mut self) -> Self {
        self.nullable = Nullability::NotNullable;
        self
    }
}

/// A `<NavigationProperty>` element.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNavigation {
    pub name: String,
    pub target: RawNavigationTarget,
}

/// The two ways EDM versions describe a navigation target.
#[derive(Clone, Debug, PartialEq)]
pub enum RawNavigationTarget {
    /// EDM v4: the target type is stated directly.
    Typed {
        type_ref: String,
        nullable: Nullability,
        partner: Option<String>,
    },
    /// EDM v3: the target is found through an `<Association>` end.
    Association {
        relationship: String,
        from_role: String,
        to_role: String,
    },
}

impl RawNavigation {
    /// A v4 navigation property with an explicit `Type`.
    pub fn typed(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: RawNavigationTarget::Typed {
                type_ref: type_ref.into(),
                nullable: Nullability::Unspecified,
                partner: None,
            },
        }
    }

    /// A v3 navigation property going through an association.
    pub fn association(
        name: impl Into<String>,
        relationship: impl Into<String>,
        from_role: impl Into<String>,
        to_role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: RawNavigationTarget::Association {
                relationship: relationship.into(),
                from_role: from_role.into(),
                to_role: to_role.into(),
            },
        }
    }

    /// Set `Nullable` (v4 only; ignored for association targets).
    pub fn with_nullable(mut self, value: Nullability) -> Self {
        if let RawNavigationTarget::Typed { nullable, .. } = &mut self.target {
            *nullable = value;
        }
        self
    }

    /// Set `Partner` (v4 only; ignored for association targets).
    pub fn with_partner(mut self, value: impl Into<String>) -> Self {
        if let RawNavigationTarget::Typed { partner, .. } = &mut self.target {
            *partner = Some(value.into());
        }
        self
    }
}

/// An EDM v3 `<Association>` element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAssociation {
    pub name: String,
    pub ends: Vec<RawAssociationEnd>,
}

impl RawAssociation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ends: Vec::new(),
        }
    }

    pub fn with_end(
        mut self,
        role: impl Into<String>,
        type_ref: impl Into<String>,
        multiplicity: impl Into<String>,
    ) -> Self {
        self.ends.push(RawAssociationEnd {
            role: role.into(),
            type_ref: type_ref.into(),
            multiplicity: multiplicity.into(),
        });
        self
    }
}

/// An association `<End>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAssociationEnd {
    pub role: String,
    pub type_ref: String,
    /// `*`, `0..1` or `1`.
    pub multiplicity: String,
}
