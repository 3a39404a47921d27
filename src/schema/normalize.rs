//! Normalization: raw schema tree to [`SchemaModel`].
//!
//! Runs in three passes:
//!
//! 1. **Registration** - every `<Schema>` is merged into its namespace, aliases
//!    are recorded, and each declaration is checked for a name and for
//!    uniqueness of `Namespace.LocalName`.
//! 2. **Association navigation** - EDM v3 navigation properties are given a
//!    type reference taken from the association end they point at. This needs
//!    every association of every namespace, hence a separate pass.
//! 3. **Key check** - entity keys must name a property of the entity or of
//!    one of its base types.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace};

use super::error::SchemaError;
use super::model::{
    Association, AssociationEnd, AssociationLink, DeclarationKind, EnumMember, EnumType,
    Multiplicity, Namespace, NavigationReference, Property, SchemaModel, TypeDeclaration,
};
use super::raw::{
    RawAssociation, RawNavigation, RawNavigationTarget, RawProperty, RawSchema, SchemaTree,
};
use crate::base::{Diagnostics, Nullability, QualifiedName, codes};

/// Upper bound on base-type chain walks; guards against `A : B : A` cycles.
const MAX_BASE_DEPTH: usize = 64;

impl SchemaModel {
    /// Normalize a raw schema tree.
    ///
    /// Fatal conditions (empty input, duplicate or unnamed declarations) are
    /// returned as [`SchemaError`]; everything recoverable is reported to
    /// `diagnostics` and normalization continues.
    pub fn normalize(tree: &SchemaTree, diagnostics: &mut Diagnostics) -> Result<Self, SchemaError> {
        if tree.schemas.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut model = SchemaModel::default();
        for schema in &tree.schemas {
            model.register_alias(schema);
        }
        for schema in &tree.schemas {
            model.register_schema(schema, diagnostics)?;
        }

        if model.declaration_count() == 0 {
            return Err(SchemaError::NoDeclarations {
                namespaces: model.namespace_count(),
            });
        }

        model.resolve_association_navigation(diagnostics);
        model.check_keys(diagnostics);

        debug!(
            "Normalized {} namespace(s), {} declaration(s), {} association(s)",
            model.namespace_count(),
            model.declaration_count(),
            model.associations().count()
        );
        Ok(model)
    }

    // ========================================================================
    // PASS 1: REGISTRATION
    // ========================================================================

    /// Aliases are registered up front so references in earlier schemas can
    /// use aliases declared by later ones.
    fn register_alias(&mut self, schema: &RawSchema) {
        let ns_name: Arc<str> = Arc::from(schema.namespace.trim());
        let namespace = self.namespace_mut(&ns_name);
        if let Some(alias) = schema.alias.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            let alias: Arc<str> = Arc::from(alias);
            namespace.alias.get_or_insert_with(|| alias.clone());
            self.aliases.register(alias, ns_name);
        }
    }

    fn register_schema(
        &mut self,
        schema: &RawSchema,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), SchemaError> {
        let ns_name: Arc<str> = Arc::from(schema.namespace.trim());

        for raw in &schema.entity_types {
            let name = declared_name(&ns_name, &raw.name, "EntityType")?;
            let decl = TypeDeclaration {
                name,
                base_type: non_empty(raw.base_type.as_deref()),
                properties: raw.properties.iter().map(normalize_property).collect(),
                navigation: raw
                    .navigation
                    .iter()
                    .map(|n| normalize_navigation(n, &ns_name, self))
                    .collect(),
                kind: DeclarationKind::Entity {
                    keys: raw
                        .keys
                        .iter()
                        .map(|k| k.trim())
                        .filter(|k| !k.is_empty())
                        .map(Arc::from)
                        .collect(),
                },
            };
            self.insert_declaration(decl)?;
        }

        for raw in &schema.complex_types {
            let name = declared_name(&ns_name, &raw.name, "ComplexType")?;
            let decl = TypeDeclaration {
                name,
                base_type: non_empty(raw.base_type.as_deref()),
                properties: raw.properties.iter().map(normalize_property).collect(),
                navigation: raw
                    .navigation
                    .iter()
                    .map(|n| normalize_navigation(n, &ns_name, self))
                    .collect(),
                kind: DeclarationKind::Complex,
            };
            self.insert_declaration(decl)?;
        }

        for raw in &schema.enum_types {
            let name = declared_name(&ns_name, &raw.name, "EnumType")?;
            let enum_type = EnumType {
                name,
                underlying_type: non_empty(raw.underlying_type.as_deref()),
                is_flags: raw.is_flags,
                members: raw
                    .members
                    .iter()
                    .map(|m| EnumMember {
                        name: Arc::from(m.name.trim()),
                        value: non_empty(m.value.as_deref()),
                    })
                    .collect(),
            };
            self.insert_enum(enum_type)?;
        }

        for raw in &schema.associations {
            let association = normalize_association(raw, &ns_name, diagnostics)?;
            trace!("Registered association {}", association.name);
            let ns = self.namespace_mut(&ns_name);
            ns.associations
                .insert(association.name.name_arc().clone(), association);
        }

        Ok(())
    }

    fn namespace_mut(&mut self, name: &Arc<str>) -> &mut Namespace {
        self.namespaces
            .entry(name.clone())
            .or_insert_with(|| Namespace::new(name.clone()))
    }

    fn insert_declaration(&mut self, decl: TypeDeclaration) -> Result<(), SchemaError> {
        let ns = self.namespace_mut(decl.name.namespace_arc());
        if let Some(existing) = ns.contains(decl.name.name()) {
            return Err(SchemaError::DuplicateDeclaration {
                name: decl.name,
                existing,
            });
        }
        trace!("Registered {} {}", decl.kind.display(), decl.name);
        ns.declarations.insert(decl.name.name_arc().clone(), decl);
        Ok(())
    }

    fn insert_enum(&mut self, enum_type: EnumType) -> Result<(), SchemaError> {
        let ns = self.namespace_mut(enum_type.name.namespace_arc());
        if let Some(existing) = ns.contains(enum_type.name.name()) {
            return Err(SchemaError::DuplicateDeclaration {
                name: enum_type.name,
                existing,
            });
        }
        trace!("Registered EnumType {}", enum_type.name);
        ns.enums.insert(enum_type.name.name_arc().clone(), enum_type);
        Ok(())
    }

    // ========================================================================
    // PASS 2: ASSOCIATION NAVIGATION (EDM v3)
    // ========================================================================

    fn resolve_association_navigation(&mut self, diagnostics: &mut Diagnostics) {
        // Resolve against an immutable snapshot, then write the results back.
        let mut resolved: Vec<(QualifiedName, usize, Option<Arc<str>>)> = Vec::new();

        for decl in self.declarations() {
            for (index, nav) in decl.navigation.iter().enumerate() {
                let Some(link) = &nav.association else {
                    continue;
                };
                let subject = format!("{}.{}", decl.name, nav.name);
                let type_ref = match self.association(&link.relationship) {
                    None => {
                        diagnostics.warn(
                            codes::UNRESOLVED_ASSOCIATION,
                            subject,
                            format!("association '{}' not found", link.relationship),
                        );
                        None
                    }
                    Some(association) => match association.end(&link.to_role) {
                        None => {
                            diagnostics.warn(
                                codes::UNRESOLVED_ASSOCIATION,
                                subject,
                                format!(
                                    "association '{}' has no end with role '{}'",
                                    link.relationship, link.to_role
                                ),
                            );
                            None
                        }
                        Some(end) => Some(end_type_reference(end)),
                    },
                };
                resolved.push((decl.name.clone(), index, type_ref));
            }
        }

        for (name, index, type_ref) in resolved {
            if let Some(decl) = self
                .namespaces
                .get_mut(name.namespace())
                .and_then(|ns| ns.declarations.get_mut(name.name()))
            {
                decl.navigation[index].type_ref = type_ref;
            }
        }
    }

    // ========================================================================
    // PASS 3: KEY CHECK
    // ========================================================================

    fn check_keys(&self, diagnostics: &mut Diagnostics) {
        for decl in self.declarations() {
            // Derived entities inherit their key.
            if decl.is_entity() && decl.keys().is_empty() && decl.base_type.is_none() {
                diagnostics.warn(
                    codes::MISSING_KEY,
                    decl.name.to_string(),
                    format!("entity {} declares no key", decl.name),
                );
            }
            for key in decl.keys() {
                if !self.has_property_in_chain(decl, key) {
                    diagnostics.warn(
                        codes::UNKNOWN_KEY_PROPERTY,
                        decl.name.to_string(),
                        format!("key '{key}' does not name a property of {}", decl.name),
                    );
                }
            }
        }
    }

    /// Whether `property` is declared on `decl` or any of its base types.
    fn has_property_in_chain(&self, decl: &TypeDeclaration, property: &str) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = Some(decl);
        while let Some(d) = current {
            if d.property(property).is_some() {
                return true;
            }
            if !visited.insert(d.name.clone()) || visited.len() > MAX_BASE_DEPTH {
                return false;
            }
            current = d
                .base_type
                .as_deref()
                .map(|base| self.qualify(base, d.name.namespace()))
                .and_then(|qn| self.declaration(&qn));
        }
        false
    }
}

fn declared_name(
    namespace: &Arc<str>,
    name: &str,
    kind: &'static str,
) -> Result<QualifiedName, SchemaError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SchemaError::UnnamedDeclaration {
            kind,
            namespace: namespace.to_string(),
        });
    }
    Ok(QualifiedName::new(namespace.clone(), name))
}

fn non_empty(value: Option<&str>) -> Option<Arc<str>> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(Arc::from)
}

fn normalize_property(raw: &RawProperty) -> Property {
    Property {
        name: Arc::from(raw.name.trim()),
        type_ref: Arc::from(raw.type_ref.trim()),
        nullability: raw.nullable,
    }
}

fn normalize_navigation(
    raw: &RawNavigation,
    namespace: &str,
    model: &SchemaModel,
) -> NavigationReference {
    let name: Arc<str> = Arc::from(raw.name.trim());
    match &raw.target {
        RawNavigationTarget::Typed {
            type_ref,
            nullable,
            partner,
        } => NavigationReference {
            name,
            type_ref: non_empty(Some(type_ref)),
            nullability: *nullable,
            partner: non_empty(partner.as_deref()),
            association: None,
        },
        RawNavigationTarget::Association {
            relationship,
            from_role,
            to_role,
        } => NavigationReference {
            name,
            type_ref: None,
            nullability: Nullability::Unspecified,
            partner: None,
            association: Some(AssociationLink {
                relationship: model.qualify(relationship, namespace),
                from_role: Arc::from(from_role.trim()),
                to_role: Arc::from(to_role.trim()),
            }),
        },
    }
}

fn normalize_association(
    raw: &RawAssociation,
    namespace: &Arc<str>,
    diagnostics: &mut Diagnostics,
) -> Result<Association, SchemaError> {
    let name = declared_name(namespace, &raw.name, "Association")?;
    let ends = raw
        .ends
        .iter()
        .map(|end| {
            let multiplicity = Multiplicity::parse(&end.multiplicity).unwrap_or_else(|| {
                diagnostics.warn(
                    codes::UNRESOLVED_ASSOCIATION,
                    format!("{name}.{}", end.role),
                    format!(
                        "unknown multiplicity '{}', assuming a single target",
                        end.multiplicity
                    ),
                );
                Multiplicity::One
            });
            AssociationEnd {
                role: Arc::from(end.role.trim()),
                type_ref: Arc::from(end.type_ref.trim()),
                multiplicity,
            }
        })
        .collect();
    Ok(Association { name, ends })
}

/// Type reference for a navigation through `end`: many-valued ends become
/// collections.
fn end_type_reference(end: &AssociationEnd) -> Arc<str> {
    match end.multiplicity {
        Multiplicity::Many => Arc::from(format!("Collection({})", end.type_ref)),
        Multiplicity::One | Multiplicity::ZeroOrOne => end.type_ref.clone(),
    }
}
