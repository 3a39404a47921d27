//! The immutable resolution context.
//!
//! A [`ResolutionContext`] is built once per run from the normalized model and
//! the generation options, then passed by reference to every resolver.
//! Nothing in it changes after construction.
//!
//! Name classification order:
//!
//! ```text
//! X (in table)     → primitive
//! Edm.X            → primitive table, otherwise unknown (never a declaration)
//! NS.X / Alias.X   → declared enum / entity / complex in NS
//! X                → declared in the context namespace
//! any.X            → primitive table by local name
//! otherwise        → unknown (W0002)
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::descriptor::{BaseType, LazyRef, RefKind, TypeDescriptor};
use super::namespace::{NamespaceTable, RenderedName};
use super::primitive::{PrimitiveKind, PrimitiveRepr};
use super::type_ref::TypeRef;
use crate::base::{Diagnostics, Nullability, QualifiedName, SchemaAliases, codes, split_qualified};
use crate::config::{DecimalEncoding, GenerationConfig};
use crate::schema::{DeclarationKind, SchemaModel, TypeDeclaration};

/// What a raw name refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Primitive(PrimitiveKind),
    Declared(LazyRef),
    /// Fully qualified (alias-expanded) name that matched nothing.
    Unknown(QualifiedName),
}

/// Read-only state shared by every resolution step.
#[derive(Clone, Debug)]
pub struct ResolutionContext {
    config: GenerationConfig,
    namespaces: NamespaceTable,
    kinds: FxHashMap<QualifiedName, RefKind>,
    aliases: SchemaAliases,
}

impl ResolutionContext {
    pub fn new(
        model: &SchemaModel,
        config: GenerationConfig,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut kinds = FxHashMap::default();
        for decl in model.declarations() {
            let kind = match decl.kind {
                DeclarationKind::Entity { .. } => RefKind::Entity,
                DeclarationKind::Complex => RefKind::Complex,
            };
            kinds.insert(decl.name.clone(), kind);
        }
        for enum_type in model.enums() {
            kinds.insert(enum_type.name.clone(), RefKind::Enum);
        }

        Self {
            config,
            namespaces: NamespaceTable::from_model(model, config.qualification, diagnostics),
            kinds,
            aliases: model.aliases().clone(),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Kind of a declared name, if declared.
    pub fn kind_of(&self, name: &QualifiedName) -> Option<RefKind> {
        self.kinds.get(name).copied()
    }

    pub fn rendered_name(&self, name: &QualifiedName) -> RenderedName {
        self.namespaces.rendered_name(name)
    }

    /// Qualify a reference against `context_namespace`, expanding schema
    /// aliases.
    pub fn qualify(&self, reference: &str, context_namespace: &str) -> QualifiedName {
        self.aliases.qualify(reference, context_namespace)
    }

    /// Decide what a single (non-collection) name refers to.
    pub fn classify(&self, name: &str, context_namespace: &str) -> Classification {
        let (qualifier, local) = split_qualified(name.trim());
        if let (None, Some(kind)) = (qualifier, PrimitiveKind::from_local_name(local)) {
            return Classification::Primitive(kind);
        }

        let qualified = self.qualify(name, context_namespace);
        if qualified.is_edm() {
            return match PrimitiveKind::from_local_name(qualified.name()) {
                Some(kind) => Classification::Primitive(kind),
                None => Classification::Unknown(qualified),
            };
        }

        if let Some(kind) = self.kind_of(&qualified) {
            return Classification::Declared(LazyRef::new(qualified, kind));
        }

        match PrimitiveKind::from_local_name(qualified.name()) {
            Some(kind) => Classification::Primitive(kind),
            None => Classification::Unknown(qualified),
        }
    }

    fn repr_of(&self, kind: PrimitiveKind) -> PrimitiveRepr {
        match (kind, self.config.decimal_encoding) {
            (PrimitiveKind::Decimal, DecimalEncoding::OpaqueString) => PrimitiveRepr::OpaqueString,
            _ => PrimitiveRepr::Native,
        }
    }

    /// Resolve a raw type reference to a descriptor.
    ///
    /// Unresolvable or malformed references produce an unknown descriptor
    /// and a `W0002` warning; resolution never fails.
    pub fn resolve_type(
        &self,
        raw: &str,
        nullability: Nullability,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> TypeDescriptor {
        self.resolve_type_for(raw, raw, nullability, context_namespace, diagnostics)
    }

    /// Like [`resolve_type`](Self::resolve_type), reporting against `subject`
    /// (usually `Type.field`).
    pub fn resolve_type_for(
        &self,
        subject: &str,
        raw: &str,
        nullability: Nullability,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> TypeDescriptor {
        let parsed = match TypeRef::parse(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                diagnostics.warn(
                    codes::UNRESOLVED_TYPE,
                    subject,
                    format!("malformed type reference '{raw}': {err}"),
                );
                return TypeDescriptor::unknown(raw);
            }
        };

        let base = self.base_type(parsed.element_name(), subject, context_namespace, diagnostics);
        if parsed.is_collection() {
            TypeDescriptor::collection(base)
        } else {
            TypeDescriptor::single(base, nullability.is_nullable())
        }
    }

    fn base_type(
        &self,
        name: &str,
        subject: &str,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> BaseType {
        match self.classify(name, context_namespace) {
            Classification::Primitive(kind) => BaseType::Primitive(kind, self.repr_of(kind)),
            Classification::Declared(lazy) if lazy.kind == RefKind::Enum => BaseType::Enum(lazy.name),
            Classification::Declared(lazy) => BaseType::Structured(lazy),
            Classification::Unknown(qualified) => {
                diagnostics.warn(
                    codes::UNRESOLVED_TYPE,
                    subject,
                    format!("unresolved type '{name}' (looked up as {qualified})"),
                );
                BaseType::Unknown(Arc::from(name))
            }
        }
    }

    /// Resolve a declaration's base type to a lazy reference.
    ///
    /// An unknown base is kept as a [`RefKind::Unknown`] reference and
    /// reported as `W0008`.
    pub fn resolve_base_type(
        &self,
        decl: &TypeDeclaration,
        diagnostics: &mut Diagnostics,
    ) -> Option<LazyRef> {
        let raw = decl.base_type.as_deref()?;
        let qualified = self.qualify(raw, decl.name.namespace());
        let kind = match self.kind_of(&qualified) {
            Some(kind @ (RefKind::Entity | RefKind::Complex)) => kind,
            _ => {
                diagnostics.warn(
                    codes::UNKNOWN_BASE_TYPE,
                    decl.name.to_string(),
                    format!("base type '{raw}' is not a declared structured type"),
                );
                RefKind::Unknown
            }
        };
        Some(LazyRef::new(qualified, kind))
    }
}
