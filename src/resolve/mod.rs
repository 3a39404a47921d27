//! Type resolution: from a normalized model to renderer-ready declarations.
//!
//! ```text
//!                   ┌──────────────────────────┐
//! SchemaModel ────▶ │ ResolutionContext        │  namespace aliases, declared kinds,
//! GenerationConfig  │  (immutable, built once) │  qualification + decimal options
//!                   └────────────┬─────────────┘
//!                                │
//!          ┌─────────────────────┼──────────────────────┐
//!          ▼                     ▼                      ▼
//!   field descriptors     DependencyGraph           EnumPlans
//!   (TypeDescriptor)      (forward + reverse)       (values + codecs)
//!          └─────────────────────┴──────────────────────┘
//!                                ▼
//!                          ResolvedModel
//! ```
//!
//! Everything is sorted by qualified name so that two runs over the same
//! input produce identical output.

mod context;
mod deps;
mod descriptor;
mod enums;
mod error;
mod namespace;
mod primitive;
mod type_ref;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

pub use context::{Classification, ResolutionContext};
pub use deps::{DependencyGraph, DependencySet};
pub use descriptor::{BaseType, LazyRef, NullabilityStrategy, RefKind, TypeDescriptor};
pub use enums::{EnumPlan, EnumUnderlying, EnumWire, PlannedMember};
pub use error::{EnumCodecError, ResolveError};
pub use namespace::{NamespaceTable, RenderedName, namespace_alias};
pub use primitive::{PrimitiveKind, PrimitiveRepr};
pub use type_ref::{MAX_COLLECTION_DEPTH, TypeRef, TypeRefError};

use crate::base::{Diagnostic, Diagnostics, QualifiedName};
use crate::config::GenerationConfig;
use crate::schema::{DeclarationKind, SchemaModel, SchemaTree, TypeDeclaration};

/// Where a resolved field came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldSource {
    Property,
    Navigation {
        /// v4 partner navigation on the target, if declared.
        partner: Option<Arc<str>>,
    },
}

/// One property or navigation with its resolved type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: Arc<str>,
    pub descriptor: TypeDescriptor,
    pub source: FieldSource,
    /// Part of the entity key.
    pub is_key: bool,
}

impl ResolvedField {
    pub fn is_navigation(&self) -> bool {
        matches!(self.source, FieldSource::Navigation { .. })
    }
}

/// An entity or complex type ready for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDeclaration {
    pub name: QualifiedName,
    pub rendered_name: RenderedName,
    pub kind: DeclarationKind,
    pub base: Option<LazyRef>,
    /// Properties first, then navigation, each in declaration order.
    pub fields: Vec<ResolvedField>,
}

impl ResolvedDeclaration {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| !f.is_navigation())
    }

    pub fn navigation(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| f.is_navigation())
    }
}

/// The output of a resolution run.
#[derive(Clone, Debug)]
pub struct ResolvedModel {
    context: ResolutionContext,
    declarations: BTreeMap<QualifiedName, ResolvedDeclaration>,
    enums: BTreeMap<QualifiedName, EnumPlan>,
    dependencies: DependencyGraph,
    diagnostics: Diagnostics,
}

/// Normalize a raw tree and resolve it.
///
/// ```
/// use edmgen::config::GenerationConfig;
/// use edmgen::schema::raw::{RawEntityType, RawProperty, RawSchema, SchemaTree};
///
/// let tree = SchemaTree::new().with_schema(
///     RawSchema::new("Sales").with_entity(
///         RawEntityType::new("Order")
///             .with_key("ID")
///             .with_property(RawProperty::new("ID", "Edm.Int32").not_nullable()),
///     ),
/// );
/// let model = edmgen::resolve::resolve(&tree, &GenerationConfig::default()).unwrap();
/// let order = model.declarations().next().unwrap();
/// assert_eq!(order.rendered_name.to_string(), "Order");
/// assert!(order.fields[0].is_key);
/// ```
pub fn resolve(tree: &SchemaTree, config: &GenerationConfig) -> Result<ResolvedModel, ResolveError> {
    let mut diagnostics = Diagnostics::new();
    let model = SchemaModel::normalize(tree, &mut diagnostics)?;
    ResolvedModel::from_model(&model, *config, diagnostics)
}

impl ResolvedModel {
    /// Resolve an already normalized model. `diagnostics` carries anything
    /// reported during normalization.
    pub fn from_model(
        model: &SchemaModel,
        config: GenerationConfig,
        mut diagnostics: Diagnostics,
    ) -> Result<Self, ResolveError> {
        debug!(
            "Resolving {} declaration(s) in {} namespace(s) (qualification: {}, decimals: {})",
            model.declaration_count(),
            model.namespace_count(),
            config.qualification.as_str(),
            config.decimal_encoding.as_str()
        );

        let context = ResolutionContext::new(model, config, &mut diagnostics);

        let mut enums = BTreeMap::new();
        for enum_type in model.enums() {
            let plan = EnumPlan::plan(enum_type, &mut diagnostics)?;
            enums.insert(enum_type.name.clone(), plan);
        }

        let mut declarations = BTreeMap::new();
        for decl in model.declarations() {
            let resolved = resolve_declaration(decl, &context, &mut diagnostics);
            declarations.insert(decl.name.clone(), resolved);
        }

        let dependencies = DependencyGraph::build(model, &context);

        debug!(
            "Resolved {} type(s) and {} enum(s) with {} warning(s)",
            declarations.len(),
            enums.len(),
            diagnostics.warning_count()
        );

        Ok(Self {
            context,
            declarations,
            enums,
            dependencies,
            diagnostics,
        })
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// Entity and complex types, sorted by qualified name.
    pub fn declarations(&self) -> impl Iterator<Item = &ResolvedDeclaration> {
        self.declarations.values()
    }

    pub fn declaration(&self, name: &QualifiedName) -> Option<&ResolvedDeclaration> {
        self.declarations.get(name)
    }

    /// Enum plans, sorted by qualified name.
    pub fn enums(&self) -> impl Iterator<Item = &EnumPlan> {
        self.enums.values()
    }

    pub fn enum_plan(&self, name: &QualifiedName) -> Option<&EnumPlan> {
        self.enums.get(name)
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    pub fn dependencies_of(&self, name: &QualifiedName) -> Option<&DependencySet> {
        self.dependencies.get(name)
    }

    /// Rendered name of any declaration, enums included.
    pub fn rendered_name(&self, name: &QualifiedName) -> RenderedName {
        self.context.rendered_name(name)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }
}

fn resolve_declaration(
    decl: &TypeDeclaration,
    context: &ResolutionContext,
    diagnostics: &mut Diagnostics,
) -> ResolvedDeclaration {
    let namespace = decl.name.namespace();
    let mut fields = Vec::with_capacity(decl.properties.len() + decl.navigation.len());

    for property in &decl.properties {
        let subject = format!("{}.{}", decl.name, property.name);
        fields.push(ResolvedField {
            name: property.name.clone(),
            descriptor: context.resolve_type_for(
                &subject,
                &property.type_ref,
                property.nullability,
                namespace,
                diagnostics,
            ),
            source: FieldSource::Property,
            is_key: decl.is_key(&property.name),
        });
    }

    for nav in &decl.navigation {
        let subject = format!("{}.{}", decl.name, nav.name);
        // Unresolved associations were reported during normalization.
        let descriptor = match nav.type_ref.as_deref() {
            Some(raw) => context.resolve_type_for(&subject, raw, nav.nullability, namespace, diagnostics),
            None => TypeDescriptor::unknown(&nav.name),
        };
        fields.push(ResolvedField {
            name: nav.name.clone(),
            descriptor,
            source: FieldSource::Navigation {
                partner: nav.partner.clone(),
            },
            is_key: false,
        });
    }

    ResolvedDeclaration {
        name: decl.name.clone(),
        rendered_name: context.rendered_name(&decl.name),
        kind: decl.kind.clone(),
        base: context.resolve_base_type(decl, diagnostics),
        fields,
    }
}
