//! Per-declaration dependency sets and the bidirectional dependency graph.
//!
//! For each entity or complex type, collect the distinct declarations its
//! renderer has to import or forward-declare:
//!
//! - base type, property types and navigation targets
//! - collection wrappers stripped
//! - self, primitives and anything in the `Edm` namespace excluded
//!
//! The graph keeps a forward map (declaration → dependencies) and a reverse
//! map (dependency → declarations that reference it). Cycles are expected
//! and are only reported, never resolved.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::context::{Classification, ResolutionContext};
use super::descriptor::{LazyRef, RefKind};
use super::type_ref::TypeRef;
use crate::base::QualifiedName;
use crate::schema::{SchemaModel, TypeDeclaration};

/// Deduplicated, sorted dependencies of one declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Entity, complex and unresolved names.
    pub types: BTreeSet<QualifiedName>,
    pub enums: BTreeSet<QualifiedName>,
}

impl DependencySet {
    /// Collect the dependencies of `decl`.
    pub fn of(decl: &TypeDeclaration, context: &ResolutionContext) -> Self {
        let mut set = Self::default();
        let namespace = decl.name.namespace();

        if let Some(base) = decl.base_type.as_deref() {
            let qualified = context.qualify(base, namespace);
            if qualified != decl.name && !qualified.is_edm() {
                set.types.insert(qualified);
            }
        }

        let references = decl
            .properties
            .iter()
            .map(|p| &*p.type_ref)
            .chain(decl.navigation.iter().filter_map(|n| n.type_ref.as_deref()));
        for raw in references {
            set.add_reference(&decl.name, raw, context);
        }
        set
    }

    fn add_reference(&mut self, owner: &QualifiedName, raw: &str, context: &ResolutionContext) {
        // Malformed references have no name to depend on.
        let Ok(parsed) = TypeRef::parse(raw) else {
            return;
        };
        match context.classify(parsed.element_name(), owner.namespace()) {
            Classification::Primitive(_) => {}
            Classification::Declared(lazy) if &lazy.name == owner => {}
            Classification::Declared(lazy) if lazy.kind == RefKind::Enum => {
                self.enums.insert(lazy.name);
            }
            Classification::Declared(lazy) => {
                self.types.insert(lazy.name);
            }
            Classification::Unknown(name) if name.is_edm() || &name == owner => {}
            Classification::Unknown(name) => {
                self.types.insert(name);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.enums.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.enums.len()
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.types.contains(name) || self.enums.contains(name)
    }

    /// Types first, then enums, each sorted.
    pub fn iter(&self) -> impl Iterator<Item = &QualifiedName> {
        self.types.iter().chain(self.enums.iter())
    }
}

/// Dependency sets of every declaration plus the reverse index.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    forward: BTreeMap<QualifiedName, DependencySet>,
    reverse: FxHashMap<QualifiedName, BTreeSet<QualifiedName>>,
    kinds: FxHashMap<QualifiedName, RefKind>,
}

impl DependencyGraph {
    pub fn build(model: &SchemaModel, context: &ResolutionContext) -> Self {
        let mut graph = Self::default();
        for decl in model.declarations() {
            let set = DependencySet::of(decl, context);
            for target in set.iter() {
                graph
                    .reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(decl.name.clone());
                graph.kinds.insert(
                    target.clone(),
                    context.kind_of(target).unwrap_or(RefKind::Unknown),
                );
            }
            trace!("{} depends on {} declaration(s)", decl.name, set.len());
            graph.forward.insert(decl.name.clone(), set);
        }
        graph
    }

    /// Dependencies of one declaration.
    pub fn get(&self, name: &QualifiedName) -> Option<&DependencySet> {
        self.forward.get(name)
    }

    /// All declarations with their dependencies, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &DependencySet)> {
        self.forward.iter()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Declarations that depend on `target`, sorted.
    pub fn referrers(&self, target: &QualifiedName) -> impl Iterator<Item = &QualifiedName> {
        self.reverse.get(target).into_iter().flatten()
    }

    /// Dependencies of `name` as lazy references, tagged with their kind.
    pub fn lazy_refs(&self, name: &QualifiedName) -> Vec<LazyRef> {
        self.get(name)
            .map(|set| {
                set.iter()
                    .map(|dep| {
                        let kind = self.kinds.get(dep).copied().unwrap_or(RefKind::Unknown);
                        LazyRef::new(dep.clone(), kind)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `name` can reach itself through type dependencies.
    pub fn in_cycle(&self, name: &QualifiedName) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<&QualifiedName> = match self.get(name) {
            Some(set) => set.types.iter().collect(),
            None => return false,
        };
        while let Some(current) = stack.pop() {
            if current == name {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(set) = self.get(current) {
                stack.extend(set.types.iter());
            }
        }
        false
    }
}
