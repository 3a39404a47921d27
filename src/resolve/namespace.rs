//! Namespace aliases and rendered-name qualification.
//!
//! Every namespace gets a short alias derived from its last segment:
//!
//! ```text
//! com.acme.sales      → Sales
//! Microsoft.OData/v4  → V4
//! 2024.data           → Data
//! my-ns.2x            → NS2x
//! ```
//!
//! Whether a rendered name carries that alias depends on
//! [`QualificationMode`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{Diagnostics, QualifiedName, codes};
use crate::config::QualificationMode;
use crate::schema::SchemaModel;

const FALLBACK_ALIAS: &str = "NS";

/// Derive the alias for a namespace.
///
/// Takes the segment after the last `.` or `/`, drops characters that cannot
/// continue an identifier (and `_`), and upper-cases the first character.
/// An empty result becomes `NS`; a result that cannot start an identifier is
/// prefixed with `NS`.
///
/// ```
/// use edmgen::resolve::namespace_alias;
///
/// assert_eq!(namespace_alias("com.acme.sales"), "Sales");
/// assert_eq!(namespace_alias("Microsoft.OData/v4"), "V4");
/// assert_eq!(namespace_alias("a.b_c-d"), "Bcd");
/// assert_eq!(namespace_alias("x.2024"), "NS2024");
/// assert_eq!(namespace_alias("x."), "NS");
/// ```
pub fn namespace_alias(namespace: &str) -> SmolStr {
    let segment = namespace.rsplit(['.', '/']).next().unwrap_or_default();
    let mut chars = segment
        .chars()
        .filter(|&c| c != '_' && unicode_ident::is_xid_continue(c));

    let Some(first) = chars.next() else {
        return SmolStr::new_static(FALLBACK_ALIAS);
    };

    let mut alias = String::with_capacity(segment.len() + FALLBACK_ALIAS.len());
    if !unicode_ident::is_xid_start(first) {
        alias.push_str(FALLBACK_ALIAS);
    }
    alias.extend(first.to_uppercase());
    alias.extend(chars);
    SmolStr::new(alias)
}

/// A declaration name as a renderer should print it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderedName {
    /// Present only when the name is qualified.
    pub alias: Option<SmolStr>,
    pub local: Arc<str>,
}

impl RenderedName {
    pub fn is_qualified(&self) -> bool {
        self.alias.is_some()
    }
}

impl fmt::Display for RenderedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Aliases for every namespace plus the set of local names that occur in
/// more than one namespace.
#[derive(Clone, Debug, Default)]
pub struct NamespaceTable {
    mode: QualificationMode,
    aliases: IndexMap<Arc<str>, SmolStr>,
    colliding: FxHashSet<Arc<str>>,
}

impl NamespaceTable {
    /// Build the table for a normalized model. Alias collisions are reported
    /// as warnings.
    pub fn from_model(
        model: &SchemaModel,
        mode: QualificationMode,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut aliases = IndexMap::new();
        let mut owners: FxHashMap<Arc<str>, FxHashSet<Arc<str>>> = FxHashMap::default();

        for ns in model.namespaces() {
            aliases.insert(ns.name_arc().clone(), namespace_alias(ns.name()));
            for local in ns.local_names() {
                owners
                    .entry(local.clone())
                    .or_default()
                    .insert(ns.name_arc().clone());
            }
        }

        let colliding = owners
            .into_iter()
            .filter(|(_, namespaces)| namespaces.len() > 1)
            .map(|(local, _)| local)
            .collect();

        let table = Self {
            mode,
            aliases,
            colliding,
        };
        table.report_alias_collisions(diagnostics);
        table
    }

    fn report_alias_collisions(&self, diagnostics: &mut Diagnostics) {
        let mut by_alias: IndexMap<&SmolStr, Vec<&str>> = IndexMap::new();
        for (namespace, alias) in &self.aliases {
            by_alias.entry(alias).or_default().push(namespace.as_ref());
        }
        for (alias, namespaces) in by_alias {
            if namespaces.len() > 1 {
                diagnostics.warn(
                    codes::ALIAS_COLLISION,
                    alias.as_str(),
                    format!(
                        "alias '{alias}' is shared by namespaces {}",
                        namespaces.join(", ")
                    ),
                );
            }
        }
    }

    pub fn mode(&self) -> QualificationMode {
        self.mode
    }

    /// The alias of a known namespace.
    pub fn alias(&self, namespace: &str) -> Option<&SmolStr> {
        self.aliases.get(namespace)
    }

    /// Namespace → alias pairs in document order.
    pub fn aliases(&self) -> impl Iterator<Item = (&Arc<str>, &SmolStr)> {
        self.aliases.iter()
    }

    /// Whether `local` is declared in more than one namespace.
    pub fn is_colliding(&self, local: &str) -> bool {
        self.colliding.contains(local)
    }

    /// Whether `name` must be rendered with its namespace alias.
    pub fn requires_qualification(&self, name: &QualifiedName) -> bool {
        match self.mode {
            QualificationMode::Always => true,
            QualificationMode::Never => false,
            QualificationMode::Auto => self.is_colliding(name.name()),
        }
    }

    pub fn rendered_name(&self, name: &QualifiedName) -> RenderedName {
        let alias = self
            .requires_qualification(name)
            .then(|| {
                self.alias(name.namespace())
                    .cloned()
                    .unwrap_or_else(|| namespace_alias(name.namespace()))
            });
        RenderedName {
            alias,
            local: name.name_arc().clone(),
        }
    }
}
