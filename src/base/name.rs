//! Qualified names and nullability.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Namespace reserved for EDM primitive types (`Edm.String`, `Edm.Int32`, ...).
pub const EDM_NAMESPACE: &str = "Edm";

/// Split a dotted reference at its last `.`.
///
/// Returns `(None, name)` when the reference carries no qualifier.
///
/// ```
/// use edmgen::base::split_qualified;
///
/// assert_eq!(split_qualified("Sales.Order"), (Some("Sales"), "Order"));
/// assert_eq!(split_qualified("com.acme.v1.Order"), (Some("com.acme.v1"), "Order"));
/// assert_eq!(split_qualified("Order"), (None, "Order"));
/// ```
pub fn split_qualified(reference: &str) -> (Option<&str>, &str) {
    match reference.rsplit_once('.') {
        Some((qualifier, local)) => (Some(qualifier), local),
        None => (None, reference),
    }
}

/// A `Namespace.LocalName` pair uniquely identifying a declaration.
///
/// Ordering is lexicographic by namespace, then by local name, which keeps
/// every derived collection (declaration lists, dependency sets) stable
/// across runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: Arc<str>,
    name: Arc<str>,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse a dotted name. A string without dots gets an empty namespace.
    pub fn parse(qualified: &str) -> Self {
        let (namespace, name) = split_qualified(qualified);
        Self::new(namespace.unwrap_or(""), name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The namespace as a shared string (cheap to clone).
    pub fn namespace_arc(&self) -> &Arc<str> {
        &self.namespace
    }

    /// The local (unqualified) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local name as a shared string (cheap to clone).
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// True for names in the reserved `Edm` namespace.
    pub fn is_edm(&self) -> bool {
        &*self.namespace == EDM_NAMESPACE
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Schema alias → namespace map.
///
/// The first namespace to claim an alias keeps it.
#[derive(Clone, Debug, Default)]
pub struct SchemaAliases {
    map: FxHashMap<Arc<str>, Arc<str>>,
}

impl SchemaAliases {
    pub fn register(&mut self, alias: Arc<str>, namespace: Arc<str>) {
        self.map.entry(alias).or_insert(namespace);
    }

    /// Map a reference qualifier to its namespace. Qualifiers that are not
    /// aliases are returned unchanged.
    pub fn canonical_namespace<'a>(&'a self, qualifier: &'a str) -> &'a str {
        self.map.get(qualifier).map(|ns| ns.as_ref()).unwrap_or(qualifier)
    }

    /// Qualify a possibly-unqualified, possibly-aliased reference against
    /// `context_namespace`.
    ///
    /// ```
    /// use edmgen::base::SchemaAliases;
    ///
    /// let mut aliases = SchemaAliases::default();
    /// aliases.register("S".into(), "com.acme.sales".into());
    /// assert_eq!(aliases.qualify("S.Order", "Other").to_string(), "com.acme.sales.Order");
    /// assert_eq!(aliases.qualify("Order", "Other").to_string(), "Other.Order");
    /// ```
    pub fn qualify(&self, reference: &str, context_namespace: &str) -> QualifiedName {
        let (qualifier, local) = split_qualified(reference.trim());
        let namespace = match qualifier {
            Some(q) => self.canonical_namespace(q),
            None => context_namespace,
        };
        QualifiedName::new(namespace, local)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Arc<str>)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Nullability of a property or navigation reference.
///
/// EDM leaves `Nullable` optional; an absent attribute means nullable for
/// scalar and complex fields, but renderers may still want to know that the
/// schema never said so.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Nullability {
    /// `Nullable="true"`
    Nullable,
    /// `Nullable="false"`
    NotNullable,
    /// Attribute absent (or unparseable).
    #[default]
    Unspecified,
}

impl Nullability {
    /// Parse an XML attribute value, case-insensitively.
    pub fn parse_attribute(value: &str) -> Self {
        if value.eq_ignore_ascii_case("true") {
            Self::Nullable
        } else if value.eq_ignore_ascii_case("false") {
            Self::NotNullable
        } else {
            Self::Unspecified
        }
    }

    /// Effective nullability: only an explicit `false` makes a field required.
    pub fn is_nullable(self) -> bool {
        !matches!(self, Self::NotNullable)
    }
}
