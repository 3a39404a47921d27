//! Diagnostics: recoverable conditions reported during a generation run.
//!
//! Generation is best-effort: a malformed enum value or an unresolvable type
//! reference never aborts the run. Each such condition is recorded here and
//! mirrored to `tracing` so callers can surface it or fail the run themselves.

use std::sync::Arc;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A diagnostic message about one schema element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (see [`codes`]).
    pub code: &'static str,
    /// The element the diagnostic is about, usually a qualified name or
    /// `Type.member` path.
    pub subject: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            subject: None,
            message: message.into(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            subject: None,
            message: message.into(),
        }
    }

    /// Attach the element this diagnostic is about.
    pub fn with_subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.severity.as_str(), self.code)?;
        if let Some(subject) = &self.subject {
            write!(f, " {subject}")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// All codes are warnings (`W0001-W0099`): the condition was recovered and
/// generation continued. Fatal conditions are errors, not diagnostics.
pub mod codes {
    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// Enum member value is not a number or does not fit the underlying type.
    pub const MALFORMED_ENUM_VALUE: &str = "W0001";
    /// Type reference could not be resolved.
    pub const UNRESOLVED_TYPE: &str = "W0002";
    /// Enum member declared twice with the same value.
    pub const DUPLICATE_ENUM_MEMBER: &str = "W0003";
    /// Entity key refers to a property that does not exist.
    pub const UNKNOWN_KEY_PROPERTY: &str = "W0004";
    /// Two namespaces were given the same short alias.
    pub const ALIAS_COLLISION: &str = "W0005";
    /// Association-based navigation could not be resolved.
    pub const UNRESOLVED_ASSOCIATION: &str = "W0006";
    /// Enum underlying type is not an integer type.
    pub const UNSUPPORTED_UNDERLYING_TYPE: &str = "W0007";
    /// Base type of a declaration is unknown.
    pub const UNKNOWN_BASE_TYPE: &str = "W0008";
    /// Entity type without a base type declares no key.
    pub const MISSING_KEY: &str = "W0009";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during normalization and resolution.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{diagnostic}"),
            Severity::Warning => tracing::warn!("{diagnostic}"),
            Severity::Info => tracing::debug!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add a warning about `subject`.
    pub fn warn(
        &mut self,
        code: &'static str,
        subject: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
    ) {
        self.add(Diagnostic::warning(code, message).with_subject(subject));
    }

    /// All collected diagnostics, in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics carrying the given code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Whether any error-level diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the collector, returning the diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
