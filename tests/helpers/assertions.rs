//! Assertion helpers over resolved models.

use edmgen::base::{Diagnostics, QualifiedName};
use edmgen::resolve::{ResolvedDeclaration, ResolvedField, ResolvedModel};

/// Look up a declaration by `Namespace.Name`, panicking with the available
/// names when it is missing.
pub fn declaration<'a>(model: &'a ResolvedModel, qualified: &str) -> &'a ResolvedDeclaration {
    model
        .declaration(&QualifiedName::parse(qualified))
        .unwrap_or_else(|| {
            let names: Vec<_> = model.declarations().map(|d| d.name.to_string()).collect();
            panic!("no declaration '{qualified}', have: {}", names.join(", "))
        })
}

/// Look up a field of a declaration.
pub fn field<'a>(model: &'a ResolvedModel, qualified: &str, field: &str) -> &'a ResolvedField {
    declaration(model, qualified)
        .field(field)
        .unwrap_or_else(|| panic!("'{qualified}' has no field '{field}'"))
}

/// Assert exactly `expected` diagnostics carry `code`.
pub fn assert_code_count(diagnostics: &Diagnostics, code: &str, expected: usize) {
    let found: Vec<_> = diagnostics.with_code(code).map(ToString::to_string).collect();
    assert_eq!(
        found.len(),
        expected,
        "expected {expected} diagnostic(s) with code {code}, got:\n  {}",
        found.join("\n  ")
    );
}
