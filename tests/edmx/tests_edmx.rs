#![allow(clippy::unwrap_used)]

use std::fs;

use edmgen::base::{QualifiedName, codes};
use edmgen::config::GenerationConfig;
use edmgen::edmx::{Edmx, EdmxError, resolve_edmx};
use edmgen::resolve::{BaseType, NullabilityStrategy, PrimitiveKind, RefKind, ResolveError};
use tempfile::TempDir;

use crate::helpers::assertions::{assert_code_count, declaration, field};
use crate::helpers::fixtures::{V3_METADATA, V4_METADATA};

#[test]
fn test_read_v4_document() {
    let edmx = Edmx::read(V4_METADATA.as_bytes()).unwrap();
    assert_eq!(edmx.version.as_deref(), Some("4.0"));

    let tree = edmx.into_tree();
    assert_eq!(tree.schemas.len(), 1);
    let schema = &tree.schemas[0];
    assert_eq!(schema.namespace, "Trippin");
    assert_eq!(schema.entity_types.len(), 2);
    assert_eq!(schema.complex_types.len(), 2);
    assert_eq!(schema.enum_types.len(), 2);
}

#[test]
fn test_resolve_v4_document() {
    let model = resolve_edmx(V4_METADATA.as_bytes(), &GenerationConfig::default()).unwrap();

    let names: Vec<_> = model.declarations().map(|d| d.name.to_string()).collect();
    assert_eq!(
        names,
        ["Trippin.City", "Trippin.Location", "Trippin.Person", "Trippin.Trip"]
    );

    let person = declaration(&model, "Trippin.Person");
    assert!(person.field("UserName").unwrap().is_key);

    let age = field(&model, "Trippin.Person", "Age");
    assert_eq!(age.descriptor.primitive(), Some(PrimitiveKind::Int64));
    assert!(age.descriptor.is_optional());

    let gender = field(&model, "Trippin.Person", "Gender");
    assert_eq!(
        gender.descriptor.base,
        BaseType::Enum(QualifiedName::new("Trippin", "PersonGender"))
    );
    assert_eq!(gender.descriptor.nullability, NullabilityStrategy::NoWrapper);

    let features = field(&model, "Trippin.Person", "Features");
    assert!(features.descriptor.collection);

    let best_friend = field(&model, "Trippin.Person", "BestFriend");
    assert!(best_friend.is_navigation());
    assert!(best_friend.descriptor.is_optional());

    // Geography types are outside the primitive table.
    assert!(field(&model, "Trippin.Person", "Home").descriptor.is_unknown());
    assert_code_count(model.diagnostics(), codes::UNRESOLVED_TYPE, 1);

    let trip_deps = model
        .dependencies_of(&QualifiedName::new("Trippin", "Trip"))
        .unwrap();
    assert!(trip_deps.types.contains(&QualifiedName::new("Trippin", "Person")));
    assert!(model.dependencies().in_cycle(&QualifiedName::new("Trippin", "Trip")));

    let feature = model
        .enum_plan(&QualifiedName::new("Trippin", "Feature"))
        .unwrap();
    assert!(feature.is_flags());
    assert_eq!(feature.decode_name("Feature1,Feature3"), Ok(5));
}

#[test]
fn test_resolve_v3_document() {
    let model = resolve_edmx(V3_METADATA.as_bytes(), &GenerationConfig::default()).unwrap();
    assert!(model.diagnostics().is_empty(), "{:?}", model.diagnostics());

    let products = field(&model, "NorthwindModel.Category", "Products");
    assert!(products.descriptor.collection);
    assert_eq!(
        products.descriptor.lazy_ref().map(|r| r.kind),
        Some(RefKind::Entity)
    );

    let category = field(&model, "NorthwindModel.Product", "Category");
    assert!(!category.descriptor.collection);
    assert!(category.descriptor.is_optional());

    let modified = field(&model, "NorthwindModel.Product", "Modified");
    assert_eq!(modified.descriptor.primitive(), Some(PrimitiveKind::DateTime));
    assert!(!modified.descriptor.is_optional());
}

#[test]
fn test_read_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("$metadata.xml");
    fs::write(&path, V3_METADATA).unwrap();

    let edmx = Edmx::read_path(&path).unwrap();
    assert_eq!(edmx.version.as_deref(), Some("1.0"));
    assert_eq!(edmx.tree.schemas[0].associations.len(), 1);
}

#[test]
fn test_read_path_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Edmx::read_path(dir.path().join("missing.xml")),
        Err(EdmxError::Io(_))
    ));
}

#[test]
fn test_document_without_declarations() {
    let xml = r#"<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
      <edmx:DataServices><Schema Namespace="Empty"/></edmx:DataServices>
    </edmx:Edmx>"#;
    assert!(matches!(
        resolve_edmx(xml.as_bytes(), &GenerationConfig::default()),
        Err(EdmxError::Resolve(ResolveError::Schema(_)))
    ));
}

#[test]
fn test_not_xml() {
    assert!(matches!(
        Edmx::read(b"<edmx:Edmx><unclosed></edmx:Edmx>"),
        Err(EdmxError::Xml { .. })
    ));
}
