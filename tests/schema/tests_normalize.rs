#![allow(clippy::unwrap_used)]

use edmgen::base::{Diagnostics, Nullability, QualifiedName, codes};
use edmgen::schema::raw::{
    RawAssociation, RawComplexType, RawEntityType, RawNavigation, RawProperty, RawSchema,
    SchemaTree,
};
use edmgen::schema::{Multiplicity, SchemaError, SchemaModel};

use crate::helpers::assertions::assert_code_count;
use crate::helpers::fixtures::sales_tree;

fn normalize(tree: &SchemaTree) -> (SchemaModel, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let model = SchemaModel::normalize(tree, &mut diagnostics).unwrap();
    (model, diagnostics)
}

#[test]
fn test_sales_fixture_normalizes_cleanly() {
    let (model, diagnostics) = normalize(&sales_tree());
    assert_eq!(model.namespace_count(), 2);
    assert_eq!(model.declaration_count(), 5);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
}

#[test]
fn test_alias_is_expanded_in_qualify() {
    let (model, _) = normalize(&sales_tree());
    assert_eq!(
        model.qualify("Sales.Order", "elsewhere"),
        QualifiedName::new("com.acme.sales", "Order")
    );
    assert_eq!(
        model.qualify("Order", "com.acme.sales"),
        QualifiedName::new("com.acme.sales", "Order")
    );
    assert!(model.lookup(&QualifiedName::new("com.acme.sales", "Status")).is_some());
}

fn northwind_v3() -> SchemaTree {
    SchemaTree::new().with_schema(
        RawSchema::new("NW")
            .with_entity(
                RawEntityType::new("Category")
                    .with_key("ID")
                    .with_property(RawProperty::new("ID", "Edm.Int32").not_nullable())
                    .with_navigation(RawNavigation::association(
                        "Products",
                        "NW.FK_Products_Categories",
                        "Categories",
                        "Products",
                    )),
            )
            .with_entity(
                RawEntityType::new("Product")
                    .with_key("ID")
                    .with_property(RawProperty::new("ID", "Edm.Int32").not_nullable())
                    .with_navigation(RawNavigation::association(
                        "Category",
                        "FK_Products_Categories",
                        "Products",
                        "Categories",
                    ))
                    .with_navigation(RawNavigation::association(
                        "Supplier",
                        "NW.FK_Products_Suppliers",
                        "Products",
                        "Suppliers",
                    )),
            )
            .with_association(
                RawAssociation::new("FK_Products_Categories")
                    .with_end("Categories", "NW.Category", "0..1")
                    .with_end("Products", "NW.Product", "*"),
            ),
    )
}

#[test]
fn test_v3_navigation_through_association() {
    let (model, diagnostics) = normalize(&northwind_v3());

    let category = model.declaration(&QualifiedName::new("NW", "Category")).unwrap();
    let products = &category.navigation[0];
    assert_eq!(products.type_ref.as_deref(), Some("Collection(NW.Product)"));
    assert_eq!(products.nullability, Nullability::Unspecified);

    let product = model.declaration(&QualifiedName::new("NW", "Product")).unwrap();
    assert_eq!(product.navigation[0].type_ref.as_deref(), Some("NW.Category"));
    let link = product.navigation[0].association.as_ref().unwrap();
    assert_eq!(link.relationship, QualifiedName::new("NW", "FK_Products_Categories"));

    // Supplier's association is not declared.
    assert_eq!(product.navigation[1].type_ref, None);
    assert_code_count(&diagnostics, codes::UNRESOLVED_ASSOCIATION, 1);

    let association = model
        .association(&QualifiedName::new("NW", "FK_Products_Categories"))
        .unwrap();
    assert_eq!(association.end("Products").unwrap().multiplicity, Multiplicity::Many);
}

#[test]
fn test_unknown_key_property_warns() {
    let tree = SchemaTree::new().with_schema(
        RawSchema::new("NS").with_entity(
            RawEntityType::new("Thing")
                .with_key("Id")
                .with_property(RawProperty::new("ID", "Edm.Int32")),
        ),
    );
    let (_, diagnostics) = normalize(&tree);
    assert_code_count(&diagnostics, codes::UNKNOWN_KEY_PROPERTY, 1);
}

#[test]
fn test_keyless_root_entity_warns() {
    let tree = SchemaTree::new().with_schema(
        RawSchema::new("NS")
            .with_entity(RawEntityType::new("Loose").with_property(RawProperty::new("ID", "Edm.Int32")))
            .with_entity(RawEntityType::new("Child").with_base("NS.Loose"))
            .with_complex(RawComplexType::new("Value")),
    );
    let (_, diagnostics) = normalize(&tree);
    assert_code_count(&diagnostics, codes::MISSING_KEY, 1);
    let subjects: Vec<_> = diagnostics
        .with_code(codes::MISSING_KEY)
        .filter_map(|d| d.subject.as_deref())
        .collect();
    assert_eq!(subjects, ["NS.Loose"]);
}

#[test]
fn test_key_declared_on_base_type() {
    let tree = SchemaTree::new().with_schema(
        RawSchema::new("NS")
            .with_entity(
                RawEntityType::new("Base").with_property(RawProperty::new("ID", "Edm.Int32")),
            )
            .with_entity(RawEntityType::new("Derived").with_base("NS.Base").with_key("ID")),
    );
    let (_, diagnostics) = normalize(&tree);
    assert_code_count(&diagnostics, codes::UNKNOWN_KEY_PROPERTY, 0);
}

#[test]
fn test_duplicate_declaration_is_fatal() {
    let tree = SchemaTree::new().with_schema(
        RawSchema::new("NS")
            .with_entity(RawEntityType::new("Thing"))
            .with_complex(RawComplexType::new("Thing")),
    );
    let err = SchemaModel::normalize(&tree, &mut Diagnostics::new()).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateDeclaration { .. }));
    assert_eq!(
        err.to_string(),
        "duplicate declaration 'NS.Thing': already declared as EntityType"
    );
}

#[test]
fn test_schemas_without_declarations_are_fatal() {
    let tree = SchemaTree::new().with_schema(RawSchema::new("Empty"));
    assert!(matches!(
        SchemaModel::normalize(&tree, &mut Diagnostics::new()),
        Err(SchemaError::NoDeclarations { namespaces: 1 })
    ));
}
