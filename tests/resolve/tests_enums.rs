#![allow(clippy::unwrap_used)]

use edmgen::base::{QualifiedName, codes};
use edmgen::resolve::{EnumCodecError, EnumPlan, EnumUnderlying, EnumWire, ResolvedModel};
use edmgen::schema::raw::{RawEnumType, RawSchema, SchemaTree};
use rstest::rstest;

use crate::helpers::assertions::assert_code_count;
use crate::helpers::fixtures::{resolve_default, sales_tree};

fn single_enum(raw: RawEnumType) -> ResolvedModel {
    resolve_default(&SchemaTree::new().with_schema(RawSchema::new("NS").with_enum(raw)))
}

fn plan<'a>(model: &'a ResolvedModel, name: &str) -> &'a EnumPlan {
    model.enum_plan(&QualifiedName::new("NS", name)).unwrap()
}

fn permissions() -> ResolvedModel {
    single_enum(
        RawEnumType::new("Permissions")
            .flags()
            .with_member_value("A", "1")
            .with_member_value("B", "2")
            .with_member_value("C", "4"),
    )
}

#[test]
fn test_status_values() {
    let model = resolve_default(&sales_tree());
    let status = model
        .enum_plan(&QualifiedName::new("com.acme.sales", "Status"))
        .unwrap();

    let values: Vec<_> = status.members().iter().map(|m| (&*m.name, m.value)).collect();
    assert_eq!(values, [("Open", 0), ("Closed", 5), ("Cancelled", 6)]);
}

#[rstest]
#[case("A,B", 3)]
#[case("A, C", 5)]
#[case("", 0)]
#[case("B", 2)]
#[case("A,B,C", 7)]
fn test_flags_decode(#[case] wire: &str, #[case] expected: i64) {
    let model = permissions();
    assert_eq!(plan(&model, "Permissions").decode_name(wire), Ok(expected));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(6)]
#[case(7)]
fn test_flags_encode_decode_round_trip(#[case] value: i64) {
    let model = permissions();
    let plan = plan(&model, "Permissions");
    assert_eq!(plan.decode(&plan.encode(value)), Ok(value));
}

#[test]
fn test_flags_unknown_member() {
    let model = permissions();
    assert!(matches!(
        plan(&model, "Permissions").decode_name("A,Z"),
        Err(EnumCodecError::InvalidMember { member, .. }) if member == "Z"
    ));
}

#[test]
fn test_plain_enum_round_trip() {
    let model = resolve_default(&sales_tree());
    let status = model
        .enum_plan(&QualifiedName::new("com.acme.sales", "Status"))
        .unwrap();

    for member in status.members() {
        let wire = status.encode(member.value);
        assert_eq!(wire, EnumWire::Name(member.name.to_string()));
        assert_eq!(status.decode(&wire), Ok(member.value));
    }
    assert_eq!(status.encode(42), EnumWire::Number(42));
}

#[rstest]
#[case("Edm.Byte", EnumUnderlying::Byte, "255", Some(255))]
#[case("Edm.Byte", EnumUnderlying::Byte, "256", None)]
#[case("Edm.SByte", EnumUnderlying::SByte, "-128", Some(-128))]
#[case("Edm.Int16", EnumUnderlying::Int16, "40000", None)]
#[case("Edm.Int64", EnumUnderlying::Int64, "9223372036854775807", Some(i64::MAX))]
fn test_explicit_values_checked_against_underlying(
    #[case] underlying: &str,
    #[case] expected_underlying: EnumUnderlying,
    #[case] value: &str,
    #[case] expected: Option<i64>,
) {
    let model = single_enum(
        RawEnumType::new("E")
            .with_underlying(underlying)
            .with_member_value("M", value),
    );
    let plan = plan(&model, "E");
    assert_eq!(plan.underlying(), expected_underlying);

    match expected {
        Some(v) => {
            assert_eq!(plan.value_of("M"), Some(v));
            assert_code_count(model.diagnostics(), codes::MALFORMED_ENUM_VALUE, 0);
        }
        None => {
            // Falls back to the counter.
            assert_eq!(plan.value_of("M"), Some(0));
            assert_code_count(model.diagnostics(), codes::MALFORMED_ENUM_VALUE, 1);
        }
    }
}

#[test]
fn test_duplicate_member_warning() {
    let model = single_enum(
        RawEnumType::new("E")
            .with_member("A")
            .with_member_value("A", "0")
            .with_member("B"),
    );
    let plan = plan(&model, "E");
    assert_eq!(plan.members().len(), 2);
    assert_eq!(plan.value_of("B"), Some(1));
    assert_code_count(model.diagnostics(), codes::DUPLICATE_ENUM_MEMBER, 1);
}

#[cfg(feature = "interchange")]
#[test]
fn test_json_null_is_zero() {
    let model = permissions();
    let plan = plan(&model, "Permissions");
    assert_eq!(plan.decode_json(&serde_json::Value::Null), Ok(0));
    assert_eq!(plan.decode_json(&serde_json::json!("C,A")), Ok(5));
}
