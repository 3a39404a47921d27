#![allow(clippy::unwrap_used)]

use edmgen::config::{ConfigError, DecimalEncoding, GenerationConfig, QualificationMode};
use rstest::rstest;

#[rstest]
#[case("auto", "native", QualificationMode::Auto, DecimalEncoding::Native)]
#[case("ALWAYS", "opaque-string", QualificationMode::Always, DecimalEncoding::OpaqueString)]
#[case("none", "shopspring", QualificationMode::Never, DecimalEncoding::Native)]
#[case(" never ", "string", QualificationMode::Never, DecimalEncoding::OpaqueString)]
fn test_from_options(
    #[case] qualification: &str,
    #[case] decimals: &str,
    #[case] expected_mode: QualificationMode,
    #[case] expected_encoding: DecimalEncoding,
) {
    let config = GenerationConfig::from_options(qualification, decimals).unwrap();
    assert_eq!(config.qualification, expected_mode);
    assert_eq!(config.decimal_encoding, expected_encoding);
}

#[test]
fn test_invalid_option_names_the_option() {
    let err = GenerationConfig::from_options("sometimes", "native").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            option: "qualification",
            ..
        }
    ));
}

#[cfg(feature = "interchange")]
mod files {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edmgen.json");
        fs::write(
            &path,
            r#"{ "qualification": "always", "decimal_encoding": "opaque-string" }"#,
        )
        .unwrap();

        let config = GenerationConfig::load(&path).unwrap();
        assert_eq!(config.qualification, QualificationMode::Always);
        assert_eq!(config.decimal_encoding, DecimalEncoding::OpaqueString);
    }

    #[test]
    fn test_load_yaml_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edmgen.yml");
        fs::write(&path, "qualification: never\n").unwrap();

        let config = GenerationConfig::load(&path).unwrap();
        assert_eq!(config.qualification, QualificationMode::Never);
        assert_eq!(config.decimal_encoding, DecimalEncoding::Native);
    }

    #[rstest]
    #[case(r#"{ "qualification": "AUTO", "decimal_encoding": "Opaque-String" }"#)]
    #[case(r#"{ "qualification": " auto ", "decimal_encoding": "STRING" }"#)]
    fn test_json_values_parse_like_options(#[case] json: &str) {
        let config = GenerationConfig::from_json_str(json).unwrap();
        assert_eq!(
            config,
            GenerationConfig::from_options("auto", "opaque-string").unwrap()
        );
    }

    #[test]
    fn test_yaml_values_parse_like_options() {
        let yaml = "qualification: NEVER\ndecimal_encoding: ShopSpring\n";
        let config = GenerationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.qualification, QualificationMode::Never);
        assert_eq!(config.decimal_encoding, DecimalEncoding::Native);
    }

    #[test]
    fn test_invalid_value_in_file_is_rejected() {
        let err = GenerationConfig::from_json_str(r#"{ "qualification": "sometimes" }"#).unwrap_err();
        assert!(matches!(&err, ConfigError::Parse(message) if message.contains("qualification")));
    }

    #[test]
    fn test_serialized_form_is_canonical() {
        let config = GenerationConfig::from_options("ALWAYS", "string").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"qualification":"always","decimal_encoding":"opaque-string"}"#);
        assert_eq!(GenerationConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edmgen.json");
        fs::write(&path, r#"{ "qualify": "always" }"#).unwrap();

        assert!(matches!(
            GenerationConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edmgen.toml");
        fs::write(&path, "qualification = \"auto\"").unwrap();

        assert!(matches!(
            GenerationConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            GenerationConfig::load(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
