//! Generation configuration consumed by the resolution engine.
//!
//! Only two options influence resolution; everything else (paths, package
//! names, single-file vs split output) belongs to the renderer.
//!
//! ```text
//! qualification:    auto | always | never      (default: auto)
//! decimal_encoding: native | opaque-string     (default: native)
//! ```
//!
//! Invalid values are rejected when the configuration is loaded, before any
//! resolution begins.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unrecognized value for a known option.
    #[error("invalid value '{value}' for {option}: expected one of {expected}")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Configuration document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),

    /// Configuration file extension not recognized.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// When rendered type names carry their namespace alias.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum QualificationMode {
    /// Qualify only local names declared in two or more namespaces.
    #[default]
    Auto,
    /// Qualify every declared name.
    Always,
    /// Never qualify; collisions are the caller's problem.
    Never,
}

impl QualificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl FromStr for QualificationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" | "none" => Ok(Self::Never),
            _ => Err(ConfigError::InvalidValue {
                option: "qualification",
                value: s.to_string(),
                expected: "auto, always, never",
            }),
        }
    }
}

impl fmt::Display for QualificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Config files go through the same parser as command-line options.
impl TryFrom<String> for QualificationMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualificationMode> for String {
    fn from(mode: QualificationMode) -> Self {
        mode.as_str().to_string()
    }
}

/// How `Edm.Decimal` values are represented by renderers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum DecimalEncoding {
    /// A language-native decimal or floating type.
    #[default]
    Native,
    /// An opaque string carrying the decimal literal.
    OpaqueString,
}

impl DecimalEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::OpaqueString => "opaque-string",
        }
    }
}

impl FromStr for DecimalEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "shopspring" => Ok(Self::Native),
            "opaque-string" | "string" => Ok(Self::OpaqueString),
            _ => Err(ConfigError::InvalidValue {
                option: "decimal_encoding",
                value: s.to_string(),
                expected: "native, opaque-string",
            }),
        }
    }
}

impl fmt::Display for DecimalEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DecimalEncoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DecimalEncoding> for String {
    fn from(encoding: DecimalEncoding) -> Self {
        encoding.as_str().to_string()
    }
}

/// Options recognized by the resolution engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct GenerationConfig {
    /// Namespace qualification policy for rendered names.
    pub qualification: QualificationMode,
    /// Representation of `Edm.Decimal`.
    pub decimal_encoding: DecimalEncoding,
}

impl GenerationConfig {
    pub fn new(qualification: QualificationMode, decimal_encoding: DecimalEncoding) -> Self {
        Self {
            qualification,
            decimal_encoding,
        }
    }

    /// Set the qualification mode.
    pub fn with_qualification(mut self, mode: QualificationMode) -> Self {
        self.qualification = mode;
        self
    }

    /// Set the decimal encoding.
    pub fn with_decimal_encoding(mut self, encoding: DecimalEncoding) -> Self {
        self.decimal_encoding = encoding;
        self
    }

    /// Build from raw option strings (e.g. command-line flags).
    pub fn from_options(qualification: &str, decimal_encoding: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            qualification: qualification.parse()?,
            decimal_encoding: decimal_encoding.parse()?,
        })
    }
}

#[cfg(feature = "interchange")]
impl GenerationConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "json" => Self::from_json_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(
            "Loaded config from {}: qualification={}, decimal_encoding={}",
            path.display(),
            config.qualification,
            config.decimal_encoding
        );
        Ok(config)
    }
}
