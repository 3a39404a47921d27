//! Error types for resolution and enum codecs.

use thiserror::Error;

use crate::base::QualifiedName;
use crate::schema::SchemaError;

/// Fatal resolution errors. Recoverable problems become diagnostics instead.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The same member name declared twice with different values.
    #[error("enum '{enum_name}': member '{member}' declared with conflicting values {first} and {second}")]
    ConflictingEnumMember {
        enum_name: QualifiedName,
        member: String,
        first: i64,
        second: i64,
    },
}

/// Errors raised while decoding wire values of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumCodecError {
    #[error("'{member}' is not a member of enum '{enum_name}'")]
    InvalidMember { enum_name: String, member: String },

    #[error("value {value} is out of range for enum '{enum_name}' ({underlying})")]
    OutOfRange {
        enum_name: String,
        value: i128,
        underlying: &'static str,
    },

    #[error("enum '{enum_name}' cannot be decoded from {found}")]
    UnsupportedWire { enum_name: String, found: String },
}

impl EnumCodecError {
    pub fn invalid_member(enum_name: &QualifiedName, member: impl Into<String>) -> Self {
        Self::InvalidMember {
            enum_name: enum_name.to_string(),
            member: member.into(),
        }
    }

    pub fn unsupported_wire(enum_name: &QualifiedName, found: impl Into<String>) -> Self {
        Self::UnsupportedWire {
            enum_name: enum_name.to_string(),
            found: found.into(),
        }
    }
}
