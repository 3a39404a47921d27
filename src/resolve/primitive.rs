//! The fixed table of EDM primitive types.

use std::fmt;

use crate::base::EDM_NAMESPACE;

/// An EDM primitive type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    String,
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 8-bit integer.
    SByte,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Single,
    Double,
    Decimal,
    Guid,
    Date,
    DateTime,
    DateTimeOffset,
    TimeOfDay,
    /// EDM v3 time of day / duration-like value.
    Time,
    Duration,
    Binary,
    Stream,
}

impl PrimitiveKind {
    /// Every kind in the table, in declaration order.
    pub const ALL: [PrimitiveKind; 22] = [
        Self::String,
        Self::Boolean,
        Self::Byte,
        Self::SByte,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Single,
        Self::Double,
        Self::Decimal,
        Self::Guid,
        Self::Date,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::TimeOfDay,
        Self::Time,
        Self::Duration,
        Self::Binary,
        Self::Stream,
    ];

    /// Look up a primitive by its local name (`"Int32"`, not `"Edm.Int32"`).
    /// Matching is case-sensitive.
    pub fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Byte" => Self::Byte,
            "SByte" => Self::SByte,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "UInt16" => Self::UInt16,
            "UInt32" => Self::UInt32,
            "UInt64" => Self::UInt64,
            "Single" => Self::Single,
            "Double" => Self::Double,
            "Decimal" => Self::Decimal,
            "Guid" => Self::Guid,
            "Date" => Self::Date,
            "DateTime" => Self::DateTime,
            "DateTimeOffset" => Self::DateTimeOffset,
            "TimeOfDay" => Self::TimeOfDay,
            "Time" => Self::Time,
            "Duration" => Self::Duration,
            "Binary" => Self::Binary,
            "Stream" => Self::Stream,
            _ => return None,
        })
    }

    /// Look up a primitive by its full `Edm.` name.
    pub fn from_edm_name(name: &str) -> Option<Self> {
        name.strip_prefix(EDM_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(Self::from_local_name)
    }

    pub fn local_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::SByte => "SByte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Guid => "Guid",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::TimeOfDay => "TimeOfDay",
            Self::Time => "Time",
            Self::Duration => "Duration",
            Self::Binary => "Binary",
            Self::Stream => "Stream",
        }
    }

    /// Kinds whose natural representation already has an "empty" state
    /// (text, bytes, timestamps), so a nullable field needs no optional
    /// wrapper.
    pub fn is_empty_representable(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Binary
                | Self::Stream
                | Self::Date
                | Self::DateTime
                | Self::DateTimeOffset
                | Self::TimeOfDay
                | Self::Time
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{EDM_NAMESPACE}.{}", self.local_name())
    }
}

/// How a primitive is represented by renderers.
///
/// Only `Edm.Decimal` can be switched to an opaque string, and only globally
/// through [`DecimalEncoding`](crate::config::DecimalEncoding).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveRepr {
    #[default]
    Native,
    OpaqueString,
}
