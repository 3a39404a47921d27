//! Enum value assignment and wire codecs.
//!
//! Members receive values in declaration order from a running counter:
//!
//! ```text
//! <Member Name="Open"/>               Open      = 0
//! <Member Name="Closed" Value="5"/>   Closed    = 5
//! <Member Name="Cancelled"/>          Cancelled = 6
//! ```
//!
//! Wire values are either a member name (a comma-separated list for flags
//! enums) or the underlying number.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error::{EnumCodecError, ResolveError};
use super::primitive::PrimitiveKind;
use crate::base::{Diagnostics, QualifiedName, codes, split_qualified};
use crate::schema::EnumType;

/// Integer types an enum may be backed by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnumUnderlying {
    Byte,
    SByte,
    Int16,
    #[default]
    Int32,
    Int64,
}

impl EnumUnderlying {
    /// Parse an `UnderlyingType` attribute. `None` means the default,
    /// `Edm.Int32`; an unsupported type yields `Err` with the raw text.
    pub fn from_type_ref(raw: Option<&str>) -> Result<Self, &str> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(Self::default());
        };
        let (_, local) = split_qualified(raw);
        match PrimitiveKind::from_local_name(local) {
            Some(PrimitiveKind::Byte) => Ok(Self::Byte),
            Some(PrimitiveKind::SByte) => Ok(Self::SByte),
            Some(PrimitiveKind::Int16) => Ok(Self::Int16),
            Some(PrimitiveKind::Int32) => Ok(Self::Int32),
            Some(PrimitiveKind::Int64) => Ok(Self::Int64),
            _ => Err(raw),
        }
    }

    pub fn primitive(self) -> PrimitiveKind {
        match self {
            Self::Byte => PrimitiveKind::Byte,
            Self::SByte => PrimitiveKind::SByte,
            Self::Int16 => PrimitiveKind::Int16,
            Self::Int32 => PrimitiveKind::Int32,
            Self::Int64 => PrimitiveKind::Int64,
        }
    }

    pub fn edm_name(self) -> &'static str {
        match self {
            Self::Byte => "Edm.Byte",
            Self::SByte => "Edm.SByte",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
        }
    }

    /// Inclusive value range.
    pub fn range(self) -> (i64, i64) {
        match self {
            Self::Byte => (u8::MIN as i64, u8::MAX as i64),
            Self::SByte => (i8::MIN as i64, i8::MAX as i64),
            Self::Int16 => (i16::MIN as i64, i16::MAX as i64),
            Self::Int32 => (i32::MIN as i64, i32::MAX as i64),
            Self::Int64 => (i64::MIN, i64::MAX),
        }
    }

    pub fn contains(self, value: i128) -> bool {
        let (min, max) = self.range();
        (min as i128..=max as i128).contains(&value)
    }

    /// Parse an explicit member value and check it against the range.
    fn parse_value(self, raw: &str) -> Result<i64, String> {
        let value: i128 = raw
            .trim()
            .parse()
            .map_err(|_| format!("'{raw}' is not an integer"))?;
        if !self.contains(value) {
            return Err(format!("{value} does not fit in {}", self.edm_name()));
        }
        // In range, so it fits in i64.
        Ok(value as i64)
    }
}

/// A member after value assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedMember {
    pub name: Arc<str>,
    pub value: i64,
    /// The value came from a valid `Value` attribute.
    pub explicit: bool,
}

/// A wire-level enum value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumWire {
    Name(String),
    Number(i64),
}

/// Value assignment plus lookup tables for one enum type.
#[derive(Clone, Debug)]
pub struct EnumPlan {
    name: QualifiedName,
    underlying: EnumUnderlying,
    is_flags: bool,
    members: Vec<PlannedMember>,
    by_name: IndexMap<Arc<str>, i64>,
    by_value: BTreeMap<i64, Arc<str>>,
}

impl EnumPlan {
    /// Assign member values.
    ///
    /// Malformed or out-of-range values fall back to the counter (`W0001`).
    /// A member left without a value that fits the underlying type, because
    /// the counter ran past its maximum, is dropped (`W0001`). A repeated
    /// member with the same value is dropped (`W0003`); a repeated
    /// member with a different value is fatal.
    pub fn plan(enum_type: &EnumType, diagnostics: &mut Diagnostics) -> Result<Self, ResolveError> {
        let name = enum_type.name.clone();
        let underlying = match EnumUnderlying::from_type_ref(enum_type.underlying_type.as_deref()) {
            Ok(underlying) => underlying,
            Err(raw) => {
                diagnostics.warn(
                    codes::UNSUPPORTED_UNDERLYING_TYPE,
                    name.to_string(),
                    format!("unsupported underlying type '{raw}', using Edm.Int32"),
                );
                EnumUnderlying::Int32
            }
        };

        let mut plan = Self {
            name,
            underlying,
            is_flags: enum_type.is_flags,
            members: Vec::with_capacity(enum_type.members.len()),
            by_name: IndexMap::new(),
            by_value: BTreeMap::new(),
        };

        // `None` once the counter has run past `i64::MAX`.
        let mut counter: Option<i64> = Some(0);
        let mut previous: Option<Arc<str>> = None;
        for member in &enum_type.members {
            let subject = format!("{}.{}", plan.name, member.name);
            let (assigned, explicit) = match member.value.as_deref() {
                Some(raw) => match underlying.parse_value(raw) {
                    Ok(value) => (Some(value), true),
                    Err(reason) => match counter {
                        Some(next) if underlying.contains(next as i128) => {
                            diagnostics.warn(
                                codes::MALFORMED_ENUM_VALUE,
                                subject.as_str(),
                                format!("{reason}; using {next}"),
                            );
                            (Some(next), false)
                        }
                        _ => {
                            diagnostics.warn(
                                codes::MALFORMED_ENUM_VALUE,
                                subject.as_str(),
                                format!("{reason}; no value left, member dropped"),
                            );
                            continue;
                        }
                    },
                },
                None => (counter, false),
            };
            let value = match assigned {
                Some(value) if underlying.contains(value as i128) => value,
                Some(value) => {
                    diagnostics.warn(
                        codes::MALFORMED_ENUM_VALUE,
                        subject.as_str(),
                        format!(
                            "assigned value {value} does not fit in {}; member dropped",
                            underlying.edm_name()
                        ),
                    );
                    continue;
                }
                None => {
                    let after = previous.as_deref().unwrap_or("the first member");
                    diagnostics.warn(
                        codes::MALFORMED_ENUM_VALUE,
                        subject.as_str(),
                        format!("no value left after {after}; member dropped"),
                    );
                    continue;
                }
            };
            counter = value.checked_add(1);
            previous = Some(member.name.clone());

            if let Some(&first) = plan.by_name.get(&*member.name) {
                if first == value {
                    diagnostics.warn(
                        codes::DUPLICATE_ENUM_MEMBER,
                        subject.as_str(),
                        format!("member '{}' declared twice", member.name),
                    );
                    continue;
                }
                return Err(ResolveError::ConflictingEnumMember {
                    enum_name: plan.name,
                    member: member.name.to_string(),
                    first,
                    second: value,
                });
            }

            plan.by_name.insert(member.name.clone(), value);
            plan.by_value.entry(value).or_insert_with(|| member.name.clone());
            plan.members.push(PlannedMember {
                name: member.name.clone(),
                value,
                explicit,
            });
        }

        tracing::trace!(
            "planned enum {} with {} members ({})",
            plan.name,
            plan.members.len(),
            plan.underlying.edm_name()
        );
        Ok(plan)
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn underlying(&self) -> EnumUnderlying {
        self.underlying
    }

    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// Members in declaration order, duplicates removed.
    pub fn members(&self) -> &[PlannedMember] {
        &self.members
    }

    pub fn value_of(&self, member: &str) -> Option<i64> {
        self.by_name.get(member).copied()
    }

    /// The first-declared member carrying `value`.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.by_value.get(&value).map(|name| name.as_ref())
    }

    /// The zero value, used when the wire carries null.
    pub fn zero_value(&self) -> i64 {
        0
    }

    // ========================================================================
    // CODEC
    // ========================================================================

    pub fn decode(&self, wire: &EnumWire) -> Result<i64, EnumCodecError> {
        match wire {
            EnumWire::Name(text) => self.decode_name(text),
            EnumWire::Number(value) => self.decode_number(*value),
        }
    }

    /// Decode a member name, or for flags enums a comma-separated list of
    /// names. An empty flags list decodes to `0`.
    pub fn decode_name(&self, text: &str) -> Result<i64, EnumCodecError> {
        if !self.is_flags {
            return self
                .value_of(text)
                .ok_or_else(|| EnumCodecError::invalid_member(&self.name, text));
        }

        let mut value = 0;
        for part in text.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            value |= self
                .value_of(part)
                .ok_or_else(|| EnumCodecError::invalid_member(&self.name, part))?;
        }
        Ok(value)
    }

    /// Accept a raw number if it fits the underlying type.
    pub fn decode_number(&self, value: i64) -> Result<i64, EnumCodecError> {
        self.check_range(value as i128)?;
        Ok(value)
    }

    fn check_range(&self, value: i128) -> Result<(), EnumCodecError> {
        if self.underlying.contains(value) {
            Ok(())
        } else {
            Err(EnumCodecError::OutOfRange {
                enum_name: self.name.to_string(),
                value,
                underlying: self.underlying.edm_name(),
            })
        }
    }

    /// Encode a value as a member name when one matches (or, for flags, when
    /// the value decomposes exactly into members); otherwise as a number.
    pub fn encode(&self, value: i64) -> EnumWire {
        if let Some(name) = self.name_of(value) {
            return EnumWire::Name(name.to_string());
        }
        if self.is_flags && value != 0 {
            let mut remaining = value;
            let mut names = Vec::new();
            for member in &self.members {
                let bits = member.value;
                if bits != 0 && value & bits == bits && remaining & bits != 0 {
                    names.push(member.name.as_ref());
                    remaining &= !bits;
                }
            }
            if remaining == 0 {
                return EnumWire::Name(names.join(","));
            }
        }
        EnumWire::Number(value)
    }

    /// Decode a JSON wire value: a string, an integer, or `null` (the zero
    /// value).
    #[cfg(feature = "interchange")]
    pub fn decode_json(&self, value: &serde_json::Value) -> Result<i64, EnumCodecError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(self.zero_value()),
            Value::String(text) => self.decode_name(text),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    self.decode_number(value)
                } else if let Some(value) = number.as_u64() {
                    self.check_range(value as i128)?;
                    Ok(value as i64)
                } else {
                    Err(EnumCodecError::unsupported_wire(&self.name, number.to_string()))
                }
            }
            Value::Bool(_) => Err(EnumCodecError::unsupported_wire(&self.name, "a boolean")),
            Value::Array(_) => Err(EnumCodecError::unsupported_wire(&self.name, "an array")),
            Value::Object(_) => Err(EnumCodecError::unsupported_wire(&self.name, "an object")),
        }
    }

    #[cfg(feature = "interchange")]
    pub fn encode_json(&self, value: i64) -> serde_json::Value {
        match self.encode(value) {
            EnumWire::Name(name) => serde_json::Value::String(name),
            EnumWire::Number(number) => serde_json::Value::from(number),
        }
    }
}
