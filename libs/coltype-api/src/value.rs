use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Domain-side value produced by `decode` and consumed by `encode`.
///
/// The host treats it as an opaque scalar: it only compares, hashes,
/// copies and caches it through the owning `UserType`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum DomainValue {
    Bool(bool),
    Timestamp(Timestamp),
    Enum(EnumMember),
}

impl DomainValue {
    /// Short kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainValue::Bool(_) => "boolean",
            DomainValue::Timestamp(_) => "timestamp",
            DomainValue::Enum(_) => "enum",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DomainValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            DomainValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_timestamp_mut(&mut self) -> Option<&mut Timestamp> {
        match self {
            DomainValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumMember> {
        match self {
            DomainValue::Enum(m) => Some(*m),
            _ => None,
        }
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainValue::Bool(b) => write!(f, "{b}"),
            DomainValue::Timestamp(ts) => write!(f, "{ts}"),
            DomainValue::Enum(m) => write!(f, "{m}"),
        }
    }
}

impl From<bool> for DomainValue {
    fn from(b: bool) -> Self {
        DomainValue::Bool(b)
    }
}

impl From<Timestamp> for DomainValue {
    fn from(ts: Timestamp) -> Self {
        DomainValue::Timestamp(ts)
    }
}

impl From<EnumMember> for DomainValue {
    fn from(m: EnumMember) -> Self {
        DomainValue::Enum(m)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Zone-less date-time whose fields can be changed in place.
///
/// Not `Copy`: cache and merge paths take explicit copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Midnight of the given calendar day. `None` for an invalid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|d| Self(d.and_time(NaiveTime::MIN)))
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, min, sec)
            .map(Self)
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn set(&mut self, value: NaiveDateTime) {
        self.0 = value;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.0 = date.and_time(self.0.time());
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.0 = self.0.date().and_time(time);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// EnumMember
// ---------------------------------------------------------------------------

/// Canonical handle to one member of a registered enum type.
///
/// Identity is `(type_name, ordinal)`; the name is carried for display.
#[derive(Debug, Clone, Copy)]
pub struct EnumMember {
    type_name: &'static str,
    name: &'static str,
    ordinal: usize,
}

impl EnumMember {
    pub fn new(type_name: &'static str, name: &'static str, ordinal: usize) -> Self {
        Self {
            type_name,
            name,
            ordinal,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal && self.type_name == other.type_name
    }
}

impl Eq for EnumMember {}

impl Hash for EnumMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.ordinal.hash(state);
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl serde::Serialize for EnumMember {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}
