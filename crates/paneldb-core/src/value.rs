use paneldb_schema::node::{DefaultValue, FieldType};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// Value
///
/// Runtime attribute representation: one variant per abstract field type,
/// plus `Null` for absent values. Timestamps are unix milliseconds.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Timestamp(i64),
    Enum(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value can be stored in a field of the given type.
    /// `Null` is compatible with every type; nullability is enforced by
    /// the save-time required check, not here.
    #[must_use]
    pub const fn matches(&self, ty: FieldType) -> bool {
        match self {
            Self::Null => true,
            Self::Int(_) => matches!(ty, FieldType::Int),
            Self::Float(_) => matches!(ty, FieldType::Float),
            Self::Bool(_) => matches!(ty, FieldType::Bool),
            Self::Text(_) => matches!(ty, FieldType::Text),
            Self::Timestamp(_) => matches!(ty, FieldType::DateTime),
            Self::Enum(_) => matches!(ty, FieldType::Enum),
        }
    }

    /// Materialize a schema-level default literal for a field type.
    /// The compiler has already checked the literal against the type.
    #[must_use]
    pub fn from_default(default: &DefaultValue, ty: FieldType) -> Self {
        match (default, ty) {
            (DefaultValue::Int(v), FieldType::DateTime) => Self::Timestamp(*v),
            #[expect(clippy::cast_precision_loss)]
            (DefaultValue::Int(v), FieldType::Float) => Self::Float(*v as f64),
            (DefaultValue::Int(v), _) => Self::Int(*v),
            (DefaultValue::Float(v), _) => Self::Float(*v),
            (DefaultValue::Bool(v), _) => Self::Bool(*v),
            (DefaultValue::Text(v), FieldType::Enum) => Self::Enum(v.clone()),
            (DefaultValue::Text(v), _) => Self::Text(v.clone()),
        }
    }

    /// Convert submitted JSON into a typed value, `None` on a type
    /// mismatch. Datetime accepts unix milliseconds or an RFC 3339 string.
    #[must_use]
    pub fn from_json(json: &Json, ty: FieldType) -> Option<Self> {
        if json.is_null() {
            return Some(Self::Null);
        }

        match ty {
            FieldType::Int => json.as_i64().map(Self::Int),
            FieldType::Float => json.as_f64().map(Self::Float),
            FieldType::Bool => json.as_bool().map(Self::Bool),
            FieldType::Text => json.as_str().map(|s| Self::Text(s.to_string())),
            FieldType::Enum => json.as_str().map(|s| Self::Enum(s.to_string())),
            FieldType::DateTime => match json {
                Json::Number(_) => json.as_i64().map(Self::Timestamp),
                Json::String(s) => OffsetDateTime::parse(s, &Rfc3339)
                    .ok()
                    .map(|dt| Self::Timestamp(unix_millis(dt))),
                _ => None,
            },
        }
    }

    /// Current wall-clock time as a timestamp value.
    #[must_use]
    pub fn timestamp_now() -> Self {
        Self::Timestamp(unix_millis(OffsetDateTime::now_utc()))
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
            Self::Timestamp(_) => "datetime",
            Self::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) | Self::Enum(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[expect(clippy::cast_possible_truncation)]
fn unix_millis(dt: OffsetDateTime) -> i64 {
    (dt.unix_timestamp_nanos() / 1_000_000) as i64
}
