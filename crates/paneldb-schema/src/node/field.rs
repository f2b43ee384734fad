use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldType
///
/// Closed abstract-type vocabulary. Tokens are the document-level spelling;
/// anything outside this set is rejected at compile time.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Float,
    #[serde(rename = "string")]
    Text,
    Bool,
    #[serde(rename = "datetime")]
    DateTime,
    Enum,
}

impl FieldType {
    /// Resolve a document type token, `None` for unrecognized tokens.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::Text),
            "bool" => Some(Self::Bool),
            "datetime" => Some(Self::DateTime),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "string",
            Self::Bool => "bool",
            Self::DateTime => "datetime",
            Self::Enum => "enum",
        };
        write!(f, "{token}")
    }
}

///
/// DefaultValue
///
/// Schema-level default literal. Deliberately separate from the runtime
/// value type: descriptors must stay self-contained.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    /// Whether this literal is a legal default for the given type.
    ///
    /// Integer literals are accepted for float fields and for datetime
    /// fields (unix milliseconds); text literals double as enum variants.
    #[must_use]
    pub const fn matches(&self, ty: FieldType) -> bool {
        match self {
            Self::Bool(_) => matches!(ty, FieldType::Bool),
            Self::Int(_) => matches!(ty, FieldType::Int | FieldType::Float | FieldType::DateTime),
            Self::Float(_) => matches!(ty, FieldType::Float),
            Self::Text(_) => matches!(ty, FieldType::Text | FieldType::Enum),
        }
    }
}

///
/// FieldDescriptor
///
/// One field's compiled shape. Invariants are established by the compiler:
/// names are unique and valid identifiers, `auto_increment` implies
/// `primary_key`, `format` only appears on text fields.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: FieldType,
    pub required: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub format: Option<String>,
    pub default: Option<DefaultValue>,
}

impl FieldDescriptor {
    /// Plain data column: present in insert/update column sets.
    /// Auto-increment keys are excluded (storage assigns their value).
    #[must_use]
    pub const fn is_storage_assigned(&self) -> bool {
        self.auto_increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_covers_the_closed_vocabulary() {
        assert_eq!(FieldType::parse("int"), Some(FieldType::Int));
        assert_eq!(FieldType::parse("float"), Some(FieldType::Float));
        assert_eq!(FieldType::parse("string"), Some(FieldType::Text));
        assert_eq!(FieldType::parse("bool"), Some(FieldType::Bool));
        assert_eq!(FieldType::parse("datetime"), Some(FieldType::DateTime));
        assert_eq!(FieldType::parse("enum"), Some(FieldType::Enum));
        assert_eq!(FieldType::parse("varchar"), None);
        assert_eq!(FieldType::parse("String"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for ty in [
            FieldType::Int,
            FieldType::Float,
            FieldType::Text,
            FieldType::Bool,
            FieldType::DateTime,
            FieldType::Enum,
        ] {
            assert_eq!(FieldType::parse(&ty.to_string()), Some(ty));
        }
    }

    #[test]
    fn default_literal_type_matching() {
        assert!(DefaultValue::Int(1).matches(FieldType::Int));
        assert!(DefaultValue::Int(1).matches(FieldType::Float));
        assert!(DefaultValue::Int(0).matches(FieldType::DateTime));
        assert!(!DefaultValue::Int(1).matches(FieldType::Text));
        assert!(DefaultValue::Text("draft".into()).matches(FieldType::Enum));
        assert!(!DefaultValue::Float(1.5).matches(FieldType::Int));
        assert!(DefaultValue::Bool(true).matches(FieldType::Bool));
    }
}
