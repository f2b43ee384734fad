use crate::{error::SchemaError, node::field::DefaultValue};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::str::FromStr;

///
/// Document
///
/// Typed view of one declarative entity source. The `fields` sequence
/// follows the source mapping's declaration order, which the compiler
/// preserves into the descriptor.
///

#[derive(Clone, Debug, Serialize)]
pub struct Document {
    pub model: String,
    pub table: String,
    pub timestamps: bool,
    pub fields: Vec<(String, FieldSpec)>,
}

impl Document {
    /// Extract a document from parsed JSON, mapping structural problems to
    /// the schema error taxonomy.
    pub fn from_json(doc: &Json) -> Result<Self, SchemaError> {
        let root = doc.as_object().ok_or_else(|| SchemaError::Parse {
            message: "top level must be an object".to_string(),
        })?;

        let model = require_string(root, "model")?;
        let table = require_string(root, "table")?;

        let timestamps = match root.get("timestamps") {
            None => false,
            Some(value) => value.as_bool().ok_or_else(|| SchemaError::Parse {
                message: "'timestamps' must be a boolean".to_string(),
            })?,
        };

        let raw_fields = root
            .get("fields")
            .ok_or_else(|| SchemaError::MissingField {
                key: "fields".to_string(),
            })?
            .as_object()
            .ok_or_else(|| SchemaError::Parse {
                message: "'fields' must be an object".to_string(),
            })?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        for (name, raw) in raw_fields {
            let spec: FieldSpec =
                serde_json::from_value(raw.clone()).map_err(|err| SchemaError::Parse {
                    message: format!("field '{name}': {err}"),
                })?;
            fields.push((name.clone(), spec));
        }

        Ok(Self {
            model,
            table,
            timestamps,
            fields,
        })
    }
}

impl FromStr for Document {
    type Err = SchemaError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let doc: Json = serde_json::from_str(source).map_err(|err| SchemaError::Parse {
            message: err.to_string(),
        })?;

        Self::from_json(&doc)
    }
}

fn require_string(root: &serde_json::Map<String, Json>, key: &str) -> Result<String, SchemaError> {
    root.get(key)
        .ok_or_else(|| SchemaError::MissingField {
            key: key.to_string(),
        })?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| SchemaError::Parse {
            message: format!("'{key}' must be a string"),
        })
}

///
/// FieldSpec
///
/// Raw per-field declaration. Unknown keys are tolerated so documents can
/// carry UI-layer hints this core does not interpret.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub primary_key: Option<bool>,
    pub auto_increment: Option<bool>,
    pub required: Option<bool>,
    pub format: Option<String>,
    pub default: Option<DefaultValue>,
}
