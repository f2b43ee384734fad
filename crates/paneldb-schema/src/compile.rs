use crate::{
    MAX_FIELD_NAME_LEN, MAX_MODEL_NAME_LEN,
    document::{Document, FieldSpec},
    error::SchemaError,
    node::{
        CREATED_AT_FIELD, EntityDescriptor, FieldDescriptor, FieldType, RelationHint,
        UPDATED_AT_FIELD,
    },
};
use std::{collections::BTreeSet, fs, path::Path};
use tracing::debug;

/// Compile one declarative document into an immutable descriptor.
///
/// Pure and deterministic: the same document always yields a structurally
/// identical descriptor, with field order preserved. Per-field derivation
/// order: type resolution, primary-key flag, `id` synthesis when no field
/// declares a key, auto-increment forcing the key flag.
pub fn compile(document: &Document) -> Result<EntityDescriptor, SchemaError> {
    check_ident(&document.model, MAX_MODEL_NAME_LEN)?;
    check_ident(&document.table, MAX_MODEL_NAME_LEN)?;

    let mut seen = BTreeSet::new();
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(document.fields.len() + 3);
    let mut pk_index: Option<usize> = None;

    for (name, spec) in &document.fields {
        check_ident(name, MAX_FIELD_NAME_LEN)?;
        if !seen.insert(name.clone()) {
            return Err(SchemaError::DuplicateField {
                field: name.clone(),
            });
        }

        let field = compile_field(name, spec)?;
        if field.primary_key {
            if let Some(first) = pk_index {
                return Err(SchemaError::MultiplePrimaryKeys {
                    first: fields[first].name.clone(),
                    second: name.clone(),
                });
            }
            pk_index = Some(fields.len());
        }

        fields.push(field);
    }

    // No declared key: synthesize `id`, inserted as the first field.
    let pk_index = match pk_index {
        Some(index) => index,
        None => {
            if seen.contains("id") {
                return Err(SchemaError::DuplicateField {
                    field: "id".to_string(),
                });
            }
            fields.insert(0, synthesized_id());
            0
        }
    };

    if document.timestamps {
        for name in [CREATED_AT_FIELD, UPDATED_AT_FIELD] {
            if seen.contains(name) {
                return Err(SchemaError::DuplicateField {
                    field: name.to_string(),
                });
            }
            fields.push(timestamp_field(name));
        }
    }

    let relations = fields
        .iter()
        .filter_map(|f| RelationHint::from_field_name(&f.name))
        .collect();

    debug!(
        model = %document.model,
        table = %document.table,
        fields = fields.len(),
        "compiled entity descriptor"
    );

    Ok(EntityDescriptor::new(
        document.model.clone(),
        document.table.clone(),
        document.timestamps,
        fields,
        relations,
        pk_index,
    ))
}

/// Compile from JSON source text.
pub fn compile_str(source: &str) -> Result<EntityDescriptor, SchemaError> {
    compile(&source.parse::<Document>()?)
}

/// Compile from a schema file on disk.
pub fn compile_file(path: impl AsRef<Path>) -> Result<EntityDescriptor, SchemaError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| SchemaError::SourceUnavailable {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    compile_str(&source)
}

fn compile_field(name: &str, spec: &FieldSpec) -> Result<FieldDescriptor, SchemaError> {
    let token = spec.ty.as_deref().ok_or_else(|| SchemaError::MissingField {
        key: format!("fields.{name}.type"),
    })?;
    let ty = FieldType::parse(token).ok_or_else(|| SchemaError::UnknownType {
        field: name.to_string(),
        token: token.to_string(),
    })?;

    let auto_increment = spec.auto_increment.unwrap_or(false);
    // Auto-increment forces the key flag; an explicit opt-out conflicts.
    if auto_increment && spec.primary_key == Some(false) {
        return Err(SchemaError::ConflictingPrimaryKeyFlags {
            field: name.to_string(),
        });
    }
    let primary_key = spec.primary_key.unwrap_or(false) || auto_increment;

    if let Some(format) = &spec.format
        && !ty.is_text()
    {
        return Err(SchemaError::InvalidFormat {
            field: name.to_string(),
            format: format.clone(),
        });
    }

    if let Some(default) = &spec.default
        && !default.matches(ty)
    {
        return Err(SchemaError::InvalidDefault {
            field: name.to_string(),
        });
    }

    Ok(FieldDescriptor {
        name: name.to_string(),
        ty,
        // A primary key is implicitly required; the runtime still exempts
        // it from the null check (storage assigns its value on insert).
        required: spec.required.unwrap_or(false) || primary_key,
        primary_key,
        auto_increment,
        format: spec.format.clone(),
        default: spec.default.clone(),
    })
}

fn synthesized_id() -> FieldDescriptor {
    FieldDescriptor {
        name: "id".to_string(),
        ty: FieldType::Int,
        required: true,
        primary_key: true,
        auto_increment: true,
        format: None,
        default: None,
    }
}

fn timestamp_field(name: &str) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        ty: FieldType::DateTime,
        required: false,
        primary_key: false,
        auto_increment: false,
        format: None,
        default: None,
    }
}

fn check_ident(ident: &str, max_len: usize) -> Result<(), SchemaError> {
    let valid = ident.len() <= max_len
        && ident
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && ident
            .chars()
            .skip(1)
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            ident: ident.to_string(),
        })
    }
}
