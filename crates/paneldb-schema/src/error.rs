use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Compilation failure taxonomy. Every variant is fatal: no partial
/// descriptor is ever produced.
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("missing required key: {key}")]
    MissingField { key: String },

    #[error("duplicate field name: '{field}'")]
    DuplicateField { field: String },

    #[error("unknown field type '{token}' on field '{field}'")]
    UnknownType { field: String, token: String },

    #[error("field '{field}' declares autoIncrement = true with primaryKey = false")]
    ConflictingPrimaryKeyFlags { field: String },

    #[error("more than one primary key: '{first}' and '{second}'")]
    MultiplePrimaryKeys { first: String, second: String },

    #[error("format '{format}' is only valid on string fields (field '{field}')")]
    InvalidFormat { field: String, format: String },

    #[error("invalid identifier: '{ident}'")]
    InvalidIdentifier { ident: String },

    #[error("default value does not match the declared type of field '{field}'")]
    InvalidDefault { field: String },

    #[error("duplicate model name: '{model}'")]
    DuplicateModel { model: String },

    #[error("schema document is malformed: {message}")]
    Parse { message: String },

    #[error("schema source unavailable: {path} ({message})")]
    SourceUnavailable { path: String, message: String },
}
