//! Schema layer for paneldb: declarative entity documents, the compiler
//! that turns them into immutable descriptors, and the registry used for
//! lazy relation resolution.

pub mod compile;
pub mod document;
pub mod error;
pub mod node;
pub mod registry;

/// Maximum length for model and table identifiers.
pub const MAX_MODEL_NAME_LEN: usize = 64;

/// Maximum length for field identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

pub use compile::{compile, compile_file, compile_str};
pub use error::SchemaError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        compile::{compile, compile_file, compile_str},
        document::{Document, FieldSpec},
        error::SchemaError,
        node::{DefaultValue, EntityDescriptor, FieldDescriptor, FieldType, RelationHint},
        registry::DescriptorRegistry,
    };
}
