pub mod entity;
pub mod field;
pub mod relation;

pub use entity::{CREATED_AT_FIELD, EntityDescriptor, UPDATED_AT_FIELD};
pub use field::{DefaultValue, FieldDescriptor, FieldType};
pub use relation::RelationHint;
