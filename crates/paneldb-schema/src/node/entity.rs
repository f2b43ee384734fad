use crate::node::{field::FieldDescriptor, relation::RelationHint};
use serde::{Deserialize, Serialize};

/// Column stamped at insert time when the entity tracks timestamps.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Column stamped on every committed mutation when the entity tracks
/// timestamps.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

///
/// EntityDescriptor
///
/// Compiled shape of one entity. Immutable after construction; runtimes
/// share it read-only (wrap in `Arc`). Field order is authoritative for
/// column ordering and error messages.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EntityDescriptor {
    model_name: String,
    table: String,
    timestamps: bool,
    fields: Vec<FieldDescriptor>,
    relations: Vec<RelationHint>,
    pk_index: usize,
}

impl EntityDescriptor {
    /// Invariant (compiler-enforced): exactly one field at `pk_index` has
    /// `primary_key = true`.
    pub(crate) fn new(
        model_name: String,
        table: String,
        timestamps: bool,
        fields: Vec<FieldDescriptor>,
        relations: Vec<RelationHint>,
        pk_index: usize,
    ) -> Self {
        debug_assert!(fields[pk_index].primary_key);

        Self {
            model_name,
            table,
            timestamps,
            fields,
            relations,
            pk_index,
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn timestamps(&self) -> bool {
        self.timestamps
    }

    /// Ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn primary_key(&self) -> &FieldDescriptor {
        &self.fields[self.pk_index]
    }

    /// Best-effort relationship hints derived from `...Id` field names.
    #[must_use]
    pub fn relations(&self) -> &[RelationHint] {
        &self.relations
    }
}
