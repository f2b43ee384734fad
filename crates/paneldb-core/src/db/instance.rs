use crate::{
    db::connector::Row,
    error::{Error, InvalidStateError, ValidationError},
    value::Value,
};
use paneldb_schema::node::EntityDescriptor;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

const NULL: Value = Value::Null;

///
/// InstanceState
///
/// `Deleted` is terminal: any further mutation attempt fails.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InstanceState {
    New,
    Persisted,
    Deleted,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Persisted => "persisted",
            Self::Deleted => "deleted",
        };
        write!(f, "{label}")
    }
}

///
/// ModelInstance
///
/// A live record bound to one descriptor: attribute map, dirty set, and
/// lifecycle state. Owned by whichever caller created it; the runtime
/// never retains instances across calls.
///

#[derive(Clone, Debug)]
pub struct ModelInstance {
    descriptor: Arc<EntityDescriptor>,
    attributes: BTreeMap<String, Value>,
    dirty: BTreeSet<String>,
    state: InstanceState,
}

impl ModelInstance {
    #[must_use]
    pub const fn new(descriptor: Arc<EntityDescriptor>) -> Self {
        Self {
            descriptor,
            attributes: BTreeMap::new(),
            dirty: BTreeSet::new(),
            state: InstanceState::New,
        }
    }

    /// Build a `Persisted` instance from a storage row, keeping only
    /// columns the descriptor knows about.
    pub(crate) fn hydrated(descriptor: Arc<EntityDescriptor>, mut row: Row) -> Self {
        let attributes = descriptor
            .fields()
            .iter()
            .filter_map(|field| {
                row.remove(&field.name)
                    .filter(|value| !value.is_null())
                    .map(|value| (field.name.clone(), value))
            })
            .collect();

        Self {
            descriptor,
            attributes,
            dirty: BTreeSet::new(),
            state: InstanceState::Persisted,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    #[must_use]
    pub const fn state(&self) -> InstanceState {
        self.state
    }

    /// Attribute value, `Null` when unset.
    #[must_use]
    pub fn get(&self, field: &str) -> &Value {
        self.attributes.get(field).unwrap_or(&NULL)
    }

    /// Set an attribute and mark it dirty.
    ///
    /// Rejects mutation of a deleted instance, unknown fields, and values
    /// that do not fit the field's declared type.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), Error> {
        if self.state == InstanceState::Deleted {
            return Err(InvalidStateError {
                op: "set",
                state: self.state,
            }
            .into());
        }

        let value = value.into();
        let descriptor_field =
            self.descriptor
                .field(field)
                .ok_or_else(|| ValidationError::UnknownField {
                    field: field.to_string(),
                    model: self.descriptor.model_name().to_string(),
                })?;

        if !value.matches(descriptor_field.ty) {
            return Err(ValidationError::TypeMismatch {
                field: field.to_string(),
                expected: descriptor_field.ty.to_string(),
                found: value.type_name(),
            }
            .into());
        }

        self.attributes.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());

        Ok(())
    }

    /// Runtime-internal write skipping the field checks (primary-key
    /// write-back, timestamp stamping). Still marks dirty; commit clears.
    pub(crate) fn force_set(&mut self, field: &str, value: Value) {
        self.attributes.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());
    }

    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Attributes changed since the last successful persist.
    #[must_use]
    pub const fn dirty_fields(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[must_use]
    pub fn primary_key_value(&self) -> &Value {
        self.get(&self.descriptor.primary_key().name)
    }

    pub(crate) fn commit_persisted(&mut self) {
        self.state = InstanceState::Persisted;
        self.dirty.clear();
    }

    pub(crate) fn commit_deleted(&mut self) {
        self.state = InstanceState::Deleted;
    }
}
