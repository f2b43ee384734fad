use crate::{
    ctx,
    db::{
        connector::StorageConnector,
        instance::{InstanceState, ModelInstance},
        query::{Direction, QueryBuilder},
    },
    error::{Error, InvalidStateError, ValidationError},
    obs::{self, EventKind, LifecycleEvent, LifecycleSink},
    value::Value,
};
use paneldb_schema::node::{CREATED_AT_FIELD, EntityDescriptor, UPDATED_AT_FIELD};
use std::sync::Arc;
use tracing::debug;

///
/// ModelRuntime
///
/// CRUD lifecycle engine bound to one descriptor and an external storage
/// connector. Instances are owned by callers; the runtime never retains
/// them across calls. One instance must not be driven concurrently from
/// two requests — that is a caller error, not guarded here.
///

pub struct ModelRuntime {
    descriptor: Arc<EntityDescriptor>,
    connector: Arc<dyn StorageConnector>,
    sinks: Vec<Arc<dyn LifecycleSink>>,
}

impl ModelRuntime {
    #[must_use]
    pub fn new(descriptor: Arc<EntityDescriptor>, connector: Arc<dyn StorageConnector>) -> Self {
        Self {
            descriptor,
            connector,
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    /// Fresh `New` instance bound to this runtime's descriptor.
    #[must_use]
    pub fn instance(&self) -> ModelInstance {
        ModelInstance::new(Arc::clone(&self.descriptor))
    }

    /// Observe this runtime's committed mutations. Sinks run
    /// synchronously, in registration order, before global sinks.
    pub fn subscribe(&mut self, sink: Arc<dyn LifecycleSink>) {
        self.sinks.push(sink);
    }

    // ======================================================================
    // Mutation
    // ======================================================================

    /// Persist an instance: insert when `New`, update when `Persisted`.
    ///
    /// The required-field check runs before either path issues a
    /// connector call; a `Persisted` instance with an empty dirty set is
    /// a no-op. The matching lifecycle event fires only after the
    /// connector call committed.
    pub async fn save(&self, instance: &mut ModelInstance) -> Result<(), Error> {
        match instance.state() {
            InstanceState::New => self.insert(instance).await,
            InstanceState::Persisted => self.update(instance).await,
            InstanceState::Deleted => Err(InvalidStateError {
                op: "save",
                state: InstanceState::Deleted,
            }
            .into()),
        }
    }

    async fn insert(&self, instance: &mut ModelInstance) -> Result<(), Error> {
        self.check_required(instance, true)?;

        if self.descriptor.timestamps() {
            let now = Value::timestamp_now();
            instance.force_set(CREATED_AT_FIELD, now.clone());
            instance.force_set(UPDATED_AT_FIELD, now);
        }

        let columns = self.insert_columns(instance);
        let identity = self
            .connector
            .insert(self.descriptor.table(), columns)
            .await?;

        let pk = self.descriptor.primary_key();
        if pk.auto_increment {
            instance.force_set(&pk.name, identity);
        }
        instance.commit_persisted();

        debug!(
            model = %self.descriptor.model_name(),
            key = %instance.primary_key_value(),
            "inserted row"
        );
        self.emit(EventKind::Created, instance);

        Ok(())
    }

    async fn update(&self, instance: &mut ModelInstance) -> Result<(), Error> {
        self.check_required(instance, false)?;

        if !instance.is_dirty() {
            return Ok(());
        }

        if self.descriptor.timestamps() {
            instance.force_set(UPDATED_AT_FIELD, Value::timestamp_now());
        }

        let changed = self.changed_fields(instance);
        let columns = changed
            .iter()
            .map(|name| (name.clone(), instance.get(name).clone()))
            .collect();

        let pk = self.descriptor.primary_key();
        let key = self.require_key(instance)?;
        let affected = self
            .connector
            .update(self.descriptor.table(), &pk.name, &key, columns)
            .await?;
        instance.commit_persisted();

        debug!(
            model = %self.descriptor.model_name(),
            key = %key,
            affected,
            "updated row"
        );
        self.emit(EventKind::Updated { changed }, instance);

        Ok(())
    }

    /// Delete a `Persisted` instance; the transition to `Deleted` is
    /// terminal.
    pub async fn delete(&self, instance: &mut ModelInstance) -> Result<(), Error> {
        if instance.state() != InstanceState::Persisted {
            return Err(InvalidStateError {
                op: "delete",
                state: instance.state(),
            }
            .into());
        }

        let pk = self.descriptor.primary_key();
        let key = self.require_key(instance)?;
        let affected = self
            .connector
            .delete(self.descriptor.table(), &pk.name, &key)
            .await?;
        instance.commit_deleted();

        debug!(
            model = %self.descriptor.model_name(),
            key = %key,
            affected,
            "deleted row"
        );
        self.emit(EventKind::Deleted, instance);

        Ok(())
    }

    // ======================================================================
    // Read surface
    // ======================================================================

    /// Load one row by primary key.
    pub async fn find(&self, key: &Value) -> Result<Option<ModelInstance>, Error> {
        let pk = self.descriptor.primary_key();
        let query = QueryBuilder::new(self.descriptor.table())
            .filter_eq(&pk.name, key.clone())?
            .limit(1)
            .build();

        let rows = self.connector.query(query).await?;

        Ok(rows
            .into_iter()
            .next()
            .map(|row| ModelInstance::hydrated(Arc::clone(&self.descriptor), row)))
    }

    /// List rows with equality filters, free-text search over text
    /// fields, and caller-chosen (validated) sort.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<ModelInstance>, Error> {
        let mut builder = QueryBuilder::new(self.descriptor.table());

        for (field, value) in options.filters {
            builder = builder.filter_eq(&field, value)?;
        }

        if let Some(term) = &options.search {
            let columns: Vec<&str> = self
                .descriptor
                .fields()
                .iter()
                .filter(|f| f.ty.is_text())
                .map(|f| f.name.as_str())
                .collect();
            builder = builder.search(&columns, term)?;
        }

        if let Some(column) = &options.sort {
            builder = builder.order_by(column, options.direction)?;
        }
        if let Some(limit) = options.limit {
            builder = builder.limit(limit);
        }
        if let Some(offset) = options.offset {
            builder = builder.offset(offset);
        }

        let rows = self.connector.query(builder.build()).await?;

        Ok(rows
            .into_iter()
            .map(|row| ModelInstance::hydrated(Arc::clone(&self.descriptor), row))
            .collect())
    }

    // ======================================================================
    // Internals
    // ======================================================================

    /// Required-field check; runs before any connector call. Storage-
    /// assigned keys are exempt. On the insert path a declared default
    /// satisfies the requirement (it is materialized into the column
    /// set).
    fn check_required(
        &self,
        instance: &ModelInstance,
        insert_path: bool,
    ) -> Result<(), ValidationError> {
        for field in self.descriptor.fields() {
            if !field.required || field.auto_increment {
                continue;
            }

            let satisfied = !instance.get(&field.name).is_null()
                || (insert_path && field.default.is_some());
            if !satisfied {
                return Err(ValidationError::RequiredNull {
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Insert column set: every field with a non-null attribute value or
    /// declared default, in field order, excluding storage-assigned keys.
    fn insert_columns(&self, instance: &ModelInstance) -> Vec<(String, Value)> {
        self.descriptor
            .fields()
            .iter()
            .filter(|field| !field.auto_increment)
            .filter_map(|field| {
                let attribute = instance.get(&field.name);
                let value = if attribute.is_null() {
                    field
                        .default
                        .as_ref()
                        .map(|default| Value::from_default(default, field.ty))?
                } else {
                    attribute.clone()
                };

                Some((field.name.clone(), value))
            })
            .collect()
    }

    /// Dirty attribute names in field order, excluding the primary key.
    fn changed_fields(&self, instance: &ModelInstance) -> Vec<String> {
        self.descriptor
            .fields()
            .iter()
            .filter(|field| !field.primary_key && instance.dirty_fields().contains(&field.name))
            .map(|field| field.name.clone())
            .collect()
    }

    fn require_key(&self, instance: &ModelInstance) -> Result<Value, ValidationError> {
        let key = instance.primary_key_value();
        if key.is_null() {
            return Err(ValidationError::RequiredNull {
                field: self.descriptor.primary_key().name.clone(),
            });
        }

        Ok(key.clone())
    }

    fn emit(&self, kind: EventKind, instance: &ModelInstance) {
        let event = LifecycleEvent {
            kind,
            instance,
            request: ctx::current(),
        };

        for sink in &self.sinks {
            sink.record(&event);
        }
        obs::record_global(&event);
    }
}

///
/// ListOptions
///

#[derive(Debug, Default)]
pub struct ListOptions {
    pub filters: Vec<(String, Value)>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Direction,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
