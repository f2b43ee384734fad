//! End-to-end flow over the public surface: compile a schema, run CRUD
//! through an in-memory connector, observe lifecycle events, and drive a
//! named action — all under an ambient request scope.

use async_trait::async_trait;
use paneldb::prelude::*;
use paneldb_core::db::{SelectQuery, StorageError};
use serde_json::json;
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

///
/// MemoryStore
/// Minimal connector double: integer keys, pk-equality queries, full
/// scans otherwise.
///

#[derive(Default)]
struct MemoryStore {
    rows: Mutex<BTreeMap<i64, Row>>,
    next_id: AtomicI64,
}

#[async_trait]
impl StorageConnector for MemoryStore {
    async fn insert(
        &self,
        _table: &str,
        columns: Vec<(String, Value)>,
    ) -> Result<Value, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut row: Row = columns.into_iter().collect();
        row.insert("id".to_string(), Value::Int(id));
        self.rows.lock().unwrap().insert(id, row);

        Ok(Value::Int(id))
    }

    async fn update(
        &self,
        _table: &str,
        _key_column: &str,
        key: &Value,
        columns: Vec<(String, Value)>,
    ) -> Result<u64, StorageError> {
        let Value::Int(id) = key else {
            return Ok(0);
        };

        match self.rows.lock().unwrap().get_mut(id) {
            Some(row) => {
                for (name, value) in columns {
                    row.insert(name, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(
        &self,
        _table: &str,
        _key_column: &str,
        key: &Value,
    ) -> Result<u64, StorageError> {
        let Value::Int(id) = key else {
            return Ok(0);
        };

        Ok(u64::from(self.rows.lock().unwrap().remove(id).is_some()))
    }

    async fn query(&self, query: SelectQuery) -> Result<Vec<Row>, StorageError> {
        let rows = self.rows.lock().unwrap();

        if query.conditions.first().map(String::as_str) == Some("id = ?") {
            let hit = match query.params.first() {
                Some(Value::Int(id)) => rows.get(id).cloned(),
                _ => None,
            };
            return Ok(hit.into_iter().collect());
        }

        Ok(rows.values().cloned().collect())
    }
}

fn customer_runtime() -> (ModelRuntime, Arc<MemoryStore>) {
    let doc = json!({
        "model": "Customer",
        "table": "customers",
        "timestamps": true,
        "fields": {
            "name": { "type": "string", "required": true },
            "email": { "type": "string", "format": "email" },
            "status": { "type": "enum", "default": "active" },
            "tierId": { "type": "int" }
        }
    });
    let descriptor = Arc::new(compile_str(&doc.to_string()).unwrap());
    let store = Arc::new(MemoryStore::default());
    (ModelRuntime::new(descriptor, store.clone()), store)
}

///
/// AuditSink
///

#[derive(Default)]
struct AuditSink {
    entries: Mutex<Vec<(EventKind, Option<String>)>>,
}

impl LifecycleSink for AuditSink {
    fn record(&self, event: &LifecycleEvent<'_>) {
        self.entries.lock().unwrap().push((
            event.kind.clone(),
            event.request.as_ref().and_then(|r| r.user.clone()),
        ));
    }
}

#[tokio::test(flavor = "current_thread")]
async fn crud_round_trip_emits_attributed_events() {
    let (mut runtime, store) = customer_runtime();
    let audit = Arc::new(AuditSink::default());
    runtime.subscribe(audit.clone());

    ctx::run(Some("sess-1".into()), Some("ana".into()), async {
        let mut customer = runtime.instance();
        customer.set("name", "Ada Lovelace").unwrap();
        customer.set("email", "ada@example.test").unwrap();
        runtime.save(&mut customer).await.unwrap();

        assert_eq!(customer.state(), InstanceState::Persisted);
        assert_eq!(customer.primary_key_value(), &Value::Int(1));
        // Default materialized and stored.
        let found = runtime.find(&Value::Int(1)).await.unwrap().unwrap();
        assert_eq!(found.get("status"), &Value::Enum("active".into()));
        assert!(matches!(found.get("createdAt"), Value::Timestamp(_)));

        customer.set("email", "countess@example.test").unwrap();
        runtime.save(&mut customer).await.unwrap();

        let listed = runtime.list(ListOptions::default()).await.unwrap();
        assert_eq!(listed.len(), 1);

        runtime.delete(&mut customer).await.unwrap();
        assert!(store.rows.lock().unwrap().is_empty());
        assert!(runtime.find(&Value::Int(1)).await.unwrap().is_none());
    })
    .await;

    let entries = audit.entries.lock().unwrap();
    let kinds: Vec<_> = entries.iter().map(|(kind, _)| kind.clone()).collect();
    assert_eq!(
        kinds,
        [
            EventKind::Created,
            EventKind::Updated {
                changed: vec!["email".to_string(), "updatedAt".to_string()]
            },
            EventKind::Deleted,
        ]
    );
    // Every event was attributed to the acting user.
    assert!(entries.iter().all(|(_, user)| user.as_deref() == Some("ana")));
}

#[tokio::test(flavor = "current_thread")]
async fn actions_validate_then_drive_the_runtime() {
    struct Suspend {
        runtime: Arc<ModelRuntime>,
    }

    #[async_trait]
    impl Action for Suspend {
        fn name(&self) -> &'static str {
            "suspend"
        }

        fn description(&self) -> Option<&'static str> {
            Some("suspend a customer account")
        }

        async fn validate(&self, context: &ActionContext<'_>) -> Option<String> {
            (context.record.get("status") == &Value::Enum("suspended".into()))
                .then(|| "customer is already suspended".to_string())
        }

        async fn handle(&self, context: &mut ActionContext<'_>) -> Outcome {
            if let Err(err) = context.record.set("status", Value::Enum("suspended".into())) {
                return Outcome::failure(err.to_string());
            }
            match self.runtime.save(context.record).await {
                Ok(()) => Outcome::success("customer suspended"),
                Err(err) => Outcome::failure(err.to_string()),
            }
        }
    }

    let (runtime, _store) = customer_runtime();
    let runtime = Arc::new(runtime);

    let mut registry = ActionRegistry::new();
    registry
        .register(Arc::new(Suspend {
            runtime: runtime.clone(),
        }))
        .unwrap();

    let mut customer = runtime.instance();
    customer.set("name", "Ada Lovelace").unwrap();
    runtime.save(&mut customer).await.unwrap();

    let outcome = registry
        .dispatch("suspend", &mut customer, BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Success("customer suspended".into()));

    let stored = runtime
        .find(&Value::Int(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("status"), &Value::Enum("suspended".into()));

    // Second dispatch short-circuits in validate.
    let outcome = registry
        .dispatch("suspend", &mut customer, BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Failure("customer is already suspended".into())
    );
}

#[test]
fn relation_hints_resolve_against_the_registry() {
    let tier = json!({
        "model": "Tier",
        "table": "tiers",
        "fields": { "name": { "type": "string", "required": true } }
    });
    let customer = json!({
        "model": "Customer",
        "table": "customers",
        "fields": {
            "name": { "type": "string" },
            "tierId": { "type": "int" }
        }
    });

    let mut registry = DescriptorRegistry::new();
    registry
        .register(Arc::new(compile_str(&tier.to_string()).unwrap()))
        .unwrap();
    let customer = Arc::new(compile_str(&customer.to_string()).unwrap());
    registry.register(customer.clone()).unwrap();

    let hint = &customer.relations()[0];
    assert_eq!(hint.references, "tier");
    let resolved = registry.resolve_relation(hint).unwrap();
    assert_eq!(resolved.model_name(), "Tier");
    assert_eq!(paneldb::VERSION, env!("CARGO_PKG_VERSION"));
}
