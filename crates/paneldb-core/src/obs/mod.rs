//! Lifecycle event boundary.
//!
//! Mutation logic MUST NOT call observers directly; every notification
//! flows through [`LifecycleEvent`] and [`LifecycleSink`]. Events are
//! emitted only after the underlying storage operation committed, so an
//! observer never sees a mutation that did not durably happen.

use crate::{ctx::RequestSnapshot, db::instance::ModelInstance};
use std::sync::{Arc, RwLock};

///
/// EventKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    Created,
    /// Carries only the attribute names that changed, in field order.
    Updated { changed: Vec<String> },
    Deleted,
}

///
/// LifecycleEvent
///

pub struct LifecycleEvent<'a> {
    pub kind: EventKind,
    pub instance: &'a ModelInstance,
    /// Active request snapshot at commit time, if any.
    pub request: Option<RequestSnapshot>,
}

///
/// LifecycleSink
///
/// Observers implement this; invocation is synchronous and in
/// registration order (runtime-local sinks first, then global sinks).
///

pub trait LifecycleSink: Send + Sync {
    fn record(&self, event: &LifecycleEvent<'_>);
}

static GLOBAL_SINKS: RwLock<Vec<Arc<dyn LifecycleSink>>> = RwLock::new(Vec::new());

/// Register a sink observing every runtime's committed mutations.
pub fn register_global_sink(sink: Arc<dyn LifecycleSink>) {
    GLOBAL_SINKS
        .write()
        .expect("global sink registry poisoned")
        .push(sink);
}

pub(crate) fn record_global(event: &LifecycleEvent<'_>) {
    let sinks = GLOBAL_SINKS
        .read()
        .expect("global sink registry poisoned");
    for sink in sinks.iter() {
        sink.record(event);
    }
}
