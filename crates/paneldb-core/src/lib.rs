//! Core runtime for paneldb: attribute values, the CRUD lifecycle engine,
//! sanitizer guards, ambient request identity, named actions, and
//! lifecycle observability.

// public exports are one module level down
pub mod action;
pub mod ctx;
pub mod db;
pub mod error;
pub mod obs;
pub mod sanitize;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only; errors and internals stay at their modules.
///

pub mod prelude {
    pub use crate::{
        action::{Action, ActionContext, ActionRegistry, Outcome},
        ctx::{self, RequestSnapshot},
        db::{
            Direction, InstanceState, ListOptions, ModelInstance, ModelRuntime, Row,
            StorageConnector,
        },
        obs::{EventKind, LifecycleEvent, LifecycleSink},
        value::Value,
    };
}
