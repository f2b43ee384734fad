//! Named validate-then-execute operations over a loaded record.
//!
//! Actions are stateless contract objects registered once at startup and
//! dispatched by name. A validation message short-circuits dispatch to a
//! `Failure` outcome; the registry never retries and never rolls back a
//! handler's own side effects.

use crate::{
    ctx::{self, RequestSnapshot},
    db::instance::ModelInstance,
    value::Value,
};
use async_trait::async_trait;
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// ActionError
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum ActionError {
    #[error("action already registered: '{name}'")]
    Duplicate { name: String },

    #[error("unknown action: '{name}'")]
    Unknown { name: String },
}

///
/// Outcome
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

///
/// ActionContext
///
/// Everything a handler sees: the loaded record, the submitted values,
/// and the request snapshot active at dispatch time.
///

pub struct ActionContext<'a> {
    pub record: &'a mut ModelInstance,
    pub submitted: BTreeMap<String, Value>,
    pub request: Option<RequestSnapshot>,
}

///
/// Action
///
/// Tagged contract: independent values implement this, no inheritance
/// hierarchy. `validate` returning a message means `handle` never runs.
///

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> Option<&'static str> {
        None
    }

    async fn validate(&self, _context: &ActionContext<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, context: &mut ActionContext<'_>) -> Outcome;
}

///
/// ActionRegistry
///

#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Register an action under its name.
    pub fn register(&mut self, action: Arc<dyn Action>) -> Result<(), ActionError> {
        let name = action.name();
        if self.actions.contains_key(name) {
            return Err(ActionError::Duplicate {
                name: name.to_string(),
            });
        }

        self.actions.insert(name, action);

        Ok(())
    }

    /// Registered action names, for surface listings.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    /// Dispatch a named action against a loaded record.
    ///
    /// Validation rejections are recovered into `Failure` outcomes; only
    /// resolution failures surface as errors.
    pub async fn dispatch(
        &self,
        name: &str,
        record: &mut ModelInstance,
        submitted: BTreeMap<String, Value>,
    ) -> Result<Outcome, ActionError> {
        let action = self
            .actions
            .get(name)
            .cloned()
            .ok_or_else(|| ActionError::Unknown {
                name: name.to_string(),
            })?;

        let mut context = ActionContext {
            record,
            submitted,
            request: ctx::current(),
        };

        if let Some(message) = action.validate(&context).await {
            debug!(action = name, "validation rejected dispatch");
            return Ok(Outcome::Failure(message));
        }

        let outcome = action.handle(&mut context).await;
        debug!(action = name, success = outcome.is_success(), "action dispatched");

        Ok(outcome)
    }
}
