use crate::{
    action::ActionError,
    db::{connector::StorageError, instance::InstanceState, query::QueryError},
};
use paneldb_schema::SchemaError;
use thiserror::Error as ThisError;

///
/// InvalidStateError
///
/// Illegal lifecycle transition. Surfaced before any connector call;
/// instance state is unchanged.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
#[error("cannot {op} a {state} instance")]
pub struct InvalidStateError {
    pub op: &'static str,
    pub state: InstanceState,
}

///
/// ValidationError
///
/// Attribute-level rejection at mutation time. Surfaced before any
/// connector call.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum ValidationError {
    #[error("required field '{field}' is null")]
    RequiredNull { field: String },

    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { field: String, model: String },

    #[error("value of type {found} does not fit field '{field}' (declared {expected})")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },
}

///
/// Error
///
/// Crate-level aggregation of the component taxonomies.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    State(#[from] InvalidStateError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Action(#[from] ActionError),
}
