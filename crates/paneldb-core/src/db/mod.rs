pub mod connector;
pub mod instance;
pub mod query;
pub mod runtime;

pub use connector::{Row, StorageConnector, StorageError};
pub use instance::{InstanceState, ModelInstance};
pub use query::{Direction, QueryBuilder, QueryError, SelectQuery};
pub use runtime::{ListOptions, ModelRuntime};
