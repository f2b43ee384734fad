//! paneldb — a schema-driven entity runtime and action layer for
//! admin-panel backends.
//!
//! ## Crate layout
//! - `schema`: declarative documents, the compiler, descriptors, and the
//!   registry used for lazy relation resolution.
//! - `core`: attribute values, the CRUD lifecycle engine, sanitizer
//!   guards, ambient request identity, actions, and lifecycle events.
//!
//! The `prelude` module mirrors the runtime surface used by panel code.

pub use paneldb_core as core;
pub use paneldb_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use paneldb_core::Error;

///
/// Prelude
///

pub mod prelude {
    pub use paneldb_core::prelude::*;
    pub use paneldb_schema::prelude::*;
}
