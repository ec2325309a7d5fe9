//! Infrastructure layer
//!
//! Contains database-backed implementations of the domain traits.

pub mod identity;
pub mod sources;

pub use identity::SqliteIdentityResolver;
pub use sources::{SourceDefinition, SqliteSearchSource, StaticSource};
