//! Search domain module
//!
//! Permission-scoped global search across the back office.
//!
//! # Architecture
//!
//! - **Entities**: `SearchableItem`, `SearchQuery`, `SearchResult`
//! - **Sources**: `SearchIndexSource`, one per business domain
//! - **Specifications**: `PermissionSpec`, `ItemTypeSpec`, `SearchSpecBuilder`
//! - **Relevance**: accent-insensitive term folding and scoring
//!
//! The orchestration lives in
//! [`crate::application::services::SearchGlobalUseCase`].
//!
//! # Visibility
//!
//! An item is returned only when the requester is root or holds the
//! item's `required_permission`. Search never widens what a user could
//! see through the owning feature.

pub mod entity;
pub mod relevance;
pub mod source;
pub mod specification;

// Re-export main types
pub use entity::{
    MAX_TERM_CHARS, SearchItemType, SearchQuery, SearchResult, SearchResultEntry, SearchableItem,
    SourceFailure, SourceFailureKind,
};
pub use relevance::{FoldedTerm, fold};
pub use source::SearchIndexSource;
pub use specification::{ItemTypeSpec, PermissionSpec, SearchSpecBuilder};
