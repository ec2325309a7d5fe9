//! Storedesk Core Library
//!
//! This crate provides the core functionality for Storedesk, including:
//! - Identity (users, permission codes, admin capabilities)
//! - Permission-scoped global search across back-office records
//! - SQLite-backed search sources and identity resolution
//! - Storage (SQLite + versioned migrations, demo data)
//! - Configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::application::{AppResult, ApplicationError, SearchGlobalUseCase, SearchSettings};
    pub use crate::config::Config;
    pub use crate::domain::identity::{AdminCapabilities, Identity, IdentityResolver, User};
    pub use crate::domain::search::{
        SearchIndexSource, SearchItemType, SearchQuery, SearchResult, SearchResultEntry,
    };
    pub use crate::error::{Error, Result};
    pub use crate::storage::Database;
}
