//! Storage layer - SQLite
//!
//! Provides database management, migrations and demo data for storedesk.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//! - `seed`: Demo pharmacy tenant
//!
//! # Usage
//!
//! ```ignore
//! use storedesk_core::storage::Database;
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//! ```

pub mod database;
pub mod migrations;
pub mod seed;

// Re-export commonly used types
pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
pub use seed::{SeedReport, seed_demo};
