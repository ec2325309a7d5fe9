//! Application state shared by all handlers

use std::sync::Arc;

use storedesk_core::application::{SearchGlobalUseCase, SearchSettings};
use storedesk_core::config::Config;
use storedesk_core::domain::identity::IdentityResolver;
use storedesk_core::infrastructure::{SqliteIdentityResolver, SqliteSearchSource};
use storedesk_core::storage::Database;

pub struct AppState {
    pub search: SearchGlobalUseCase,
    pub identities: Arc<dyn IdentityResolver>,
    /// Probed by `/health`; absent when the server runs without storage
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(search: SearchGlobalUseCase, identities: Arc<dyn IdentityResolver>) -> Self {
        Self {
            search,
            identities,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Wire every SQLite source and the token resolver to one database
    pub fn from_database(database: Database, config: &Config) -> Self {
        let search = SearchGlobalUseCase::new(SearchSettings::from(&config.search))
            .with_sources(SqliteSearchSource::all(&database));
        let identities = Arc::new(SqliteIdentityResolver::new(database.clone()));

        Self::new(search, identities).with_database(database)
    }
}
