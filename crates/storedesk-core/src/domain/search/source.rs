//! Search index source contract
//!
//! Each business domain (inventory, purchasing, finance, settings,
//! administration) exposes its records to global search through a
//! `SearchIndexSource`. Sources are called once per search request.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

use super::entity::SearchableItem;
use super::relevance::{self, FoldedTerm};

/// Supplies the full candidate set of searchable items for a tenant
#[async_trait]
pub trait SearchIndexSource: Send + Sync {
    /// Stable name used in logs and failure reports
    fn name(&self) -> &str;

    /// Enumerate every item of this source visible in the tenant
    async fn searchable_items(&self, tenant_id: Uuid) -> Result<Vec<SearchableItem>>;

    /// Score an item against a term; `None` means no match.
    ///
    /// Sources with a better notion of similarity may override this.
    fn relevance(&self, item: &SearchableItem, term: &FoldedTerm) -> Option<f64> {
        relevance::score(item, term)
    }
}
