//! Global search use case
//!
//! Fans out to every registered [`SearchIndexSource`], keeps what the
//! requester may see, matches the term, then ranks and truncates.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::errors::AppResult;
use crate::application::validators::SearchValidator;
use crate::config::SearchConfig;
use crate::domain::search::{
    FoldedTerm, SearchIndexSource, SearchQuery, SearchResult, SearchResultEntry,
    SearchSpecBuilder, SearchableItem, SourceFailure, SourceFailureKind,
};
use crate::domain::specification::Specification;
use crate::error::Error;

/// Runtime limits of the search use case
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub max_results: usize,
    pub request_deadline: Duration,
    pub max_concurrent_sources: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results.max(1),
            request_deadline: Duration::from_millis(config.request_deadline_ms),
            max_concurrent_sources: config.max_concurrent_sources.max(1),
        }
    }
}

/// Items fetched from one source, kept with the source for scoring
type SourceBatch = (Arc<dyn SearchIndexSource>, Vec<SearchableItem>);

/// Permission-scoped search across all registered sources
#[derive(Clone)]
pub struct SearchGlobalUseCase {
    sources: Vec<Arc<dyn SearchIndexSource>>,
    settings: SearchSettings,
}

impl SearchGlobalUseCase {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            sources: Vec::new(),
            settings,
        }
    }

    /// Register a source
    pub fn with_source(mut self, source: Arc<dyn SearchIndexSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Register several sources
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Arc<dyn SearchIndexSource>>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Names of the registered sources
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Execute a search
    ///
    /// Fails only on invalid input. Sources that error, panic, or miss
    /// the request deadline are left out and listed in
    /// `SearchResult::failed_sources`.
    pub async fn execute(&self, query: &SearchQuery) -> AppResult<SearchResult> {
        let term = SearchValidator::validate_term(Some(&query.term))?;
        let folded = FoldedTerm::new(&term);
        let max_results = self.settings.max_results.max(1);
        let limit = query.limit.unwrap_or(max_results).clamp(1, max_results);

        let (batches, mut failed_sources) = self.collect_candidates(query.tenant_id).await;

        let visibility = SearchSpecBuilder::new()
            .with_permissions(query.permissions.clone(), query.is_root)
            .with_item_types(query.item_types.clone())
            .build();

        let mut entries = Vec::new();
        for (source, items) in batches {
            for item in items {
                if !visibility.is_satisfied_by(&item) {
                    continue;
                }
                if let Some(score) = source.relevance(&item, &folded) {
                    entries.push(SearchResultEntry::from_item(item, score));
                }
            }
        }

        rank(&mut entries);
        let total_matches = entries.len();
        entries.truncate(limit);
        failed_sources.sort_by(|a, b| a.source.cmp(&b.source));

        info!(
            tenant_id = %query.tenant_id,
            is_root = query.is_root,
            matches = total_matches,
            returned = entries.len(),
            failed_sources = failed_sources.len(),
            "Global search completed"
        );

        Ok(SearchResult {
            entries,
            total_matches,
            failed_sources,
        })
    }

    /// Fetch every source concurrently, each behind its own failure boundary
    async fn collect_candidates(&self, tenant_id: Uuid) -> (Vec<SourceBatch>, Vec<SourceFailure>) {
        let deadline = Instant::now() + self.settings.request_deadline;
        let deadline_ms = self.settings.request_deadline.as_millis() as u64;
        let permits = Arc::new(Semaphore::new(self.settings.max_concurrent_sources));

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    let started = Instant::now();
                    let fetch = async {
                        let _permit = permits
                            .acquire_owned()
                            .await
                            .map_err(|e| Error::Other(e.to_string()))?;
                        source.searchable_items(tenant_id).await
                    };
                    let outcome = timeout_at(deadline, fetch).await;
                    debug!(
                        source = source.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Search source finished"
                    );
                    outcome
                })
            })
            .collect();

        let mut batches = Vec::new();
        let mut failures = Vec::new();

        for (source, joined) in self.sources.iter().zip(join_all(handles).await) {
            let name = source.name();
            let failure = match joined {
                Ok(Ok(Ok(items))) => {
                    debug!(source = name, items = items.len(), "Collected search candidates");
                    batches.push((Arc::clone(source), items));
                    continue;
                }
                Ok(Ok(Err(e))) => SourceFailure::new(
                    name,
                    SourceFailureKind::Error,
                    Error::source_failed(name, e).to_string(),
                ),
                Ok(Err(_elapsed)) => SourceFailure::new(
                    name,
                    SourceFailureKind::Timeout,
                    Error::SourceTimeout(name.to_string(), deadline_ms).to_string(),
                ),
                Err(join_error) => SourceFailure::new(
                    name,
                    SourceFailureKind::Panicked,
                    Error::source_failed(name, join_error).to_string(),
                ),
            };
            warn!(
                source = name,
                kind = ?failure.kind,
                error = %failure.message,
                "Search source excluded from response"
            );
            failures.push(failure);
        }

        (batches, failures)
    }
}

/// Order by relevance, then type name, then title, then id
fn rank(entries: &mut Vec<SearchResultEntry>) {
    let mut keyed: Vec<_> = entries
        .drain(..)
        .map(|entry| (entry.title.to_lowercase(), entry))
        .collect();

    keyed.sort_by(|(a_title, a), (b_title, b)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.item_type.as_str().cmp(b.item_type.as_str()))
            .then_with(|| a_title.cmp(b_title))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}
