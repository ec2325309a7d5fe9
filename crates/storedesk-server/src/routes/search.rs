//! Global search endpoint

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storedesk_core::application::SearchValidator;
use storedesk_core::application::validators::search_validator::{
    LIMIT_FIELD, TERM_FIELD, TYPES_FIELD,
};
use storedesk_core::domain::search::{SearchQuery, SearchResultEntry};

use crate::error::ServerError;
use crate::extract::resolve_identity;
use crate::state::AppState;

/// Query string of `GET /search`
///
/// Everything is taken as text so that bad values surface as field-level
/// validation errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub types: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultEntry>,
    /// Names of sources left out of this response
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<String>,
}

impl SearchResponse {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            failed_sources: Vec::new(),
        }
    }
}

/// Report an undecodable query string against the field it names, `q` otherwise
fn malformed_query(rejection: QueryRejection) -> ServerError {
    let detail = rejection.body_text();
    let field = [TYPES_FIELD, LIMIT_FIELD]
        .into_iter()
        .find(|field| detail.contains(&format!("`{}`", field)))
        .unwrap_or(TERM_FIELD);

    ServerError::validation(field, format!("The {} parameter is malformed.", field))
}

/// Handle GET /search
///
/// Input is validated before the caller is identified, so a bad term is a
/// 422 for everyone. Without an identity the result is empty and no source
/// is queried.
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ServerError> {
    let Query(params) = params.map_err(malformed_query)?;
    let term = SearchValidator::validate_term(params.q.as_deref())?;
    let item_types = SearchValidator::parse_types(params.types.as_deref())?;
    let limit = SearchValidator::parse_limit(params.limit.as_deref())?;

    let Some(user) = resolve_identity(&state, &headers).await? else {
        return Ok(Json(SearchResponse::empty()));
    };

    let mut query = SearchQuery::for_identity(term, &user).with_item_types(item_types);
    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }

    let result = state.search.execute(&query).await?;

    tracing::debug!(
        user_id = %user.id,
        returned = result.entries.len(),
        total = result.total_matches,
        "Search request served"
    );

    Ok(Json(SearchResponse {
        failed_sources: result
            .failed_sources
            .into_iter()
            .map(|f| f.source)
            .collect(),
        results: result.entries,
    }))
}
