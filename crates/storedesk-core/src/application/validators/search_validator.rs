//! Search input validation
//!
//! Validates the raw inputs of a global search request.

use crate::application::errors::{AppResult, ApplicationError};
use crate::domain::search::{MAX_TERM_CHARS, SearchItemType};

/// Field name of the search term in requests
pub const TERM_FIELD: &str = "q";

/// Field name of the type filter in requests
pub const TYPES_FIELD: &str = "types";

/// Field name of the result limit in requests
pub const LIMIT_FIELD: &str = "limit";

/// Validator for search requests
pub struct SearchValidator;

impl SearchValidator {
    /// Validate a search term and return it trimmed
    ///
    /// Rules:
    /// - Must be present
    /// - Must not be empty after trimming
    /// - Must be at most 255 characters after trimming
    pub fn validate_term(term: Option<&str>) -> AppResult<String> {
        let Some(term) = term else {
            return Err(ApplicationError::validation(
                TERM_FIELD,
                "The search term is required",
            ));
        };

        let term = term.trim();

        if term.is_empty() {
            return Err(ApplicationError::validation(
                TERM_FIELD,
                "The search term cannot be empty",
            ));
        }

        if term.chars().count() > MAX_TERM_CHARS {
            return Err(ApplicationError::validation(
                TERM_FIELD,
                format!(
                    "The search term must be {} characters or less",
                    MAX_TERM_CHARS
                ),
            ));
        }

        Ok(term.to_string())
    }

    /// Parse a comma-separated list of item types
    ///
    /// Blank input means "all types".
    pub fn parse_types(raw: Option<&str>) -> AppResult<Vec<SearchItemType>> {
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let mut types = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let item_type = SearchItemType::parse(name).ok_or_else(|| {
                ApplicationError::validation(
                    TYPES_FIELD,
                    format!(
                        "Unknown type '{}'. Allowed: {}",
                        name,
                        SearchItemType::all()
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })?;
            if !types.contains(&item_type) {
                types.push(item_type);
            }
        }

        Ok(types)
    }

    /// Parse a requested result limit
    ///
    /// Blank input means "use the configured maximum". Values above the
    /// maximum are accepted here and clamped by the use case.
    pub fn parse_limit(raw: Option<&str>) -> AppResult<Option<usize>> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        match raw.parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(Some(limit)),
            _ => Err(ApplicationError::validation(
                LIMIT_FIELD,
                "The limit must be a positive integer",
            )),
        }
    }
}
