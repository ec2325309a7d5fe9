//! Search entity and related types
//!
//! Defines the core types for permission-scoped global search.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::identity::{Identity, PermissionSet};

/// Longest accepted search term, in characters
pub const MAX_TERM_CHARS: usize = 255;

/// Kinds of records that can appear in global search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchItemType {
    Product,
    Category,
    Supplier,
    Purchase,
    Invoice,
    Expense,
    Currency,
    User,
    Tenant,
}

impl SearchItemType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
            Self::Supplier => "supplier",
            Self::Purchase => "purchase",
            Self::Invoice => "invoice",
            Self::Expense => "expense",
            Self::Currency => "currency",
            Self::User => "user",
            Self::Tenant => "tenant",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "product" => Some(Self::Product),
            "category" => Some(Self::Category),
            "supplier" => Some(Self::Supplier),
            "purchase" => Some(Self::Purchase),
            "invoice" => Some(Self::Invoice),
            "expense" => Some(Self::Expense),
            "currency" => Some(Self::Currency),
            "user" => Some(Self::User),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }

    /// Get all item types
    pub fn all() -> Vec<Self> {
        vec![
            Self::Product,
            Self::Category,
            Self::Supplier,
            Self::Purchase,
            Self::Invoice,
            Self::Expense,
            Self::Currency,
            Self::User,
            Self::Tenant,
        ]
    }
}

impl fmt::Display for SearchItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entity exposed to global search by its owning domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: SearchItemType,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
    /// Permission code the viewer must hold to see this item
    pub required_permission: String,
}

impl SearchableItem {
    pub fn new(
        id: impl Into<String>,
        item_type: SearchItemType,
        title: impl Into<String>,
        url: impl Into<String>,
        required_permission: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            item_type,
            title: title.into(),
            subtitle: None,
            url: url.into(),
            required_permission: required_permission.into(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        let subtitle = subtitle.into();
        self.subtitle = if subtitle.trim().is_empty() {
            None
        } else {
            Some(subtitle)
        };
        self
    }
}

/// A search request, built per call and discarded afterwards
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Raw term as typed; trimmed and validated by the use case
    pub term: String,

    /// Tenant whose data is searched
    pub tenant_id: Uuid,

    /// Permission codes held by the requester
    pub permissions: PermissionSet,

    /// Root requesters bypass permission checks
    pub is_root: bool,

    /// Item types to include (if empty, include all)
    pub item_types: Vec<SearchItemType>,

    /// Requested number of entries; clamped to the configured maximum
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, tenant_id: Uuid) -> Self {
        Self {
            term: term.into(),
            tenant_id,
            permissions: PermissionSet::new(),
            is_root: false,
            item_types: Vec::new(),
            limit: None,
        }
    }

    /// Build a query on behalf of an identity
    pub fn for_identity(term: impl Into<String>, identity: &dyn Identity) -> Self {
        Self::new(term, identity.tenant_id())
            .with_permissions(identity.permission_codes().clone())
            .with_root(identity.is_root())
    }

    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    pub fn with_item_types(mut self, types: Vec<SearchItemType>) -> Self {
        self.item_types = types;
        self
    }

    pub fn with_item_type(mut self, item_type: SearchItemType) -> Self {
        if !self.item_types.contains(&item_type) {
            self.item_types.push(item_type);
        }
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A single ranked search hit as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: SearchItemType,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
    /// Relevance score (higher is better)
    #[serde(skip_serializing)]
    #[serde(default)]
    pub score: f64,
}

impl SearchResultEntry {
    pub fn from_item(item: SearchableItem, score: f64) -> Self {
        Self {
            id: item.id,
            item_type: item.item_type,
            title: item.title,
            subtitle: item.subtitle,
            url: item.url,
            score,
        }
    }
}

/// Why a source did not contribute to a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFailureKind {
    Error,
    Timeout,
    Panicked,
}

/// A source that was excluded from a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub kind: SourceFailureKind,
    pub message: String,
}

impl SourceFailure {
    pub fn new(source: impl Into<String>, kind: SourceFailureKind, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of a global search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ranked, truncated entries
    pub entries: Vec<SearchResultEntry>,

    /// Number of visible matches before truncation
    pub total_matches: usize,

    /// Sources that failed or timed out, sorted by name
    pub failed_sources: Vec<SourceFailure>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.total_matches > self.entries.len()
    }
}
