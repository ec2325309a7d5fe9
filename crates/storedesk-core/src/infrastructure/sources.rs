//! Search index sources
//!
//! `SqliteSearchSource` reads one back-office table per item type.
//! `StaticSource` serves a fixed list and backs tests and demos.

use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;
use uuid::Uuid;

use crate::Result;
use crate::domain::identity::permission;
use crate::domain::search::{SearchIndexSource, SearchItemType, SearchableItem};
use crate::storage::Database;

/// How one item type is read from the database
///
/// `sql` must select `id`, `title` and `subtitle` columns and takes the
/// requesting tenant's id as its only bind parameter.
#[derive(Debug, Clone, Copy)]
pub struct SourceDefinition {
    pub name: &'static str,
    pub item_type: SearchItemType,
    pub permission: &'static str,
    pub url_prefix: &'static str,
    pub sql: &'static str,
}

impl SourceDefinition {
    /// Build the detail URL of an item
    pub fn url_for(&self, id: &str) -> String {
        format!("{}/{}", self.url_prefix, id)
    }
}

pub const PRODUCTS: SourceDefinition = SourceDefinition {
    name: "products",
    item_type: SearchItemType::Product,
    permission: permission::PRODUCT_VIEW,
    url_prefix: "/inventory/products",
    sql: "SELECT id, name AS title, sku AS subtitle FROM products \
          WHERE tenant_id = ? AND deleted_at IS NULL",
};

pub const CATEGORIES: SourceDefinition = SourceDefinition {
    name: "categories",
    item_type: SearchItemType::Category,
    permission: permission::CATEGORY_VIEW,
    url_prefix: "/inventory/categories",
    sql: "SELECT id, name AS title, description AS subtitle FROM categories \
          WHERE tenant_id = ? AND deleted_at IS NULL",
};

pub const SUPPLIERS: SourceDefinition = SourceDefinition {
    name: "suppliers",
    item_type: SearchItemType::Supplier,
    permission: permission::SUPPLIER_VIEW,
    url_prefix: "/purchasing/suppliers",
    sql: "SELECT id, name AS title, contact_name AS subtitle FROM suppliers \
          WHERE tenant_id = ? AND deleted_at IS NULL",
};

pub const PURCHASES: SourceDefinition = SourceDefinition {
    name: "purchases",
    item_type: SearchItemType::Purchase,
    permission: permission::PURCHASE_VIEW,
    url_prefix: "/purchasing/purchases",
    sql: "SELECT p.id AS id, p.reference AS title, s.name AS subtitle FROM purchases p \
          LEFT JOIN suppliers s ON s.id = p.supplier_id \
          WHERE p.tenant_id = ? AND p.deleted_at IS NULL",
};

pub const INVOICES: SourceDefinition = SourceDefinition {
    name: "invoices",
    item_type: SearchItemType::Invoice,
    permission: permission::INVOICE_VIEW,
    url_prefix: "/finance/invoices",
    sql: "SELECT id, number AS title, customer_name AS subtitle FROM invoices \
          WHERE tenant_id = ? AND deleted_at IS NULL",
};

pub const EXPENSES: SourceDefinition = SourceDefinition {
    name: "expenses",
    item_type: SearchItemType::Expense,
    permission: permission::EXPENSE_VIEW,
    url_prefix: "/finance/expenses",
    sql: "SELECT id, description AS title, category AS subtitle FROM expenses \
          WHERE tenant_id = ? AND deleted_at IS NULL",
};

pub const CURRENCIES: SourceDefinition = SourceDefinition {
    name: "currencies",
    item_type: SearchItemType::Currency,
    permission: permission::CURRENCY_VIEW,
    url_prefix: "/settings/currencies",
    sql: "SELECT id, name AS title, code AS subtitle FROM currencies \
          WHERE tenant_id = ? AND is_active = 1",
};

pub const USERS: SourceDefinition = SourceDefinition {
    name: "users",
    item_type: SearchItemType::User,
    permission: permission::USER_VIEW,
    url_prefix: "/admin/users",
    sql: "SELECT id, name AS title, email AS subtitle FROM users \
          WHERE tenant_id = ? AND is_active = 1",
};

// The requester's own tenant, never its neighbours
pub const TENANTS: SourceDefinition = SourceDefinition {
    name: "tenants",
    item_type: SearchItemType::Tenant,
    permission: permission::TENANT_VIEW,
    url_prefix: "/admin/tenants",
    sql: "SELECT id, name AS title, slug AS subtitle FROM tenants \
          WHERE id = ? AND is_active = 1",
};

/// Every built-in definition, one per item type
pub const DEFINITIONS: [SourceDefinition; 9] = [
    PRODUCTS, CATEGORIES, SUPPLIERS, PURCHASES, INVOICES, EXPENSES, CURRENCIES, USERS, TENANTS,
];

/// A search source backed by one SQLite statement
pub struct SqliteSearchSource {
    db: Database,
    definition: SourceDefinition,
}

impl SqliteSearchSource {
    pub fn new(db: Database, definition: SourceDefinition) -> Self {
        Self { db, definition }
    }

    pub fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    /// One source per built-in definition
    pub fn all(db: &Database) -> Vec<Arc<dyn SearchIndexSource>> {
        DEFINITIONS
            .iter()
            .map(|def| Arc::new(Self::new(db.clone(), *def)) as Arc<dyn SearchIndexSource>)
            .collect()
    }

    fn row_to_item(&self, row: sqlx::sqlite::SqliteRow) -> Result<SearchableItem> {
        let id: String = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let subtitle: Option<String> = row.try_get("subtitle")?;

        let url = self.definition.url_for(&id);
        let item = SearchableItem::new(
            id,
            self.definition.item_type,
            title,
            url,
            self.definition.permission,
        );

        Ok(match subtitle {
            Some(subtitle) => item.with_subtitle(subtitle),
            None => item,
        })
    }
}

#[async_trait]
impl SearchIndexSource for SqliteSearchSource {
    fn name(&self) -> &str {
        self.definition.name
    }

    async fn searchable_items(&self, tenant_id: Uuid) -> Result<Vec<SearchableItem>> {
        let rows = sqlx::query(self.definition.sql)
            .bind(tenant_id.to_string())
            .fetch_all(self.db.pool())
            .await?;

        tracing::debug!(
            source = self.definition.name,
            tenant_id = %tenant_id,
            rows = rows.len(),
            "Loaded searchable items"
        );

        rows.into_iter().map(|r| self.row_to_item(r)).collect()
    }
}

/// A source serving a fixed list of items, whatever the tenant
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    items: Vec<SearchableItem>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, items: Vec<SearchableItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl SearchIndexSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn searchable_items(&self, _tenant_id: Uuid) -> Result<Vec<SearchableItem>> {
        Ok(self.items.clone())
    }
}
