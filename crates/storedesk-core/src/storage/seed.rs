//! Demo data
//!
//! Seeds a small pharmacy tenant so the search endpoint has something to
//! find out of the box. Seeding is idempotent: a second run finds the
//! existing tenant by slug and only reports it.

use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::domain::identity::permission;
use crate::error::{Error, Result};
use crate::storage::Database;

/// Slug of the demo tenant
pub const DEMO_TENANT_SLUG: &str = "corner-pharmacy";

/// Token of the demo root user
pub const DEMO_ROOT_TOKEN: &str = "demo-root-token";

/// Token of a user who can only see inventory
pub const DEMO_PHARMACIST_TOKEN: &str = "demo-pharmacist-token";

/// Token of a user who can see purchasing and finance
pub const DEMO_ACCOUNTANT_TOKEN: &str = "demo-accountant-token";

/// Outcome of a seed run
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub tenant_id: Uuid,
    /// False when the tenant already existed
    pub created: bool,
    /// (user name, api token)
    pub tokens: Vec<(String, String)>,
}

struct DemoUser {
    name: &'static str,
    email: &'static str,
    token: &'static str,
    is_root: bool,
    permissions: &'static [&'static str],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "Ana Paraíso",
        email: "ana@corner.example",
        token: DEMO_ROOT_TOKEN,
        is_root: true,
        permissions: &[],
    },
    DemoUser {
        name: "Pedro Lima",
        email: "pedro@corner.example",
        token: DEMO_PHARMACIST_TOKEN,
        is_root: false,
        permissions: &[permission::PRODUCT_VIEW, permission::CATEGORY_VIEW],
    },
    DemoUser {
        name: "Joana Silva",
        email: "joana@corner.example",
        token: DEMO_ACCOUNTANT_TOKEN,
        is_root: false,
        permissions: &[
            permission::SUPPLIER_VIEW,
            permission::PURCHASE_VIEW,
            permission::INVOICE_VIEW,
            permission::EXPENSE_VIEW,
            permission::CURRENCY_VIEW,
        ],
    },
];

/// Seed the demo pharmacy tenant
pub async fn seed_demo(db: &Database) -> Result<SeedReport> {
    let tokens: Vec<(String, String)> = DEMO_USERS
        .iter()
        .map(|u| (u.name.to_string(), u.token.to_string()))
        .collect();

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM tenants WHERE slug = ?")
        .bind(DEMO_TENANT_SLUG)
        .fetch_optional(db.pool())
        .await?;

    if let Some(id) = existing {
        let tenant_id = Uuid::parse_str(&id)
            .map_err(|e| Error::Parse(format!("tenant id '{}': {}", id, e)))?;
        tracing::info!(tenant_id = %tenant_id, "Demo tenant already present");
        return Ok(SeedReport {
            tenant_id,
            created: false,
            tokens,
        });
    }

    let tenant_id = Uuid::new_v4();
    let mut tx = db.pool().begin().await?;

    sqlx::query("INSERT INTO tenants (id, name, slug) VALUES (?, ?, ?)")
        .bind(tenant_id.to_string())
        .bind("Corner Pharmacy")
        .bind(DEMO_TENANT_SLUG)
        .execute(&mut *tx)
        .await?;

    for user in DEMO_USERS {
        insert_user(&mut tx, tenant_id, user).await?;
    }

    let analgesics = insert_category(&mut tx, tenant_id, "Analgesics", Some("Pain relief")).await?;
    let antibiotics = insert_category(&mut tx, tenant_id, "Antibiotics", None).await?;

    for (name, sku, category) in [
        ("Paracetamol 500mg", "PAR-500", analgesics),
        ("Paracetamol Syrup 120mg/5ml", "PAR-SYR", analgesics),
        ("Ibuprofen 400mg", "IBU-400", analgesics),
        ("Amoxicillin 250mg", "AMX-250", antibiotics),
        ("Café Descafeinado", "CAF-001", analgesics),
    ] {
        sqlx::query(
            "INSERT INTO products (id, tenant_id, category_id, name, sku) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id.to_string())
        .bind(category.to_string())
        .bind(name)
        .bind(sku)
        .execute(&mut *tx)
        .await?;
    }

    let supplier_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO suppliers (id, tenant_id, name, contact_name, phone) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(supplier_id.to_string())
    .bind(tenant_id.to_string())
    .bind("Paragon Medical Supply")
    .bind("Rita Gomes")
    .bind("+351 210 000 000")
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO purchases (id, tenant_id, supplier_id, reference) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id.to_string())
        .bind(supplier_id.to_string())
        .bind("PO-2024-0001")
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO invoices (id, tenant_id, number, customer_name) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id.to_string())
        .bind("INV-0042")
        .bind("Clínica Paraná")
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO expenses (id, tenant_id, description, category) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id.to_string())
        .bind("Pharmacy rent")
        .bind("Facilities")
        .execute(&mut *tx)
        .await?;

    for (code, name, symbol) in [("EUR", "Euro", "€"), ("USD", "US Dollar", "$")] {
        sqlx::query(
            "INSERT INTO currencies (id, tenant_id, code, name, symbol) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id.to_string())
        .bind(code)
        .bind(name)
        .bind(symbol)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(tenant_id = %tenant_id, users = DEMO_USERS.len(), "Seeded demo tenant");

    Ok(SeedReport {
        tenant_id,
        created: true,
        tokens,
    })
}

async fn insert_user(
    tx: &mut Transaction<'_, Sqlite>,
    tenant_id: Uuid,
    user: &DemoUser,
) -> Result<()> {
    let user_id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO users (id, tenant_id, name, email, api_token, is_root) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(tenant_id.to_string())
    .bind(user.name)
    .bind(user.email)
    .bind(user.token)
    .bind(user.is_root)
    .execute(&mut **tx)
    .await?;

    for code in user.permissions {
        sqlx::query("INSERT INTO user_permissions (user_id, permission) VALUES (?, ?)")
            .bind(&user_id)
            .bind(*code)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn insert_category(
    tx: &mut Transaction<'_, Sqlite>,
    tenant_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, tenant_id, name, description) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(tenant_id.to_string())
        .bind(name)
        .bind(description)
        .execute(&mut **tx)
        .await?;
    Ok(id)
}
