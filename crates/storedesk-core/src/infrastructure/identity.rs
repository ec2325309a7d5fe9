//! SQLite identity resolver
//!
//! Maps an opaque API token to the active user owning it.

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::Result;
use crate::domain::identity::{IdentityResolver, PermissionSet, User};
use crate::error::Error;
use crate::storage::Database;

/// Resolves bearer tokens against the `users` table
#[derive(Debug, Clone)]
pub struct SqliteIdentityResolver {
    db: Database,
}

impl SqliteIdentityResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn load_permissions(&self, user_id: &str) -> Result<PermissionSet> {
        let codes: Vec<String> =
            sqlx::query_scalar("SELECT permission FROM user_permissions WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(self.db.pool())
                .await?;

        Ok(codes.into_iter().collect())
    }
}

fn parse_uuid(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Parse(format!("{} '{}': {}", column, value, e)))
}

#[async_trait]
impl IdentityResolver for SqliteIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT u.id, u.tenant_id, u.name, u.email, u.is_root
            FROM users u
            JOIN tenants t ON t.id = u.tenant_id
            WHERE u.api_token = ? AND u.is_active = 1 AND t.is_active = 1
            "#,
        )
        .bind(token)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            tracing::debug!("No active user for token");
            return Ok(None);
        };

        let id: String = row.try_get("id")?;
        let tenant_id: String = row.try_get("tenant_id")?;
        let permissions = self.load_permissions(&id).await?;

        Ok(Some(User {
            id: parse_uuid("users.id", &id)?,
            tenant_id: parse_uuid("users.tenant_id", &tenant_id)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            is_root: row.try_get("is_root")?,
            permissions,
        }))
    }
}
