//! Identity domain module
//!
//! Users, permission codes, and the capabilities derived from them.
//! Resolving a request to a `User` is done by an [`IdentityResolver`].

pub mod permission;
pub mod user;

use async_trait::async_trait;

use crate::error::Result;

pub use permission::PermissionSet;
pub use user::{AdminCapabilities, Identity, User};

/// Looks up the user behind an opaque access token
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a token; `Ok(None)` when no active user owns it
    async fn resolve(&self, token: &str) -> Result<Option<User>>;
}
