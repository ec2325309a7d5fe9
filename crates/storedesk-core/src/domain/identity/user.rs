//! Users and the capabilities derived from their permissions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::{self, PermissionSet};

/// What a request handler needs to know about the caller
pub trait Identity: Send + Sync {
    /// Tenant the caller belongs to
    fn tenant_id(&self) -> Uuid;

    /// Permission codes granted to the caller
    fn permission_codes(&self) -> &PermissionSet;

    /// Root users bypass every permission check
    fn is_root(&self) -> bool;

    /// Check a single permission, honouring the root override
    fn can(&self, code: &str) -> bool {
        self.is_root() || self.permission_codes().contains(code)
    }
}

/// Administrative capabilities computed from permission membership
///
/// Any identity gets these for free; there is no separate admin type.
pub trait AdminCapabilities: Identity {
    fn can_manage_users(&self) -> bool {
        self.can(permission::USER_MANAGE)
    }

    fn can_manage_tenants(&self) -> bool {
        self.can(permission::TENANT_MANAGE)
    }

    fn is_admin(&self) -> bool {
        self.can_manage_users() || self.can_manage_tenants()
    }
}

impl<T: Identity + ?Sized> AdminCapabilities for T {}

/// A back-office user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_root: bool,
    pub permissions: PermissionSet,
}

impl User {
    pub fn new(tenant_id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.into(),
            email: email.into(),
            is_root: false,
            permissions: PermissionSet::new(),
        }
    }

    pub fn with_permission(mut self, code: impl Into<String>) -> Self {
        self.permissions.insert(code);
        self
    }

    pub fn with_permissions<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in codes {
            self.permissions.insert(code);
        }
        self
    }

    pub fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }
}

impl Identity for User {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn permission_codes(&self) -> &PermissionSet {
        &self.permissions
    }

    fn is_root(&self) -> bool {
        self.is_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::permission::{PRODUCT_VIEW, TENANT_MANAGE, USER_MANAGE};

    #[test]
    fn test_plain_user_has_no_admin_capabilities() {
        let user = User::new(Uuid::new_v4(), "Cashier", "cashier@example.com")
            .with_permission(PRODUCT_VIEW);

        assert!(user.can(PRODUCT_VIEW));
        assert!(!user.can_manage_users());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_capabilities_follow_permissions() {
        let user = User::new(Uuid::new_v4(), "Manager", "manager@example.com")
            .with_permission(USER_MANAGE);

        assert!(user.can_manage_users());
        assert!(!user.can_manage_tenants());
        assert!(user.is_admin());

        let user = user.with_permission(TENANT_MANAGE);
        assert!(user.can_manage_tenants());
    }

    #[test]
    fn test_root_implies_everything() {
        let root = User::new(Uuid::new_v4(), "Owner", "owner@example.com").as_root();

        assert!(root.permissions.is_empty());
        assert!(root.can("anything.at.all"));
        assert!(root.can_manage_users());
        assert!(root.can_manage_tenants());
    }
}
