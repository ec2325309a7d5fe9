//! Permission codes and permission sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PRODUCT_VIEW: &str = "pharmacy.product.view";
pub const CATEGORY_VIEW: &str = "pharmacy.category.view";
pub const SUPPLIER_VIEW: &str = "purchasing.supplier.view";
pub const PURCHASE_VIEW: &str = "purchasing.purchase.view";
pub const INVOICE_VIEW: &str = "finance.invoice.view";
pub const EXPENSE_VIEW: &str = "finance.expense.view";
pub const CURRENCY_VIEW: &str = "settings.currency.view";
pub const USER_VIEW: &str = "admin.user.view";
pub const USER_MANAGE: &str = "admin.user.manage";
pub const TENANT_VIEW: &str = "admin.tenant.view";
pub const TENANT_MANAGE: &str = "admin.tenant.manage";

/// A set of opaque permission codes held by a user
///
/// Ordered so that serialized output and log lines are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        self.0.insert(code.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
