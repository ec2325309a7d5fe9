//! Search specifications
//!
//! Composable visibility rules applied to candidate items before ranking.

use std::collections::HashSet;

use crate::domain::identity::PermissionSet;
use crate::domain::specification::{AndSpecification, Specification, spec};

use super::entity::{SearchItemType, SearchableItem};

/// An item is visible iff the viewer is root or holds its permission
pub struct PermissionSpec {
    permissions: PermissionSet,
    is_root: bool,
}

impl PermissionSpec {
    pub fn new(permissions: PermissionSet, is_root: bool) -> Self {
        Self {
            permissions,
            is_root,
        }
    }

    /// A spec for root viewers, who see everything
    pub fn root() -> Self {
        Self::new(PermissionSet::new(), true)
    }
}

impl Specification<SearchableItem> for PermissionSpec {
    fn is_satisfied_by(&self, item: &SearchableItem) -> bool {
        self.is_root || self.permissions.contains(&item.required_permission)
    }
}

/// Specification for filtering by item type
pub struct ItemTypeSpec {
    allowed_types: HashSet<SearchItemType>,
}

impl ItemTypeSpec {
    /// Restrict to the given types; an empty list allows every type
    pub fn new(allowed_types: impl IntoIterator<Item = SearchItemType>) -> Self {
        Self {
            allowed_types: allowed_types.into_iter().collect(),
        }
    }

    pub fn all_types() -> Self {
        Self {
            allowed_types: HashSet::new(),
        }
    }
}

impl Specification<SearchableItem> for ItemTypeSpec {
    fn is_satisfied_by(&self, item: &SearchableItem) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.contains(&item.item_type)
    }
}

/// Builder for composing search visibility rules
#[derive(Default)]
pub struct SearchSpecBuilder {
    permission_spec: Option<PermissionSpec>,
    item_type_spec: Option<ItemTypeSpec>,
}

impl SearchSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the permission rule
    pub fn with_permissions(mut self, permissions: PermissionSet, is_root: bool) -> Self {
        self.permission_spec = Some(PermissionSpec::new(permissions, is_root));
        self
    }

    /// Add item type filter
    pub fn with_item_types(mut self, types: Vec<SearchItemType>) -> Self {
        self.item_type_spec = Some(ItemTypeSpec::new(types));
        self
    }

    /// Compose the configured rules into one specification
    ///
    /// Without a permission rule nothing is visible.
    pub fn build(self) -> AndSpecification<SearchableItem> {
        let types = self.item_type_spec.unwrap_or_else(ItemTypeSpec::all_types);
        match self.permission_spec {
            Some(permissions) => permissions.and(types),
            None => spec(|_: &SearchableItem| false).and(types),
        }
    }

    /// Filter a collection of items
    pub fn filter(self, items: Vec<SearchableItem>) -> Vec<SearchableItem> {
        let visible = self.build();
        items
            .into_iter()
            .filter(|item| visible.is_satisfied_by(item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::permission::{INVOICE_VIEW, PRODUCT_VIEW, USER_VIEW};

    fn item(item_type: SearchItemType, permission: &str) -> SearchableItem {
        SearchableItem::new("1", item_type, "Paracetamol", "/x/1", permission)
    }

    #[test]
    fn test_permission_spec_requires_matching_code() {
        let spec = PermissionSpec::new([PRODUCT_VIEW].into_iter().collect(), false);

        assert!(spec.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));
        assert!(!spec.is_satisfied_by(&item(SearchItemType::User, USER_VIEW)));
    }

    #[test]
    fn test_root_sees_everything() {
        let spec = PermissionSpec::root();

        assert!(spec.is_satisfied_by(&item(SearchItemType::User, USER_VIEW)));
        assert!(spec.is_satisfied_by(&item(SearchItemType::Tenant, "admin.tenant.view")));
    }

    #[test]
    fn test_empty_permission_set_sees_nothing() {
        let spec = PermissionSpec::new(PermissionSet::new(), false);
        assert!(!spec.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));
    }

    #[test]
    fn test_item_type_spec() {
        let spec = ItemTypeSpec::new([SearchItemType::Invoice]);
        assert!(spec.is_satisfied_by(&item(SearchItemType::Invoice, INVOICE_VIEW)));
        assert!(!spec.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));

        let spec = ItemTypeSpec::all_types();
        assert!(spec.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));
    }

    #[test]
    fn test_builder_combines_rules() {
        let visible = SearchSpecBuilder::new()
            .with_permissions([PRODUCT_VIEW, INVOICE_VIEW].into_iter().collect(), false)
            .with_item_types(vec![SearchItemType::Product])
            .build();

        assert!(visible.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));
        assert!(!visible.is_satisfied_by(&item(SearchItemType::Invoice, INVOICE_VIEW)));
        assert!(!visible.is_satisfied_by(&item(SearchItemType::User, USER_VIEW)));
    }

    #[test]
    fn test_builder_without_permission_rule_hides_all() {
        let visible = SearchSpecBuilder::new().with_item_types(vec![]).build();
        assert!(!visible.is_satisfied_by(&item(SearchItemType::Product, PRODUCT_VIEW)));
    }

    #[test]
    fn test_filter_items() {
        let items = vec![
            item(SearchItemType::Product, PRODUCT_VIEW),
            item(SearchItemType::User, USER_VIEW),
            item(SearchItemType::Invoice, INVOICE_VIEW),
        ];

        let builder = SearchSpecBuilder::new()
            .with_permissions([PRODUCT_VIEW, USER_VIEW].into_iter().collect(), false);

        let filtered = builder.filter(items);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|i| i.item_type != SearchItemType::Invoice));
    }
}
