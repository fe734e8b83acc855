//! Declarative navigation table.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::Serialize;

use lms_core::{DomainError, DomainResult};

use crate::Role;

/// Symbolic icon reference, resolved by whatever renders the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Icon(Cow<'static, str>);

impl Icon {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry of the navigation table.
///
/// `allowed_roles == None` means every authenticated role may see the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub title: Cow<'static, str>,
    pub target: Cow<'static, str>,
    pub icon: Option<Icon>,
    pub allowed_roles: Option<BTreeSet<Role>>,
    pub required_permission: Option<Cow<'static, str>>,
    pub sub_items: Vec<NavigationItem>,
}

impl NavigationItem {
    pub fn new(title: impl Into<Cow<'static, str>>, target: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
            icon: None,
            allowed_roles: None,
            required_permission: None,
            sub_items: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<Cow<'static, str>>) -> Self {
        self.icon = Some(Icon::new(icon));
        self
    }

    pub fn allowed_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn required_permission(mut self, permission: impl Into<Cow<'static, str>>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    pub fn sub_items(mut self, items: impl IntoIterator<Item = NavigationItem>) -> Self {
        self.sub_items = items.into_iter().collect();
        self
    }

    pub fn is_composite(&self) -> bool {
        !self.sub_items.is_empty()
    }
}

/// Validated, immutable navigation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<NavigationItem>,
}

impl Menu {
    /// Build a menu, rejecting tables nested deeper than one level.
    pub fn new(items: impl IntoIterator<Item = NavigationItem>) -> DomainResult<Self> {
        let items: Vec<NavigationItem> = items.into_iter().collect();

        for item in &items {
            if let Some(nested) = item.sub_items.iter().find(|sub| sub.is_composite()) {
                return Err(DomainError::configuration(format!(
                    "navigation item '{}' under '{}' has its own sub-items; only one level of nesting is supported",
                    nested.title, item.title
                )));
            }
            if item.target.is_empty() && !item.is_composite() {
                return Err(DomainError::configuration(format!(
                    "navigation item '{}' has no target",
                    item.title
                )));
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }
}
