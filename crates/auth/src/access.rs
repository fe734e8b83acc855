//! Navigation access policy.
//!
//! - No IO
//! - No panics
//! - Pure over the session and the static menu table

use serde::Serialize;

use crate::{Menu, NavigationItem, Session};

const ROOT_PATH: &str = "/";
const DASHBOARD_PREFIX: &str = "/dashboard";

fn roles_satisfied(item: &NavigationItem, session: &Session) -> bool {
    match &item.allowed_roles {
        None => true,
        Some(roles) => roles.contains(&session.role()),
    }
}

fn leaf_visible(item: &NavigationItem, session: &Session) -> bool {
    if !roles_satisfied(item, session) {
        return false;
    }
    match &item.required_permission {
        Some(permission) => session.has_permission(permission),
        None => true,
    }
}

/// Decide whether a navigation item is shown to the session.
///
/// Leaves: role gate first, then the optional permission. Composite items are
/// shown when their own role gate passes or when any sub-item is shown.
pub fn is_visible(item: &NavigationItem, session: &Session) -> bool {
    let visible = if item.is_composite() {
        roles_satisfied(item, session) || item.sub_items.iter().any(|sub| leaf_visible(sub, session))
    } else {
        leaf_visible(item, session)
    };

    tracing::trace!(
        title = %item.title,
        role = %session.role(),
        visible,
        "navigation visibility evaluated"
    );
    visible
}

/// Whether `current_path` should highlight the item targeting `target`.
///
/// The root dashboard also owns every `/dashboard...` path. A target-less
/// group is never active on its own.
pub fn is_active(target: &str, current_path: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    if target == current_path {
        return true;
    }
    if target == ROOT_PATH {
        return current_path.starts_with(DASHBOARD_PREFIX);
    }
    current_path
        .strip_prefix(target)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// A navigation item as rendered for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub title: String,
    pub target: String,
    pub icon: Option<String>,
    pub active: bool,
    pub sub_items: Vec<VisibleItem>,
}

fn render(item: &NavigationItem, session: &Session, current_path: &str) -> VisibleItem {
    let sub_items: Vec<VisibleItem> = item
        .sub_items
        .iter()
        .filter(|sub| is_visible(sub, session))
        .map(|sub| render(sub, session, current_path))
        .collect();

    let active = is_active(&item.target, current_path) || sub_items.iter().any(|s| s.active);

    VisibleItem {
        title: item.title.to_string(),
        target: item.target.to_string(),
        icon: item.icon.as_ref().map(|i| i.as_str().to_string()),
        active,
        sub_items,
    }
}

/// Filter the menu table down to what the session may see, with active flags.
pub fn visible_menu(menu: &Menu, session: &Session, current_path: &str) -> Vec<VisibleItem> {
    let items: Vec<VisibleItem> = menu
        .items()
        .iter()
        .filter(|item| is_visible(item, session))
        .map(|item| render(item, session, current_path))
        .collect();

    tracing::debug!(
        user_id = %session.user_id(),
        role = %session.role(),
        shown = items.len(),
        total = menu.items().len(),
        "navigation filtered"
    );
    items
}

// ─────────────────────────────────────────────────────────────────────────────
// Visibility Explanation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    RoleNotAllowed,
    MissingPermission,
}

/// Why a navigation item is shown or hidden for a session.
///
/// Meant for debugging the menu table, not for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityExplanation {
    pub title: String,
    pub visible: bool,
    pub reason: String,
    pub role: String,
    pub allowed_roles: Option<Vec<String>>,
    pub required_permission: Option<String>,
    pub denial: Option<DenialKind>,
    /// Sub-items that would be shown, for composite entries.
    pub visible_sub_items: Vec<String>,
}

pub fn explain_visibility(item: &NavigationItem, session: &Session) -> VisibilityExplanation {
    let role = session.role();
    let allowed_roles = item
        .allowed_roles
        .as_ref()
        .map(|roles| roles.iter().map(|r| r.as_str().to_string()).collect());
    let visible_sub_items: Vec<String> = item
        .sub_items
        .iter()
        .filter(|sub| is_visible(sub, session))
        .map(|sub| sub.title.to_string())
        .collect();

    let visible = is_visible(item, session);
    let roles_ok = roles_satisfied(item, session);

    let (reason, denial) = if item.is_composite() {
        if roles_ok {
            (format!("Role '{role}' may open the '{}' group", item.title), None)
        } else if !visible_sub_items.is_empty() {
            (
                format!("Group shown because sub-items are visible: {:?}", visible_sub_items),
                None,
            )
        } else {
            (
                format!("Role '{role}' is not allowed and no sub-item is visible"),
                Some(DenialKind::RoleNotAllowed),
            )
        }
    } else if item.allowed_roles.is_none() && item.required_permission.is_none() {
        ("Item is open to every authenticated role".to_string(), None)
    } else if !roles_ok {
        (
            format!("Role '{role}' is not in the allowed roles {:?}", allowed_roles),
            Some(DenialKind::RoleNotAllowed),
        )
    } else if let Some(permission) = &item.required_permission {
        if visible {
            (format!("Session holds permission '{permission}'"), None)
        } else {
            (
                format!("Session lacks required permission '{permission}'"),
                Some(DenialKind::MissingPermission),
            )
        }
    } else {
        (format!("Role '{role}' is allowed"), None)
    };

    VisibilityExplanation {
        title: item.title.to_string(),
        visible,
        reason,
        role: role.as_str().to_string(),
        allowed_roles,
        required_permission: item.required_permission.as_ref().map(|p| p.to_string()),
        denial,
        visible_sub_items,
    }
}
