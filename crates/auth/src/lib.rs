//! `lms-auth`: session model and navigation access policy.
//!
//! Pure functions over immutable inputs: no IO, no HTTP, no storage.

pub mod access;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod session;

pub use access::{
    DenialKind, VisibilityExplanation, VisibleItem, explain_visibility, is_active, is_visible,
    visible_menu,
};
pub use navigation::{Icon, Menu, NavigationItem};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{AuthToken, Session};
