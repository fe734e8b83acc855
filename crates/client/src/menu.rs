//! Static navigation table.

use lms_auth::{Menu, NavigationItem, Role};
use lms_core::DomainResult;

/// Permission names handed out by the backend.
pub mod permissions {
    pub const CREATE_CANDIDATES: &str = "create_candidates";
    pub const VIEW_QUESTIONS: &str = "view_questions";
    pub const CREATE_QUESTIONS: &str = "create_questions";
    pub const VIEW_COURSES: &str = "view_courses";
    pub const EXPORT_REPORTS: &str = "export_reports";
}

use permissions::*;

const STAFF: [Role; 3] = [Role::Admin, Role::SuperAdmin, Role::Trainer];
const ADMINS: [Role; 2] = [Role::Admin, Role::SuperAdmin];

/// The sidebar of the admin client.
///
/// Sub-items are filtered on their own, so each repeats its group's roles.
pub fn main_menu() -> DomainResult<Menu> {
    Menu::new([
        NavigationItem::new("Dashboard", "/").icon("dashboard"),
        NavigationItem::new("Candidates", "/candidates")
            .icon("users")
            .allowed_roles(STAFF)
            .sub_items([
                NavigationItem::new("All candidates", "/candidates")
                    .icon("list")
                    .allowed_roles(STAFF),
                NavigationItem::new("Register candidate", "/candidates/new")
                    .icon("user-plus")
                    .allowed_roles(STAFF)
                    .required_permission(CREATE_CANDIDATES),
            ]),
        NavigationItem::new("Question bank", "/questions")
            .icon("help-circle")
            .allowed_roles(STAFF)
            .sub_items([
                NavigationItem::new("Questions", "/questions")
                    .icon("list")
                    .allowed_roles(STAFF)
                    .required_permission(VIEW_QUESTIONS),
                NavigationItem::new("New question", "/questions/new")
                    .icon("plus")
                    .allowed_roles(STAFF)
                    .required_permission(CREATE_QUESTIONS),
            ]),
        NavigationItem::new("Courses", "/courses")
            .icon("book")
            .allowed_roles(STAFF)
            .required_permission(VIEW_COURSES),
        NavigationItem::new("Reports", "/reports")
            .icon("file-text")
            .allowed_roles(ADMINS)
            .sub_items([
                NavigationItem::new("Candidate report", "/reports/candidates")
                    .allowed_roles(ADMINS)
                    .required_permission(EXPORT_REPORTS),
                NavigationItem::new("Assessment report", "/reports/assessments")
                    .allowed_roles(ADMINS)
                    .required_permission(EXPORT_REPORTS),
            ]),
        NavigationItem::new("Administrators", "/admins")
            .icon("shield")
            .allowed_roles([Role::SuperAdmin]),
        NavigationItem::new("My assessments", "/assessments")
            .icon("clipboard")
            .allowed_roles([Role::Candidate]),
        NavigationItem::new("Profile", "/profile").icon("user"),
    ])
}
