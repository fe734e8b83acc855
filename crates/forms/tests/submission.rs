//! Black-box behaviour of a registration-style form.

use std::sync::Arc;

use lms_forms::{
    Condition, FieldSpec, FormModel, FormSchema, OTHERS, SelectOption, SubmitError, Validator,
};
use serde_json::json;

fn registration() -> Arc<FormSchema> {
    Arc::new(
        FormSchema::builder()
            .field(FieldSpec::text("firstName").required())
            .field(FieldSpec::email("email").required())
            .field(FieldSpec::select(
                "manager",
                ["Captain", "Chief Officer", OTHERS].into_iter().map(SelectOption::plain),
            ).required())
            .field(FieldSpec::other_for("otherManager", "manager"))
            .field(FieldSpec::mode_flag("showPassword"))
            .field(FieldSpec::mode_flag("showResetPassword"))
            .field(
                FieldSpec::password("password")
                    .required()
                    .validate(Validator::min_length(6))
                    .visible_when(Condition::any([
                        Condition::is_set("showPassword"),
                        Condition::is_set("showResetPassword"),
                    ])),
            )
            .field(
                FieldSpec::confirmation_of("confirmPassword", "password")
                    .required()
                    .visible_when(Condition::any([
                        Condition::is_set("showPassword"),
                        Condition::is_set("showResetPassword"),
                    ])),
            )
            .build()
            .unwrap(),
    )
}

fn filled() -> FormModel {
    let mut form = FormModel::new(registration());
    form.set_value("firstName", "Molmi").unwrap();
    form.set_value("email", "molmi@fleet.example").unwrap();
    form
}

#[test]
fn hidden_auxiliary_never_reports_required() {
    let mut form = filled();
    form.set_value("manager", "Captain").unwrap();
    let errors = form.validate_all();
    assert!(!errors.contains_key("otherManager"));
    assert!(errors.is_empty());
}

#[test]
fn others_value_replaces_parent_slot() {
    let mut form = filled();
    form.set_value("manager", OTHERS).unwrap();
    form.set_value("otherManager", "Acme Corp").unwrap();

    let payload = form.submit().unwrap();
    assert_eq!(payload.get("manager"), Some(&json!("Acme Corp")));
    assert!(!payload.contains_key("other_manager"));
    assert!(!payload.contains_key("otherManager"));
    assert_eq!(payload.get("first_name"), Some(&json!("Molmi")));
}

#[test]
fn stale_auxiliary_value_is_not_submitted() {
    let mut form = filled();
    form.set_value("manager", OTHERS).unwrap();
    form.set_value("otherManager", "Acme Corp").unwrap();
    form.set_visibility_derived_fields([("manager", "Captain")]).unwrap();

    let payload = form.submit().unwrap();
    assert_eq!(payload.get("manager"), Some(&json!("Captain")));
}

#[test]
fn confirm_password_mismatch_reported_on_confirm_only() {
    let mut form = filled();
    form.set_value("manager", "Captain").unwrap();
    form.set_value("showPassword", true).unwrap();
    form.set_value("password", "abc123").unwrap();
    form.set_value("confirmPassword", "abc124").unwrap();

    let errors = form.validate_all();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("confirmPassword").map(String::as_str), Some("Passwords do not match"));

    form.set_value("confirmPassword", "abc123").unwrap();
    assert!(form.validate_all().is_empty());
}

#[test]
fn reset_mode_alone_activates_password_rules() {
    let mut form = filled();
    form.set_value("manager", "Captain").unwrap();
    form.set_value("showResetPassword", true).unwrap();

    let errors = form.validate_all();
    assert_eq!(errors.get("password").map(String::as_str), Some("Password is required"));
}

#[test]
fn password_emitted_once_and_mode_flags_omitted() {
    let mut form = filled();
    form.set_value("manager", "Captain").unwrap();
    form.set_value("showPassword", true).unwrap();
    form.set_value("password", "abc123").unwrap();
    form.set_value("confirmPassword", "abc123").unwrap();

    let payload = form.submit().unwrap();
    assert_eq!(payload.get("password"), Some(&json!("abc123")));
    assert!(!payload.contains_key("confirm_password"));
    assert!(!payload.contains_key("show_password"));
    assert!(!payload.contains_key("show_reset_password"));
}

#[test]
fn validate_all_is_idempotent() {
    let mut form = FormModel::new(registration());
    form.set_value("manager", OTHERS).unwrap();
    let first = form.validate_all();
    let second = form.validate_all();
    assert_eq!(first, second);
    assert!(first.contains_key("otherManager"));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_sender() {
    let mut form = FormModel::new(registration());
    let mut called = false;

    let outcome = form
        .submit_with(|_payload| {
            called = true;
            async { Ok::<_, String>(()) }
        })
        .await;

    assert!(matches!(outcome, Err(SubmitError::Invalid(_))));
    assert!(!called);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn submitting_flag_resets_after_transport_failure() {
    let mut form = filled();
    form.set_value("manager", "Captain").unwrap();

    let outcome = form
        .submit_with(|payload| async move {
            assert_eq!(payload.get("email"), Some(&json!("molmi@fleet.example")));
            Err::<(), _>("503 Service Unavailable".to_string())
        })
        .await;

    assert!(matches!(outcome, Err(SubmitError::Transport(ref e)) if e.contains("503")));
    assert!(!form.is_submitting());

    let retried = form.submit_with(|_| async { Ok::<_, String>(42) }).await;
    assert_eq!(retried.ok(), Some(42));
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: validate_all is stable for unchanged values.
        #[test]
        fn validate_all_twice_is_identical(
            first in "[A-Za-z ]{0,12}",
            email in "[a-z@.]{0,16}",
            manager in prop::sample::select(vec!["", "Captain", "Chief Officer", OTHERS, "Bosun"]),
            other in "[A-Za-z ]{0,10}",
            show in any::<bool>(),
            password in "[a-z0-9]{0,8}",
            confirm in "[a-z0-9]{0,8}",
        ) {
            let mut form = FormModel::new(registration());
            form.set_value("firstName", first).unwrap();
            form.set_value("email", email).unwrap();
            form.set_value("manager", manager).unwrap();
            form.set_value("otherManager", other).unwrap();
            form.set_value("showPassword", show).unwrap();
            form.set_value("password", password).unwrap();
            form.set_value("confirmPassword", confirm).unwrap();

            let a = form.validate_all();
            let b = form.validate_all();
            prop_assert_eq!(a, b);
        }

        /// Property: a hidden auxiliary never carries a required error.
        #[test]
        fn hidden_auxiliary_always_passes(
            manager in prop::sample::select(vec!["", "Captain", "Chief Officer"]),
        ) {
            let mut form = FormModel::new(registration());
            form.set_value("manager", manager).unwrap();
            let errors = form.validate_all();
            prop_assert!(!errors.contains_key("otherManager"));
        }
    }
}
