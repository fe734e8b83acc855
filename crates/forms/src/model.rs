//! Form state owned by one screen instance.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use crate::error::{ConfigurationError, SubmitBlocked, SubmitError, ValidationFailure};
use crate::field::{FieldKind, OTHERS};
use crate::file::{FileSelection, PendingFile, PreviewHandle};
use crate::payload::NormalizedPayload;
use crate::schema::{FieldKey, FormSchema};
use crate::validator::{is_valid_date, is_valid_email};
use crate::value::{FieldValue, FormValues};

/// Lifecycle of a single field.
///
/// `Pristine → Touched → {Valid, Invalid}`. Only non-pristine fields are
/// re-validated while the user types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldState {
    Pristine,
    Touched,
    Valid,
    Invalid,
}

#[derive(Debug)]
pub struct FormModel {
    schema: Arc<FormSchema>,
    values: FormValues,
    errors: BTreeMap<String, String>,
    states: Vec<FieldState>,
    visible: Vec<bool>,
    pending_files: BTreeMap<String, PendingFile>,
    previews: BTreeMap<String, PreviewHandle>,
    revoked_previews: Vec<PreviewHandle>,
    is_submitting: bool,
}

impl FormModel {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let values = schema.initial_values();
        let visible = schema.keys().map(|k| schema.is_visible(k, &values)).collect();
        let states = vec![FieldState::Pristine; schema.fields().len()];
        Self {
            schema,
            values,
            errors: BTreeMap::new(),
            states,
            visible,
            pending_files: BTreeMap::new(),
            previews: BTreeMap::new(),
            revoked_previews: Vec::new(),
            is_submitting: false,
        }
    }

    /// Model pre-filled with existing data (edit screens). Fields stay pristine.
    pub fn with_values<I, K, V>(schema: Arc<FormSchema>, initial: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut model = Self::new(schema);
        for (name, value) in initial {
            let key = model.schema.key(name.as_ref())?;
            let name = model.schema.field_spec(key).name().to_string();
            model.values.insert(name, value.into());
        }
        model.reconcile_visibility();
        Ok(model)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// `None` for keys of another schema.
    pub fn state(&self, key: FieldKey) -> Option<FieldState> {
        self.owned(key).ok().map(|k| self.states[k.0])
    }

    pub fn is_visible(&self, key: FieldKey) -> bool {
        self.owned(key).is_ok_and(|k| self.visible[k.0])
    }

    fn owned(&self, key: FieldKey) -> Result<FieldKey, ConfigurationError> {
        if self.schema.owns(key) {
            Ok(key)
        } else {
            Err(ConfigurationError::ForeignKey)
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    // ─────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────

    /// Set a field by name. Unknown names are a programmer error.
    pub fn set_value(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), ConfigurationError> {
        let key = self.schema.key(field)?;
        self.apply(key, value.into());
        Ok(())
    }

    /// Set a field through a resolved key.
    pub fn set(&mut self, key: FieldKey, value: impl Into<FieldValue>) -> Result<(), ConfigurationError> {
        let key = self.owned(key)?;
        self.apply(key, value.into());
        Ok(())
    }

    fn apply(&mut self, key: FieldKey, value: FieldValue) {
        self.write(key, value);
        self.revalidate_after_change(key);
        self.reconcile_visibility();
    }

    /// Apply a batch of controlling values, then settle visibility once.
    ///
    /// Newly hidden fields lose their error. Auxiliary fields keep whatever
    /// was typed so that re-selecting `"Others"` brings it back.
    pub fn set_visibility_derived_fields<I, K, V>(&mut self, values: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut changed = Vec::new();
        for (name, value) in values {
            let key = self.schema.key(name.as_ref())?;
            self.write(key, value.into());
            changed.push(key);
        }
        for key in changed {
            self.revalidate_after_change(key);
        }
        self.reconcile_visibility();
        Ok(())
    }

    /// Mark a field as interacted with (blur) and validate it.
    pub fn touch(&mut self, key: FieldKey) -> Result<(), ConfigurationError> {
        let key = self.owned(key)?;
        if !self.visible[key.0] {
            return Ok(());
        }
        if self.states[key.0] == FieldState::Pristine {
            self.states[key.0] = FieldState::Touched;
        }
        self.revalidate(key);
        Ok(())
    }

    /// Back to defaults, dropping every selection and preview.
    pub fn reset(&mut self) {
        self.values = self.schema.initial_values();
        self.errors.clear();
        self.states.fill(FieldState::Pristine);
        self.pending_files.clear();
        let previews = std::mem::take(&mut self.previews);
        self.revoked_previews.extend(previews.into_values());
        self.reconcile_visibility();
    }

    fn write(&mut self, key: FieldKey, value: FieldValue) {
        let name = self.schema.field_spec(key).name().to_string();
        self.values.insert(name, value);
    }

    fn revalidate_after_change(&mut self, key: FieldKey) {
        if self.states[key.0] != FieldState::Pristine {
            self.revalidate(key);
        }
        let dependents: Vec<FieldKey> = self.schema.dependents_of(key).collect();
        for dependent in dependents {
            if self.states[dependent.0] != FieldState::Pristine {
                self.revalidate(dependent);
            }
        }
    }

    fn revalidate(&mut self, key: FieldKey) {
        let name = self.schema.field_spec(key).name().to_string();
        let visible = self.schema.is_visible(key, &self.values);
        match self.check(key).filter(|_| visible) {
            Some(message) => {
                self.errors.insert(name, message);
                self.states[key.0] = FieldState::Invalid;
            }
            None => {
                self.errors.remove(&name);
                self.states[key.0] = FieldState::Valid;
            }
        }
    }

    fn reconcile_visibility(&mut self) {
        let schema = Arc::clone(&self.schema);
        for key in schema.keys() {
            let now = schema.is_visible(key, &self.values);
            let before = std::mem::replace(&mut self.visible[key.0], now);
            if before && !now {
                let spec = schema.field_spec(key);
                self.errors.remove(spec.name());
                self.states[key.0] = FieldState::Pristine;
                if spec.clear_when_hidden {
                    self.values.insert(spec.name().to_string(), spec.default.clone());
                    self.drop_file(spec.name());
                }
                tracing::debug!(field = spec.name(), cleared = spec.clear_when_hidden, "field hidden");
            } else if !before && now {
                tracing::debug!(field = schema.field_spec(key).name(), "field revealed");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────

    fn check(&self, key: FieldKey) -> Option<String> {
        let spec = self.schema.field_spec(key);
        let value = self.values.get(spec.name()).cloned().unwrap_or_default();
        let has_pending = self.pending_files.contains_key(spec.name());

        let schema = &self.schema;
        let values = &self.values;
        let actively_required = |name: &str| {
            schema
                .key(name)
                .is_ok_and(|k| schema.is_actively_required(k, values))
        };

        if value.is_blank() && !has_pending {
            if spec.required {
                return Some(format!("{} is required", spec.display_label()));
            }
            return spec
                .validators
                .iter()
                .filter(|v| v.checks_blank())
                .find_map(|v| v.check(spec.display_label(), &value, values, &actively_required).err());
        }

        let text = value.as_text().unwrap_or("");
        if !text.is_empty() {
            let kind_error = match spec.kind() {
                FieldKind::Email if !is_valid_email(text.trim()) => {
                    Some("Enter a valid email address".to_string())
                }
                FieldKind::Date if !is_valid_date(text) => {
                    Some(format!("{} must be a valid date (YYYY-MM-DD)", spec.display_label()))
                }
                FieldKind::Select if !spec.select_options().iter().any(|o| o.value == text) => {
                    Some(format!("{} has an invalid selection", spec.display_label()))
                }
                _ => None,
            };
            if kind_error.is_some() {
                return kind_error;
            }
        }

        spec.validators
            .iter()
            .find_map(|v| v.check(spec.display_label(), &value, values, &actively_required).err())
    }

    /// Validate every visible field, marking each as touched.
    ///
    /// Hidden fields always pass. Calling this twice with unchanged values
    /// yields the same map.
    pub fn validate_all(&mut self) -> BTreeMap<String, String> {
        for key in self.schema.keys() {
            if self.schema.is_visible(key, &self.values) {
                if self.states[key.0] == FieldState::Pristine {
                    self.states[key.0] = FieldState::Touched;
                }
                self.revalidate(key);
            } else {
                let name = self.schema.field_spec(key).name().to_string();
                self.errors.remove(&name);
            }
        }
        tracing::debug!(errors = self.errors.len(), "form validated");
        self.errors.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────

    /// Validate and build the API payload.
    ///
    /// Files still waiting for their upload block the submit with a field
    /// error.
    pub fn submit(&mut self) -> Result<NormalizedPayload, ValidationFailure> {
        let mut errors = self.validate_all();
        for (name, message) in self.unuploaded_files() {
            self.errors.entry(name.clone()).or_insert_with(|| message.clone());
            errors.entry(name).or_insert(message);
        }
        if !errors.is_empty() {
            return Err(ValidationFailure { errors });
        }
        Ok(self.payload())
    }

    fn unuploaded_files(&self) -> Vec<(String, String)> {
        self.schema
            .keys()
            .filter(|&key| self.schema.is_visible(key, &self.values))
            .map(|key| self.schema.field_spec(key))
            .filter(|spec| spec.emits() && self.pending_files.contains_key(spec.name()))
            .map(|spec| {
                let message = format!("{} has not been uploaded yet", spec.display_label());
                (spec.name().to_string(), message)
            })
            .collect()
    }

    fn payload(&self) -> NormalizedPayload {
        let mut payload = NormalizedPayload::default();
        for key in self.schema.keys() {
            let spec = self.schema.field_spec(key);
            if !spec.emits() || spec.auxiliary_for().is_some() {
                continue;
            }
            if !self.schema.is_visible(key, &self.values) {
                continue;
            }

            let mut value = self.values.get(spec.name()).cloned().unwrap_or_default();
            if let Some(aux) = self.schema.auxiliary_of(key) {
                let selected_others = value.as_text() == Some(OTHERS);
                if selected_others && self.schema.is_visible(aux, &self.values) {
                    let aux_name = self.schema.field_spec(aux).name();
                    value = self.values.get(aux_name).cloned().unwrap_or_default();
                }
            }
            payload.insert(spec.payload_key(), value.to_json());
        }
        payload
    }

    /// Validate, build the payload and flag the form as submitting.
    ///
    /// Pair with [`FormModel::finish_submit`] once the collaborator returns.
    pub fn begin_submit(&mut self) -> Result<NormalizedPayload, SubmitBlocked> {
        if self.is_submitting {
            return Err(SubmitBlocked::Busy);
        }
        let payload = self.submit()?;
        self.is_submitting = true;
        Ok(payload)
    }

    pub fn finish_submit(&mut self) {
        self.is_submitting = false;
    }

    /// Validate, hand the payload to `send` and clear the submitting flag
    /// whatever the outcome. Failures are not retried.
    pub async fn submit_with<F, Fut, T, E>(&mut self, send: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(NormalizedPayload) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let payload = self.begin_submit()?;
        let outcome = send(payload).await;
        self.finish_submit();
        outcome.map_err(SubmitError::Transport)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────

    /// Hold a picked file for upload and create its preview right away.
    ///
    /// Any previous preview for the field is revoked.
    pub fn select_file(&mut self, field: &str, selection: FileSelection) -> Result<PreviewHandle, ConfigurationError> {
        let key = self.file_key(field)?;
        let name = self.schema.field_spec(key).name().to_string();

        self.pending_files.insert(
            name.clone(),
            PendingFile {
                field: name.clone(),
                selection,
            },
        );
        let preview = PreviewHandle::new();
        if let Some(old) = self.previews.insert(name, preview.clone()) {
            self.revoked_previews.push(old);
        }
        self.revalidate_after_change(key);
        Ok(preview)
    }

    /// Record the stored path returned by the uploader.
    ///
    /// The preview stays until the file is replaced or cleared.
    pub fn complete_upload(&mut self, field: &str, stored_path: impl Into<String>) -> Result<(), ConfigurationError> {
        let key = self.file_key(field)?;
        self.pending_files.remove(self.schema.field_spec(key).name());
        self.apply(key, FieldValue::Text(stored_path.into()));
        Ok(())
    }

    /// Forget the selection and any stored path.
    pub fn clear_file(&mut self, field: &str) -> Result<(), ConfigurationError> {
        let key = self.file_key(field)?;
        let name = self.schema.field_spec(key).name().to_string();
        self.drop_file(&name);
        self.apply(key, FieldValue::empty());
        Ok(())
    }

    pub fn pending_files(&self) -> impl Iterator<Item = &PendingFile> {
        self.pending_files.values()
    }

    pub fn preview(&self, field: &str) -> Option<&PreviewHandle> {
        self.previews.get(field)
    }

    /// Previews the renderer must release.
    pub fn take_revoked_previews(&mut self) -> Vec<PreviewHandle> {
        std::mem::take(&mut self.revoked_previews)
    }

    fn drop_file(&mut self, name: &str) {
        self.pending_files.remove(name);
        if let Some(preview) = self.previews.remove(name) {
            self.revoked_previews.push(preview);
        }
    }

    fn file_key(&self, field: &str) -> Result<FieldKey, ConfigurationError> {
        let key = self.schema.key(field)?;
        if self.schema.field_spec(key).kind() != FieldKind::File {
            return Err(ConfigurationError::KindMismatch {
                field: field.to_string(),
                expected: FieldKind::File,
            });
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::field::{FieldSpec, SelectOption};
    use crate::validator::Validator;

    fn schema() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::builder()
                .field(FieldSpec::text("fullName").required().validate(Validator::min_length(3)))
                .field(FieldSpec::email("email").required())
                .field(FieldSpec::select(
                    "manager",
                    ["Captain", "Major", OTHERS].into_iter().map(SelectOption::plain),
                ))
                .field(FieldSpec::other_for("otherManager", "manager"))
                .field(FieldSpec::mode_flag("showPassword"))
                .field(
                    FieldSpec::password("password")
                        .required()
                        .visible_when(Condition::is_set("showPassword")),
                )
                .field(
                    FieldSpec::confirmation_of("confirmPassword", "password")
                        .required()
                        .visible_when(Condition::is_set("showPassword")),
                )
                .field(FieldSpec::file("photo"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn pristine_fields_do_not_validate_while_typing() {
        let mut form = FormModel::new(schema());
        form.set_value("fullName", "Al").unwrap();
        assert_eq!(form.error("fullName"), None);

        let key = form.schema().key("fullName").unwrap();
        assert_eq!(form.state(key), Some(FieldState::Pristine));

        form.touch(key).unwrap();
        assert_eq!(form.state(key), Some(FieldState::Invalid));
        assert_eq!(form.error("fullName"), Some("Full name must be at least 3 characters"));

        form.set_value("fullName", "Alan").unwrap();
        assert_eq!(form.state(key), Some(FieldState::Valid));
        assert_eq!(form.error("fullName"), None);
    }

    #[test]
    fn unknown_field_is_reported() {
        let mut form = FormModel::new(schema());
        assert_eq!(
            form.set_value("nickname", "x"),
            Err(ConfigurationError::NoSuchField("nickname".into()))
        );
    }

    #[test]
    fn auxiliary_keeps_value_and_drops_error_when_hidden() {
        let mut form = FormModel::new(schema());
        form.set_value("manager", OTHERS).unwrap();
        form.validate_all();
        assert_eq!(form.error("otherManager"), Some("Other manager is required"));

        form.set_value("otherManager", "Acme").unwrap();
        form.set_value("otherManager", "").unwrap();
        assert!(form.error("otherManager").is_some());

        form.set_value("otherManager", "Acme Corp").unwrap();
        form.set_visibility_derived_fields([("manager", "Captain")]).unwrap();
        assert_eq!(form.error("otherManager"), None);
        assert_eq!(form.values().text("otherManager"), "Acme Corp");

        form.set_visibility_derived_fields([("manager", OTHERS)]).unwrap();
        assert_eq!(form.values().text("otherManager"), "Acme Corp");
    }

    #[test]
    fn password_values_cleared_when_mode_switches_off() {
        let mut form = FormModel::new(schema());
        form.set_visibility_derived_fields([("showPassword", true)]).unwrap();
        form.set_value("password", "secret1").unwrap();
        form.set_value("confirmPassword", "secret2").unwrap();
        form.validate_all();
        assert_eq!(form.error("confirmPassword"), Some("Passwords do not match"));

        form.set_visibility_derived_fields([("showPassword", false)]).unwrap();
        assert_eq!(form.values().text("password"), "");
        assert_eq!(form.values().text("confirmPassword"), "");
        assert_eq!(form.error("confirmPassword"), None);
    }

    #[test]
    fn confirm_revalidates_when_primary_changes() {
        let mut form = FormModel::new(schema());
        form.set_value("showPassword", true).unwrap();
        form.set_value("password", "abc123").unwrap();
        form.set_value("confirmPassword", "abc123").unwrap();
        let confirm = form.schema().key("confirmPassword").unwrap();
        form.touch(confirm).unwrap();
        assert_eq!(form.error("confirmPassword"), None);

        form.set_value("password", "abc124").unwrap();
        assert_eq!(form.error("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn kind_checks_apply_to_non_empty_values() {
        let mut form = FormModel::new(schema());
        form.set_value("fullName", "Alan Turing").unwrap();
        form.set_value("email", "alan@").unwrap();
        form.set_value("manager", "Colonel").unwrap();
        let errors = form.validate_all();
        assert_eq!(errors.get("email").map(String::as_str), Some("Enter a valid email address"));
        assert_eq!(errors.get("manager").map(String::as_str), Some("Manager has an invalid selection"));
    }

    #[test]
    fn file_selection_creates_preview_and_revokes_the_old_one() {
        let mut form = FormModel::new(schema());
        let first = form
            .select_file("photo", FileSelection::new("a.png", "image/png", vec![1, 2]))
            .unwrap();
        let second = form
            .select_file("photo", FileSelection::new("b.png", "image/png", vec![3]))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(form.preview("photo"), Some(&second));
        assert_eq!(form.take_revoked_previews(), vec![first]);
        assert_eq!(form.pending_files().count(), 1);

        form.complete_upload("photo", "uploads/b.png").unwrap();
        assert_eq!(form.pending_files().count(), 0);
        assert_eq!(form.values().text("photo"), "uploads/b.png");
        assert_eq!(form.preview("photo"), Some(&second));

        form.clear_file("photo").unwrap();
        assert_eq!(form.preview("photo"), None);
        assert_eq!(form.take_revoked_previews(), vec![second]);
    }

    #[test]
    fn select_file_rejects_non_file_fields() {
        let mut form = FormModel::new(schema());
        let err = form
            .select_file("email", FileSelection::new("a.png", "image/png", vec![]))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::KindMismatch { .. }));
    }

    #[test]
    fn begin_submit_blocks_duplicates() {
        let mut form = FormModel::new(schema());
        form.set_value("fullName", "Alan Turing").unwrap();
        form.set_value("email", "alan@bletchley.uk").unwrap();

        assert!(form.begin_submit().is_ok());
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(), Err(SubmitBlocked::Busy));

        form.finish_submit();
        assert!(!form.is_submitting());
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn with_values_prefills_without_touching() {
        let form = FormModel::with_values(schema(), [("fullName", "Grace Hopper"), ("manager", OTHERS)]).unwrap();
        let aux = form.schema().key("otherManager").unwrap();
        assert!(form.is_visible(aux));
        assert_eq!(form.state(aux), Some(FieldState::Pristine));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = FormModel::new(schema());
        form.set_value("fullName", "x").unwrap();
        form.select_file("photo", FileSelection::new("a.png", "image/png", vec![1])).unwrap();
        form.validate_all();
        form.reset();

        assert_eq!(form.values().text("fullName"), "");
        assert!(form.errors().is_empty());
        assert_eq!(form.pending_files().count(), 0);
        assert_eq!(form.take_revoked_previews().len(), 1);
    }

    fn filled(form: &mut FormModel) {
        form.set_visibility_derived_fields([("fullName", "Grace Hopper"), ("email", "grace@navy.mil")])
            .unwrap();
    }

    #[test]
    fn pending_upload_blocks_submit() {
        let mut form = FormModel::new(schema());
        filled(&mut form);
        form.select_file("photo", FileSelection::new("a.png", "image/png", vec![1])).unwrap();

        let failure = form.submit().unwrap_err();
        assert_eq!(
            failure.errors.get("photo").map(String::as_str),
            Some("Photo has not been uploaded yet")
        );
        assert_eq!(form.error("photo"), Some("Photo has not been uploaded yet"));

        form.complete_upload("photo", "uploads/a.png").unwrap();
        let payload = form.submit().unwrap();
        assert_eq!(payload.get("photo"), Some(&serde_json::json!("uploads/a.png")));
    }

    #[test]
    fn optional_confirmation_left_blank_must_still_match() {
        let schema = Arc::new(
            FormSchema::builder()
                .field(FieldSpec::password("newPassword").required())
                .field(FieldSpec::confirmation_of("repeatPassword", "newPassword"))
                .build()
                .unwrap(),
        );
        let mut form = FormModel::new(schema);
        assert!(!form.validate_all().contains_key("repeatPassword"));

        form.set_value("newPassword", "s3cretpass").unwrap();
        let errors = form.validate_all();
        assert_eq!(
            errors.get("repeatPassword").map(String::as_str),
            Some(crate::validator::PASSWORDS_DO_NOT_MATCH)
        );

        form.set_value("repeatPassword", "s3cretpass").unwrap();
        assert!(form.validate_all().is_empty());
    }

    #[test]
    fn keys_of_another_schema_are_refused() {
        let mut form = FormModel::new(schema());
        let other = schema();
        let foreign = other.key("fullName").unwrap();

        assert_eq!(form.state(foreign), None);
        assert!(!form.is_visible(foreign));
        assert_eq!(form.set(foreign, "x"), Err(ConfigurationError::ForeignKey));
        assert_eq!(form.touch(foreign), Err(ConfigurationError::ForeignKey));
        assert_eq!(form.values().text("fullName"), "");
    }
}
