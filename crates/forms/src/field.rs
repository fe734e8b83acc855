//! Field declarations.

use serde::Serialize;

use crate::condition::Condition;
use crate::validator::Validator;
use crate::value::FieldValue;

/// Sentinel option that reveals an auxiliary free-text field.
pub const OTHERS: &str = "Others";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Date,
    Select,
    Checkbox,
    File,
    Hidden,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::File => "file",
            FieldKind::Hidden => "hidden",
        }
    }
}

impl core::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Declarative description of one field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) visible_when: Option<Condition>,
    pub(crate) validators: Vec<Validator>,
    pub(crate) options: Vec<SelectOption>,
    pub(crate) output_key: Option<String>,
    pub(crate) emit: bool,
    pub(crate) clear_when_hidden: bool,
    pub(crate) auxiliary_for: Option<String>,
    pub(crate) default: FieldValue,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: humanize(&name),
            name,
            kind,
            required: false,
            visible_when: None,
            validators: Vec::new(),
            options: Vec::new(),
            output_key: None,
            emit: true,
            clear_when_hidden: kind == FieldKind::Password,
            auxiliary_for: None,
            default: match kind {
                FieldKind::Checkbox => FieldValue::Flag(false),
                _ => FieldValue::empty(),
            },
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Password)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn select(name: impl Into<String>, options: impl IntoIterator<Item = SelectOption>) -> Self {
        Self::new(name, FieldKind::Select).options(options)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::File)
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Hidden)
    }

    /// Externally controlled mode switch (e.g. `showPassword`).
    ///
    /// Never rendered, never submitted; only read by other fields' conditions.
    pub fn mode_flag(name: impl Into<String>) -> Self {
        Self::hidden(name).default_value(false).omit_from_payload()
    }

    /// Free-text field capturing the value of `parent` when it is `"Others"`.
    pub fn other_for(name: impl Into<String>, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        let mut spec = Self::text(name)
            .required()
            .visible_when(Condition::equals(parent.clone(), OTHERS));
        spec.auxiliary_for = Some(parent);
        spec
    }

    /// Confirmation of a password field: checked for equality, never submitted.
    ///
    /// Left blank it still fails while the required primary holds a value.
    pub fn confirmation_of(name: impl Into<String>, primary: impl Into<String>) -> Self {
        Self::password(name)
            .validate(Validator::matches(primary))
            .omit_from_payload()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }

    pub fn omit_from_payload(mut self) -> Self {
        self.emit = false;
        self
    }

    pub fn clear_when_hidden(mut self, clear: bool) -> Self {
        self.clear_when_hidden = clear;
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.visible_when.as_ref()
    }

    pub fn select_options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn auxiliary_for(&self) -> Option<&str> {
        self.auxiliary_for.as_deref()
    }

    pub fn emits(&self) -> bool {
        self.emit
    }

    pub fn default_field_value(&self) -> &FieldValue {
        &self.default
    }

    /// Key used in the submitted payload.
    pub fn payload_key(&self) -> String {
        self.output_key
            .clone()
            .unwrap_or_else(|| crate::payload::to_snake_case(&self.name))
    }
}

/// `otherEmployeeType` → `Other employee type`.
fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.extend(c.to_lowercase());
        } else {
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}
