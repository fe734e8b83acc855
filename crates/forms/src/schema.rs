//! Form schema and its builder.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConfigurationError;
use crate::field::{FieldKind, FieldSpec, OTHERS};
use crate::value::FormValues;

/// Resolved handle to a field of one schema.
///
/// Obtained through [`FormSchema::key`], so holding one proves the name
/// exists. Keys carry the identity of the schema that issued them; other
/// schemas treat them as unknown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey(pub(crate) usize, u64);

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered, validated set of fields.
#[derive(Debug, Clone)]
pub struct FormSchema {
    id: u64,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    /// field -> fields whose validators read it
    dependents: HashMap<usize, Vec<usize>>,
    /// parent -> its auxiliary "Others" field
    auxiliaries: HashMap<usize, usize>,
}

#[derive(Debug, Default)]
pub struct FormSchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl FormSchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Check every cross-reference and freeze the schema.
    pub fn build(self) -> Result<FormSchema, ConfigurationError> {
        let fields = self.fields;

        let mut index = HashMap::with_capacity(fields.len());
        for (i, spec) in fields.iter().enumerate() {
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(ConfigurationError::DuplicateField(spec.name.clone()));
            }
        }

        let resolve = |field: &str, referenced_by: &str| {
            index
                .get(field)
                .copied()
                .ok_or_else(|| ConfigurationError::UnknownField {
                    field: field.to_string(),
                    referenced_by: referenced_by.to_string(),
                })
        };

        let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut auxiliaries: HashMap<usize, usize> = HashMap::new();
        let mut output_keys: BTreeMap<String, &str> = BTreeMap::new();

        for (i, spec) in fields.iter().enumerate() {
            if spec.kind == FieldKind::Select && spec.options.is_empty() {
                return Err(ConfigurationError::MissingOptions(spec.name.clone()));
            }

            if let Some(condition) = &spec.visible_when {
                for field in condition.referenced_fields() {
                    resolve(field, &spec.name)?;
                }
            }

            for validator in &spec.validators {
                for field in validator.referenced_fields() {
                    let target = resolve(field, &spec.name)?;
                    let entry = dependents.entry(target).or_default();
                    if !entry.contains(&i) {
                        entry.push(i);
                    }
                }
            }

            if let Some(parent_name) = &spec.auxiliary_for {
                let parent = resolve(parent_name, &spec.name)?;
                let parent_spec = &fields[parent];
                if parent_spec.kind != FieldKind::Select
                    || !parent_spec.options.iter().any(|o| o.value == OTHERS)
                {
                    return Err(ConfigurationError::InvalidAuxiliary {
                        field: spec.name.clone(),
                        reason: format!("'{parent_name}' is not a select offering '{OTHERS}'"),
                    });
                }
                if auxiliaries.insert(parent, i).is_some() {
                    return Err(ConfigurationError::InvalidAuxiliary {
                        field: spec.name.clone(),
                        reason: format!("'{parent_name}' already has an auxiliary field"),
                    });
                }
            } else if spec.emit {
                let key = spec.payload_key();
                if let Some(first) = output_keys.insert(key.clone(), &spec.name) {
                    return Err(ConfigurationError::DuplicateOutputKey {
                        key,
                        first: first.to_string(),
                        second: spec.name.clone(),
                    });
                }
            }
        }

        tracing::debug!(fields = fields.len(), "form schema built");

        Ok(FormSchema {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            fields,
            index,
            dependents,
            auxiliaries,
        })
    }
}

impl FormSchema {
    pub fn builder() -> FormSchemaBuilder {
        FormSchemaBuilder::default()
    }

    pub fn key(&self, name: &str) -> Result<FieldKey, ConfigurationError> {
        self.index
            .get(name)
            .map(|&i| self.key_at(i))
            .ok_or_else(|| ConfigurationError::NoSuchField(name.to_string()))
    }

    /// Whether `key` was issued by this schema.
    pub fn owns(&self, key: FieldKey) -> bool {
        key.1 == self.id && key.0 < self.fields.len()
    }

    pub(crate) fn key_at(&self, index: usize) -> FieldKey {
        FieldKey(index, self.id)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Declaration behind `key`; `None` for keys of another schema.
    pub fn spec(&self, key: FieldKey) -> Option<&FieldSpec> {
        self.owns(key).then(|| &self.fields[key.0])
    }

    /// Keys handed out by this schema, and by the model over it, are always
    /// in range.
    pub(crate) fn field_spec(&self, key: FieldKey) -> &FieldSpec {
        &self.fields[key.0]
    }

    /// Default value of every field.
    pub fn initial_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }

    /// Whether a field is shown under `values`.
    ///
    /// Auxiliary fields are additionally hidden whenever their parent is.
    /// Keys of another schema are never visible.
    pub fn is_visible(&self, key: FieldKey, values: &FormValues) -> bool {
        self.owns(key) && self.visible_at(key.0, values)
    }

    fn visible_at(&self, index: usize, values: &FormValues) -> bool {
        let spec = &self.fields[index];
        let own = spec
            .visible_when
            .as_ref()
            .is_none_or(|condition| condition.evaluate(values));
        if !own {
            return false;
        }
        match spec.auxiliary_for.as_deref().and_then(|p| self.index.get(p)) {
            Some(&parent) if parent != index => self.visible_at(parent, values),
            _ => true,
        }
    }

    /// Visible and required under `values`.
    pub fn is_actively_required(&self, key: FieldKey, values: &FormValues) -> bool {
        self.is_visible(key, values) && self.fields[key.0].required
    }

    pub(crate) fn dependents_of(&self, key: FieldKey) -> impl Iterator<Item = FieldKey> + '_ {
        self.dependents
            .get(&key.0)
            .into_iter()
            .flatten()
            .map(|&i| self.key_at(i))
    }

    pub(crate) fn auxiliary_of(&self, parent: FieldKey) -> Option<FieldKey> {
        self.auxiliaries.get(&parent.0).map(|&i| self.key_at(i))
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = FieldKey> + use<> {
        let id = self.id;
        (0..self.fields.len()).map(move |i| FieldKey(i, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::field::SelectOption;
    use crate::validator::Validator;

    fn managers() -> Vec<SelectOption> {
        ["Captain", OTHERS].into_iter().map(SelectOption::plain).collect()
    }

    #[test]
    fn unknown_field_in_condition_fails_at_build() {
        let err = FormSchema::builder()
            .field(FieldSpec::text("otherManager").visible_when(Condition::equals("manger", OTHERS)))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::UnknownField {
                field: "manger".into(),
                referenced_by: "otherManager".into()
            }
        );
    }

    #[test]
    fn unknown_field_in_validator_fails_at_build() {
        let err = FormSchema::builder()
            .field(FieldSpec::confirmation_of("confirmPassword", "password"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownField { .. }));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = FormSchema::builder()
            .field(FieldSpec::text("email"))
            .field(FieldSpec::email("email"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateField("email".into()));
    }

    #[test]
    fn colliding_payload_keys_rejected() {
        let err = FormSchema::builder()
            .field(FieldSpec::text("firstName"))
            .field(FieldSpec::text("first_name"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateOutputKey { .. }));
    }

    #[test]
    fn select_without_options_rejected() {
        let err = FormSchema::builder()
            .field(FieldSpec::new("manager", FieldKind::Select))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::MissingOptions("manager".into()));
    }

    #[test]
    fn auxiliary_requires_select_offering_others() {
        let err = FormSchema::builder()
            .field(FieldSpec::select("manager", [SelectOption::plain("Captain")]))
            .field(FieldSpec::other_for("otherManager", "manager"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidAuxiliary { .. }));
    }

    #[test]
    fn dependents_and_auxiliaries_are_indexed() {
        let schema = FormSchema::builder()
            .field(FieldSpec::select("manager", managers()))
            .field(FieldSpec::other_for("otherManager", "manager"))
            .field(FieldSpec::password("password").required())
            .field(FieldSpec::confirmation_of("confirmPassword", "password").required())
            .build()
            .unwrap();

        let manager = schema.key("manager").unwrap();
        let password = schema.key("password").unwrap();
        assert_eq!(schema.auxiliary_of(manager), schema.key("otherManager").ok());
        assert_eq!(
            schema.dependents_of(password).collect::<Vec<_>>(),
            vec![schema.key("confirmPassword").unwrap()]
        );
        assert!(schema.key("nope").is_err());
    }

    #[test]
    fn auxiliary_hidden_with_its_parent() {
        let schema = FormSchema::builder()
            .field(FieldSpec::checkbox("employed"))
            .field(FieldSpec::select("manager", managers()).visible_when(Condition::is_set("employed")))
            .field(FieldSpec::other_for("otherManager", "manager"))
            .field(FieldSpec::text("note").validate(Validator::min_length(2)))
            .build()
            .unwrap();

        let aux = schema.key("otherManager").unwrap();
        let mut values = schema.initial_values();
        values.insert("manager", OTHERS.into());
        assert!(!schema.is_visible(aux, &values));

        values.insert("employed", true.into());
        assert!(schema.is_visible(aux, &values));
    }

    #[test]
    fn keys_from_another_schema_are_rejected() {
        let build = || {
            FormSchema::builder()
                .field(FieldSpec::text("title").required())
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();
        let foreign = first.key("title").unwrap();

        assert!(first.owns(foreign));
        assert!(!second.owns(foreign));
        assert!(second.spec(foreign).is_none());
        assert!(!second.is_visible(foreign, &second.initial_values()));
        assert!(!second.is_actively_required(foreign, &second.initial_values()));
        assert_eq!(first.spec(foreign).map(FieldSpec::name), Some("title"));
    }
}
