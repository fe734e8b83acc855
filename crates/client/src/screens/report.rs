//! Report export filter.

use lms_forms::{ConfigurationError, FieldSpec, FormSchema, SelectOption, Validator};

pub const ENDPOINT: &str = "/reports/export";

pub const REPORT_TYPE: &str = "reportType";
pub const FROM_DATE: &str = "fromDate";
pub const TO_DATE: &str = "toDate";
pub const FORMAT: &str = "format";

pub fn schema() -> Result<FormSchema, ConfigurationError> {
    FormSchema::builder()
        .field(
            FieldSpec::select(
                REPORT_TYPE,
                [
                    SelectOption::new("candidates", "Candidates"),
                    SelectOption::new("assessments", "Assessment results"),
                    SelectOption::new("attendance", "Attendance"),
                ],
            )
            .required(),
        )
        .field(FieldSpec::date(FROM_DATE).label("Start date").required())
        .field(
            FieldSpec::date(TO_DATE)
                .label("End date")
                .required()
                .validate(Validator::not_before(FROM_DATE, "End date must be on or after the start date")),
        )
        .field(
            FieldSpec::select(
                FORMAT,
                [SelectOption::new("csv", "CSV"), SelectOption::new("xlsx", "Excel")],
            )
            .required()
            .default_value("csv"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lms_forms::FormModel;
    use serde_json::json;

    #[test]
    fn range_must_be_ordered() {
        let mut form = FormModel::new(Arc::new(schema().unwrap()));
        form.set_value(REPORT_TYPE, "attendance").unwrap();
        form.set_value(FROM_DATE, "2024-05-10").unwrap();
        form.set_value(TO_DATE, "2024-05-01").unwrap();

        let errors = form.validate_all();
        assert_eq!(
            errors.get(TO_DATE).map(String::as_str),
            Some("End date must be on or after the start date")
        );

        form.set_value(FROM_DATE, "2024-04-01").unwrap();
        assert_eq!(form.error(TO_DATE), None);

        let payload = form.submit().unwrap();
        assert_eq!(payload.get("from_date"), Some(&json!("2024-04-01")));
        assert_eq!(payload.get("format"), Some(&json!("csv")));
    }

    #[test]
    fn malformed_date_reported() {
        let mut form = FormModel::new(Arc::new(schema().unwrap()));
        form.set_value(FROM_DATE, "10/05/2024").unwrap();
        let errors = form.validate_all();
        assert_eq!(
            errors.get(FROM_DATE).map(String::as_str),
            Some("Start date must be a valid date (YYYY-MM-DD)")
        );
    }
}
