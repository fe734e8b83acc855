//! Question-bank authoring.

use lms_forms::{Condition, ConfigurationError, FieldSpec, FormSchema, SelectOption, Validator};

use super::plain_options;

pub const ENDPOINT: &str = "/questions";

pub const COURSE_ID: &str = "courseId";
pub const QUESTION_TYPE: &str = "questionType";
pub const QUESTION_TEXT: &str = "questionText";
pub const DIFFICULTY: &str = "difficulty";
pub const OPTION_A: &str = "optionA";
pub const OPTION_B: &str = "optionB";
pub const OPTION_C: &str = "optionC";
pub const OPTION_D: &str = "optionD";
pub const CORRECT_ANSWER: &str = "correctAnswer";
pub const MARKS: &str = "marks";
pub const IMAGE: &str = "image";
pub const EXPLANATION: &str = "explanation";

pub const MULTIPLE_CHOICE: &str = "multiple_choice";
pub const TRUE_FALSE: &str = "true_false";

fn multiple_choice() -> Condition {
    Condition::equals(QUESTION_TYPE, MULTIPLE_CHOICE)
}

/// True/false questions only offer answers A and B.
fn answer_offered() -> Validator {
    Validator::custom([QUESTION_TYPE], |value, values| {
        let answer = value.as_text().unwrap_or("");
        if values.text(QUESTION_TYPE) == TRUE_FALSE && !matches!(answer, "A" | "B") {
            return Err("True/false questions only have answers A and B".to_string());
        }
        Ok(())
    })
}

fn positive_marks() -> Validator {
    Validator::custom(Vec::<String>::new(), |value, _| match value.as_text().unwrap_or("").trim().parse::<u32>() {
        Ok(n) if (1..=100).contains(&n) => Ok(()),
        _ => Err("Marks must be a whole number between 1 and 100".to_string()),
    })
}

pub fn schema() -> Result<FormSchema, ConfigurationError> {
    FormSchema::builder()
        .field(FieldSpec::hidden(COURSE_ID).required().label("Course"))
        .field(
            FieldSpec::select(
                QUESTION_TYPE,
                [
                    SelectOption::new(MULTIPLE_CHOICE, "Multiple choice"),
                    SelectOption::new(TRUE_FALSE, "True / false"),
                ],
            )
            .required()
            .default_value(MULTIPLE_CHOICE),
        )
        .field(
            FieldSpec::text(QUESTION_TEXT)
                .label("Question")
                .required()
                .validate(Validator::min_length(10))
                .validate(Validator::max_length(1000)),
        )
        .field(FieldSpec::select(DIFFICULTY, plain_options(["easy", "medium", "hard"])).required())
        .field(FieldSpec::text(OPTION_A).label("Option A").required())
        .field(FieldSpec::text(OPTION_B).label("Option B").required())
        .field(FieldSpec::text(OPTION_C).label("Option C").required().visible_when(multiple_choice()))
        .field(FieldSpec::text(OPTION_D).label("Option D").required().visible_when(multiple_choice()))
        .field(
            FieldSpec::select(CORRECT_ANSWER, plain_options(["A", "B", "C", "D"]))
                .required()
                .validate(answer_offered()),
        )
        .field(FieldSpec::text(MARKS).required().default_value("1").validate(positive_marks()))
        .field(FieldSpec::file(IMAGE).output_key("image_path"))
        .field(FieldSpec::text(EXPLANATION).validate(Validator::max_length(2000)))
        .build()
}
