//! Per-field validation details.
//!
//! [`FieldError`] is the structured entry placed in an error envelope's
//! `errors` list. [`field_errors`] flattens the nested report produced by
//! the `validator` crate into a deterministic, ordered list of them.

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One failing field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the field, with list indices in brackets
    /// (e.g. `skills[2].name`).
    pub field: String,
    /// Machine-readable rule name (e.g. `length`, `email`).
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Flatten a `validator` report into field errors sorted by field, then code.
///
/// The underlying report is hash-map based, so sorting is what keeps two
/// identical failures rendering identical envelopes.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} failed '{}' validation", err.code));
                    out.push(FieldError::new(path.clone(), err.code.to_string(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 3))]
        username: String,
        #[validate(email(message = "must be a valid email address"))]
        email: String,
    }

    #[test]
    fn valid_payload_has_no_errors() {
        let input = Signup {
            username: "ada".into(),
            email: "ada@example.com".into(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn failures_are_sorted_by_field() {
        let input = Signup {
            username: "a".into(),
            email: "nope".into(),
        };
        let errors = input.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[0].code, "email");
        assert_eq!(fields[0].message, "must be a valid email address");
        assert_eq!(fields[1].field, "username");
        assert_eq!(fields[1].code, "length");
    }

    #[test]
    fn missing_message_falls_back_to_rule_name() {
        let input = Signup {
            username: "a".into(),
            email: "ada@example.com".into(),
        };
        let fields = field_errors(&input.validate().unwrap_err());
        assert_eq!(fields[0].message, "username failed 'length' validation");
    }

    #[test]
    fn serializes_as_flat_object() {
        let value = serde_json::to_value(FieldError::new("title", "required", "title is required"))
            .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "field": "title",
                "code": "required",
                "message": "title is required",
            })
        );
    }
}
