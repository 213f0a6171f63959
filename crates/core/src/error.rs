use crate::validation::FieldError;

/// Domain-level failure taxonomy.
///
/// Each variant maps to exactly one HTTP status class once it reaches the
/// API boundary; see `gigmart_api::error`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Caller input is malformed. `errors` carries per-field details and may
    /// be empty when only a summary message is known.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            message: message.clone(),
            errors: vec![FieldError::new(field, "invalid", message)],
        }
    }

    /// Shorthand for a validation failure with no field breakdown.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}
