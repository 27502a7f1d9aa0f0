//! Hand-written request validation.
//!
//! Insert and patch types validate their writable fields before any storage
//! call is made. Validation is deliberately explicit per entity (no
//! reflection or schema generation): required string columns must be present
//! and non-empty, and a patch that supplies a value for a required column
//! must supply a non-empty one.

use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The offending JSON field, in its wire (camelCase) spelling.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation of a writable field set.
pub trait Validate {
    /// Returns every field-level problem, or `Ok(())` when the value is
    /// acceptable to hand to the data-access layer.
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Records an error when a required string field is empty or whitespace.
pub(crate) fn require_non_empty(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    }
}

/// Like [`require_non_empty`], for a patch field that was supplied.
pub(crate) fn require_non_empty_opt(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&str>,
) {
    if let Some(v) = value {
        require_non_empty(errors, field, v);
    }
}

/// Finishes a validation pass.
pub(crate) fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_whitespace() {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "firstName", "   ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "firstName");
    }

    #[test]
    fn absent_patch_field_is_fine() {
        let mut errors = Vec::new();
        require_non_empty_opt(&mut errors, "name", None);
        assert!(errors.is_empty());
    }

    #[test]
    fn field_error_serializes_wire_shape() {
        let err = FieldError::new("unit", "must not be empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["field"], "unit");
        assert_eq!(json["message"], "must not be empty");
    }
}
