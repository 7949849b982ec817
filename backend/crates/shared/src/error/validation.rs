//! Field validation failures
//!
//! [`FieldErrors`] is the `field -> [messages]` mapping rendered as
//! `error.details`; [`ValidationError`] wraps it as an error value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to list of human-readable messages
///
/// Serializes as a plain JSON object, e.g. `{"email": ["required"]}`.
/// Keys are kept in sorted order so the rendered body is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Append a message to a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

/// Validation failure carrying field-level messages
///
/// Always renders as status 422 with code `VALIDATION_ERROR` and the fixed
/// message `Validation failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationError {
    errors: FieldErrors,
}

impl ValidationError {
    pub const CODE: &'static str = "VALIDATION_ERROR";
    pub const MESSAGE: &'static str = "Validation failed";
    pub const STATUS: u16 = 422;

    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    /// Shortcut for a failure on one field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FieldErrors::single(field, message))
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

impl From<FieldErrors> for ValidationError {
    fn from(errors: FieldErrors) -> Self {
        Self::new(errors)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in errs.field_errors() {
            let field = field.to_string();
            for err in field_errors {
                let message = match &err.message {
                    Some(message) => message.to_string(),
                    None => default_message(&field, &err.code),
                };
                errors.add(field.clone(), message);
            }
        }
        Self::new(errors)
    }
}

/// Message used when a validator rule carries no explicit `message`
fn default_message(field: &str, code: &str) -> String {
    let field = field.replace('_', " ");
    match code {
        "required" => format!("The {field} field is required."),
        "email" => format!("The {field} field must be a valid email address."),
        "length" => format!("The {field} field has an invalid length."),
        "range" => format!("The {field} field is out of range."),
        "url" => format!("The {field} field must be a valid URL."),
        "must_match" => format!("The {field} field confirmation does not match."),
        _ => format!("The {field} field is invalid."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct SignUp {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
        #[validate(length(min = 1))]
        display_name: String,
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let errors = FieldErrors::single("email", "required");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "email": ["required"] })
        );
    }

    #[test]
    fn test_field_errors_accumulate_per_field() {
        let errors: FieldErrors = [
            ("email", "required"),
            ("email", "must be valid"),
            ("name", "too long"),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("email"),
            Some(&["required".to_string(), "must be valid".to_string()][..])
        );
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn test_from_validator_errors() {
        let input = SignUp {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            display_name: String::new(),
        };

        let err: ValidationError = input.validate().unwrap_err().into();
        let errors = err.errors();

        assert_eq!(
            errors.get("email"),
            Some(&["The email field must be a valid email address.".to_string()][..])
        );
        assert_eq!(
            errors.get("password"),
            Some(&["Password must be at least 8 characters".to_string()][..])
        );
        assert_eq!(
            errors.get("display_name"),
            Some(&["The display name field has an invalid length.".to_string()][..])
        );
    }

    #[test]
    fn test_fixed_code_and_message() {
        let err = ValidationError::field("email", "required");
        assert_eq!(err.to_string(), ValidationError::MESSAGE);
        assert_eq!(ValidationError::CODE, "VALIDATION_ERROR");
        assert_eq!(ValidationError::STATUS, 422);
    }
}
