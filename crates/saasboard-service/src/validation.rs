//! Conversion of `validator` failures into [`AppError`].

use serde_json::{Map, Value, json};
use validator::{Validate, ValidationErrors};

use saasboard_core::AppError;

/// Validates `input`, mapping failures to a 422-class error with per-field
/// details.
pub fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    input.validate().map_err(into_app_error)
}

/// Builds a validation error whose details map each field to its messages.
pub fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                Value::String(text)
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }
    AppError::validation("Validation failed").with_details(json!({ "fields": fields }))
}
