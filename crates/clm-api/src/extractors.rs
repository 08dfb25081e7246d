//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request bodies and helpers
//! to extract + validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use clm_store::{BlueprintPatch, FieldPatch, NewBlueprint, NewContract, NewField};

use crate::error::AppError;

/// Request types that check shape rules beyond what serde enforces.
///
/// Domain rules (non-empty names after trim, value formats) are enforced
/// again by the repository; these checks reject obviously bad input early.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

pub(crate) fn non_empty(what: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{what} must not be empty"));
    }
    Ok(())
}

fn non_negative(what: &str, value: Option<i32>) -> Result<(), String> {
    match value {
        Some(v) if v < 0 => Err(format!("{what} must not be negative")),
        _ => Ok(()),
    }
}

impl Validate for NewBlueprint {
    fn validate(&self) -> Result<(), String> {
        non_empty("name", &self.name)
    }
}

impl Validate for BlueprintPatch {
    fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => non_empty("name", name),
            None => Ok(()),
        }
    }
}

impl Validate for NewField {
    fn validate(&self) -> Result<(), String> {
        non_empty("label", &self.label)?;
        non_negative("width", self.width)?;
        non_negative("height", self.height)?;
        non_negative("order_index", self.order_index)
    }
}

impl Validate for FieldPatch {
    fn validate(&self) -> Result<(), String> {
        if let Some(label) = &self.label {
            non_empty("label", label)?;
        }
        non_negative("width", self.width)?;
        non_negative("height", self.height)?;
        non_negative("order_index", self.order_index)
    }
}

impl Validate for NewContract {
    fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => non_empty("name", name),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_rejected() {
        let bp = NewBlueprint {
            name: "   ".to_string(),
            description: None,
        };
        assert_eq!(bp.validate().unwrap_err(), "name must not be empty");

        let patch = BlueprintPatch {
            name: Some(String::new()),
            description: None,
        };
        assert!(patch.validate().is_err());
        assert!(BlueprintPatch::default().validate().is_ok());
    }

    #[test]
    fn field_geometry_must_be_non_negative() {
        let mut field = NewField::text("Employee Name");
        assert!(field.validate().is_ok());
        field.width = Some(-1);
        assert_eq!(field.validate().unwrap_err(), "width must not be negative");
    }

    #[test]
    fn omitted_contract_name_is_fine() {
        let req = NewContract {
            blueprint_id: clm_core::BlueprintId::new(),
            name: None,
        };
        assert!(req.validate().is_ok());
    }
}
