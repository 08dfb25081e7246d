//! # Contract Field Values
//!
//! The stored answer for one blueprint field within one contract. There is
//! at most one row per (contract, field) pair; writes are upserts that keep
//! the row id stable.
//!
//! Field value rows keep pointing at their blueprint field id even after
//! that field (or its whole blueprint) is deleted, so historical contract
//! data is never destroyed by template edits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::blueprint::FieldType;
use crate::error::ValidationError;
use crate::identity::{BlueprintFieldId, ContractId, FieldValueId};

/// Serialized form of a checked checkbox.
pub const CHECKBOX_TRUE: &str = "true";
/// Serialized form of an unchecked checkbox.
pub const CHECKBOX_FALSE: &str = "false";

/// One stored (contract, field) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContractFieldValue {
    pub id: FieldValueId,
    pub contract_id: ContractId,
    pub blueprint_field_id: BlueprintFieldId,
    #[serde(default)]
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContractFieldValue {
    /// Whether this row carries a non-empty, non-whitespace value.
    pub fn is_filled(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// The value as a checkbox state, if it is a well-formed checkbox value.
    pub fn as_checkbox(&self) -> Option<bool> {
        match self.value.as_deref() {
            Some(CHECKBOX_TRUE) => Some(true),
            Some(CHECKBOX_FALSE) => Some(false),
            _ => None,
        }
    }
}

/// Check that a value is well-formed for its field type.
///
/// Empty (or whitespace-only) values are always accepted: they clear the
/// field, and required-ness is only enforced when a contract leaves the
/// `created` state. Text and signature values are free-form.
pub fn validate_value_format(
    field_type: FieldType,
    label: &str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match field_type {
        FieldType::Text | FieldType::Signature => Ok(()),
        // chrono's parser accepts unpadded fields and a leading sign;
        // only the canonical rendering is ISO.
        FieldType::Date => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) if date.format("%Y-%m-%d").to_string() == value => Ok(()),
            _ => Err(ValidationError::InvalidDate {
                label: label.to_string(),
                value: value.to_string(),
            }),
        },
        FieldType::Checkbox => {
            if value == CHECKBOX_TRUE || value == CHECKBOX_FALSE {
                Ok(())
            } else {
                Err(ValidationError::InvalidCheckbox {
                    label: label.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }
}
