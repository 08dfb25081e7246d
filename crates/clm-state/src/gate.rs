//! # Field-Value Gate
//!
//! Checks that run before a contract's stored values or status change:
//!
//! - **Transition gate.** Leaving `created` for any target other than
//!   `revoked` requires every required field of the blueprint to hold a
//!   non-blank value. Revocation is never gated.
//! - **Write guard.** Values may only be written while the contract is
//!   editable, and non-empty values must be well-formed for the field type.
//!
//! Required-ness is never enforced at write time.

use serde::{Deserialize, Serialize};

use clm_core::blueprint::sort_fields;
use clm_core::{
    validate_value_format, BlueprintField, ContractFieldValue, FieldType, ValidationError,
};

use crate::lifecycle::{ContractStatus, LifecycleError};

// ─── Checkbox Rule ───────────────────────────────────────────────────

/// How a required checkbox field satisfies the transition gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CheckboxRule {
    /// Any stored value counts, including `"false"`.
    #[default]
    #[serde(rename = "present")]
    Present,
    /// The box must be ticked (`"true"`).
    #[serde(rename = "checked")]
    MustBeChecked,
}

impl CheckboxRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::MustBeChecked => "checked",
        }
    }
}

impl std::fmt::Display for CheckboxRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckboxRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "checked" => Ok(Self::MustBeChecked),
            other => Err(ValidationError::UnknownVariant {
                what: "checkbox rule",
                value: other.to_string(),
            }),
        }
    }
}

// ─── Transition Gate ─────────────────────────────────────────────────

fn satisfies(field: &BlueprintField, value: Option<&ContractFieldValue>, rule: CheckboxRule) -> bool {
    let Some(value) = value else {
        return false;
    };
    if !value.is_filled() {
        return false;
    }
    match (field.field_type, rule) {
        (FieldType::Checkbox, CheckboxRule::MustBeChecked) => {
            value.as_checkbox() == Some(true)
        }
        _ => true,
    }
}

/// Labels of required fields that lack a satisfying stored value, in
/// presentation order.
pub fn missing_required_fields(
    fields: &[BlueprintField],
    values: &[ContractFieldValue],
    rule: CheckboxRule,
) -> Vec<String> {
    let mut ordered: Vec<BlueprintField> = fields.iter().filter(|f| f.required).cloned().collect();
    sort_fields(&mut ordered);

    ordered
        .into_iter()
        .filter(|field| {
            let stored = values.iter().find(|v| v.blueprint_field_id == field.id);
            !satisfies(field, stored, rule)
        })
        .map(|field| field.label)
        .collect()
}

/// Full pre-transition check.
///
/// The transition itself is validated first, so an invalid target is
/// reported as such even when required fields are also missing.
pub fn check_transition(
    current: ContractStatus,
    target: ContractStatus,
    fields: &[BlueprintField],
    values: &[ContractFieldValue],
    rule: CheckboxRule,
) -> Result<(), LifecycleError> {
    if !current.can_transition_to(target) {
        return Err(LifecycleError::InvalidTransition {
            from: current,
            to: target,
        });
    }
    if current != ContractStatus::Created || target == ContractStatus::Revoked {
        return Ok(());
    }
    let labels = missing_required_fields(fields, values, rule);
    if labels.is_empty() {
        Ok(())
    } else {
        Err(LifecycleError::MissingRequiredFields { labels })
    }
}

// ─── Write Guard ─────────────────────────────────────────────────────

/// Check that `value` may be written to `field` of a contract in `status`.
pub fn check_value_write(
    status: ContractStatus,
    field: &BlueprintField,
    value: &str,
) -> Result<(), LifecycleError> {
    if !status.is_editable() {
        return Err(LifecycleError::NotEditable { status });
    }
    validate_value_format(field.field_type, &field.label, value)?;
    Ok(())
}
