//! # Check Subcommand
//!
//! Offline evaluation of a status transition. Reads a blueprint (with its
//! fields) and a contract's stored values from JSON, then applies the same
//! transition rules and required-field gate the API enforces.
//!
//! Values that belong to no field of the blueprint are ignored with a
//! warning. Malformed values are reported but do not affect the outcome,
//! since the gate only looks at whether a value is present.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use clm_core::{validate_value_format, BlueprintWithFields, ContractFieldValue};
use clm_state::{check_transition, CheckboxRule, ContractStatus, LifecycleError};

use crate::read_json;

/// Arguments for the `clm check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Blueprint JSON: the blueprint record with a `fields` array.
    #[arg(long)]
    pub blueprint: PathBuf,

    /// JSON array of stored contract field values.
    #[arg(long)]
    pub values: PathBuf,

    /// The contract's current status.
    #[arg(long)]
    pub status: ContractStatus,

    /// The status to move to.
    #[arg(long)]
    pub target: ContractStatus,

    /// How required checkboxes satisfy the gate (present or checked).
    #[arg(long, default_value = "present")]
    pub checkbox_rule: CheckboxRule,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Result of one check.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub from: ContractStatus,
    pub to: ContractStatus,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_values: Vec<String>,
}

/// Execute the check subcommand. Returns 1 when the transition is rejected.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let blueprint: BlueprintWithFields = read_json(&args.blueprint)?;
    let values: Vec<ContractFieldValue> = read_json(&args.values)?;
    tracing::info!(
        blueprint = %blueprint.blueprint.id,
        fields = blueprint.fields.len(),
        values = values.len(),
        "loaded check inputs"
    );

    let outcome = evaluate(
        &blueprint,
        &values,
        args.status,
        args.target,
        args.checkbox_rule,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(if outcome.allowed { 0 } else { 1 })
}

/// Apply the transition rules to `values` of `blueprint`.
pub fn evaluate(
    blueprint: &BlueprintWithFields,
    values: &[ContractFieldValue],
    from: ContractStatus,
    to: ContractStatus,
    rule: CheckboxRule,
) -> CheckOutcome {
    let mut own_values = Vec::with_capacity(values.len());
    let mut invalid_values = Vec::new();
    for value in values {
        let Some(field) = blueprint.field(&value.blueprint_field_id) else {
            tracing::warn!(
                field_id = %value.blueprint_field_id,
                "value for unknown field ignored"
            );
            continue;
        };
        if let Some(v) = value.value.as_deref() {
            if let Err(e) = validate_value_format(field.field_type, &field.label, v) {
                invalid_values.push(e.to_string());
            }
        }
        own_values.push(value.clone());
    }

    let result = check_transition(from, to, &blueprint.fields, &own_values, rule);
    let missing_fields = match &result {
        Err(LifecycleError::MissingRequiredFields { labels }) => labels.clone(),
        _ => Vec::new(),
    };

    CheckOutcome {
        from,
        to,
        allowed: result.is_ok(),
        reason: result.err().map(|e| e.to_string()),
        missing_fields,
        invalid_values,
    }
}

fn print_outcome(outcome: &CheckOutcome) {
    if outcome.allowed {
        println!("OK: {} -> {} is allowed", outcome.from, outcome.to);
    } else {
        println!("REJECTED: {} -> {}", outcome.from, outcome.to);
        if let Some(reason) = &outcome.reason {
            println!("  {reason}");
        }
        for label in &outcome.missing_fields {
            println!("  missing: {label}");
        }
    }
    for problem in &outcome.invalid_values {
        println!("  warning: {problem}");
    }
}
