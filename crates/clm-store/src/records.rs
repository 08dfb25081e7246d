//! # Repository Inputs and Read Models
//!
//! Creation inputs and partial updates accepted by the repository, and the
//! composite records it returns. Partial updates leave every absent field
//! unchanged. For the optional text columns (`description`, `placeholder`)
//! an empty or whitespace-only string clears the stored value.

use serde::{Deserialize, Serialize};

use clm_core::{
    BlueprintFieldId, BlueprintId, BlueprintWithFields, ContractFieldValue, FieldType,
};
use clm_state::{Contract, LifecycleView};

/// Trim an optional text input, mapping blank to `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

// ─── Blueprints ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlueprintPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ─── Fields ──────────────────────────────────────────────────────────

/// A field to append to a blueprint. Omitted layout and ordering values
/// get stacked defaults below the existing fields.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewField {
    pub label: String,
    #[serde(default = "default_field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub position_x: Option<i32>,
    #[serde(default)]
    pub position_y: Option<i32>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub order_index: Option<i32>,
}

fn default_field_type() -> FieldType {
    FieldType::Text
}

impl NewField {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Text,
            required: false,
            placeholder: None,
            position_x: None,
            position_y: None,
            width: None,
            height: None,
            order_index: None,
        }
    }

    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldPatch {
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub position_x: Option<i32>,
    #[serde(default)]
    pub position_y: Option<i32>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub order_index: Option<i32>,
}

// ─── Contracts ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewContract {
    pub blueprint_id: BlueprintId,
    /// Defaults to `"<blueprint name> - <today>"`.
    #[serde(default)]
    pub name: Option<String>,
}

/// One (field, value) pair of a bulk save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValueEntry {
    pub blueprint_field_id: BlueprintFieldId,
    pub value: String,
}

/// A contract with its blueprint (if it still exists), stored values, and
/// lifecycle view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContractDetails {
    #[serde(flatten)]
    pub contract: Contract,
    pub blueprint: Option<BlueprintWithFields>,
    pub field_values: Vec<ContractFieldValue>,
    pub lifecycle: LifecycleView,
}

impl ContractDetails {
    /// The stored value for one field, if any.
    pub fn value_of(&self, field_id: &BlueprintFieldId) -> Option<&str> {
        self.field_values
            .iter()
            .find(|v| &v.blueprint_field_id == field_id)
            .and_then(|v| v.value.as_deref())
    }
}
