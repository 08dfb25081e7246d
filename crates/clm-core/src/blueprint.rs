//! # Blueprints and Field Definitions
//!
//! A blueprint is a named, reusable contract template. It owns an ordered
//! list of typed field definitions; contracts instantiated from it store
//! one value per field.
//!
//! ## Ordering
//!
//! `order_index` determines presentation (and tab) order among the fields
//! of one blueprint. It is not enforced unique; ties are broken by
//! `created_at` so the order is still deterministic.
//!
//! ## Layout
//!
//! `position_x`, `position_y`, `width`, and `height` are display geometry
//! only. Nothing in the lifecycle or validation logic reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{BlueprintFieldId, BlueprintId};

// ─── Field Type ──────────────────────────────────────────────────────

/// The type of a blueprint field, which fixes how its value is edited
/// and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free string.
    Text,
    /// ISO calendar date (`YYYY-MM-DD`).
    Date,
    /// Free string; by convention the signer's typed full name.
    Signature,
    /// String-serialized boolean, `"true"` or `"false"`.
    Checkbox,
}

impl FieldType {
    /// All field types, in the order offered when adding a field.
    pub const ALL: [FieldType; 4] = [Self::Text, Self::Date, Self::Signature, Self::Checkbox];

    /// The wire name of this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Signature => "signature",
            Self::Checkbox => "checkbox",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "date" => Ok(Self::Date),
            "signature" => Ok(Self::Signature),
            "checkbox" => Ok(Self::Checkbox),
            other => Err(ValidationError::UnknownVariant {
                what: "field type",
                value: other.to_string(),
            }),
        }
    }
}

// ─── Geometry ────────────────────────────────────────────────────────

/// Display geometry of a field on the rendered blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
}

impl FieldGeometry {
    /// Left margin for newly added fields.
    pub const DEFAULT_X: i32 = 20;
    /// Vertical distance between consecutive default-placed fields.
    pub const ROW_HEIGHT: i32 = 80;
    pub const DEFAULT_WIDTH: i32 = 300;
    pub const DEFAULT_HEIGHT: i32 = 40;

    /// Default placement for the field appended after `existing` fields:
    /// one row per field, stacked top to bottom.
    pub fn stacked(existing: usize) -> Self {
        let row = i32::try_from(existing).unwrap_or(i32::MAX / Self::ROW_HEIGHT);
        Self {
            position_x: Self::DEFAULT_X,
            position_y: row.saturating_mul(Self::ROW_HEIGHT).saturating_add(20),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// A reusable contract template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Blueprint {
    pub id: BlueprintId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blueprint {
    /// Validate and normalize a blueprint name.
    ///
    /// Returns the trimmed name, or an error if nothing remains.
    pub fn validate_name(name: &str) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName { what: "blueprint" });
        }
        Ok(trimmed.to_string())
    }
}

/// One typed field definition owned by a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlueprintField {
    pub id: BlueprintFieldId,
    pub blueprint_id: BlueprintId,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

impl BlueprintField {
    /// Validate and normalize a field label.
    pub fn validate_label(label: &str) -> Result<String, ValidationError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }
        Ok(trimmed.to_string())
    }

    /// The field's display geometry.
    pub fn geometry(&self) -> FieldGeometry {
        FieldGeometry {
            position_x: self.position_x,
            position_y: self.position_y,
            width: self.width,
            height: self.height,
        }
    }

    /// Overwrite the field's display geometry.
    pub fn set_geometry(&mut self, geometry: FieldGeometry) {
        self.position_x = geometry.position_x;
        self.position_y = geometry.position_y;
        self.width = geometry.width;
        self.height = geometry.height;
    }
}

/// Presentation order: `order_index` ascending, then `created_at`.
pub fn sort_fields(fields: &mut [BlueprintField]) {
    fields.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// A blueprint together with its fields in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlueprintWithFields {
    #[serde(flatten)]
    pub blueprint: Blueprint,
    #[serde(default)]
    pub fields: Vec<BlueprintField>,
}

impl BlueprintWithFields {
    /// Assemble the read model, sorting `fields` into presentation order.
    pub fn new(blueprint: Blueprint, mut fields: Vec<BlueprintField>) -> Self {
        sort_fields(&mut fields);
        Self { blueprint, fields }
    }

    /// Look up one of this blueprint's fields by id.
    pub fn field(&self, id: &BlueprintFieldId) -> Option<&BlueprintField> {
        self.fields.iter().find(|f| &f.id == id)
    }
}
