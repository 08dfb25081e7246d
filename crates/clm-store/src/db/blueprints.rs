//! Blueprint and field persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `blueprints` and
//! `blueprint_fields` tables. Deleting a blueprint cascades to its fields
//! in SQL; contracts and their values are untouched.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clm_core::{Blueprint, BlueprintField, BlueprintFieldId, BlueprintId, FieldType};

use super::decode_err;

// ─── Blueprints ──────────────────────────────────────────────────────

pub async fn insert(pool: &PgPool, record: &Blueprint) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO blueprints (id, name, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id.0)
    .bind(&record.name)
    .bind(&record.description)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite the mutable columns. Returns `false` if no row matched.
pub async fn update(pool: &PgPool, record: &Blueprint) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE blueprints SET name = $1, description = $2, updated_at = $3 WHERE id = $4",
    )
    .bind(&record.name)
    .bind(&record.description)
    .bind(record.updated_at)
    .bind(record.id.0)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a blueprint and (by cascade) its fields.
pub async fn delete(pool: &PgPool, id: BlueprintId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blueprints WHERE id = $1")
        .bind(id.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all(pool: &PgPool) -> Result<Vec<Blueprint>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BlueprintRow>(
        "SELECT id, name, description, created_at, updated_at
         FROM blueprints ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BlueprintRow::into_record).collect())
}

#[derive(sqlx::FromRow)]
struct BlueprintRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BlueprintRow {
    fn into_record(self) -> Blueprint {
        Blueprint {
            id: BlueprintId(self.id),
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ─── Fields ──────────────────────────────────────────────────────────

pub async fn insert_field(pool: &PgPool, record: &BlueprintField) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO blueprint_fields
            (id, blueprint_id, field_type, label, required, placeholder,
             position_x, position_y, width, height, order_index, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(record.id.0)
    .bind(record.blueprint_id.0)
    .bind(record.field_type.as_str())
    .bind(&record.label)
    .bind(record.required)
    .bind(&record.placeholder)
    .bind(record.position_x)
    .bind(record.position_y)
    .bind(record.width)
    .bind(record.height)
    .bind(record.order_index)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable column of a field. Returns `false` if no row matched.
pub async fn update_field(pool: &PgPool, record: &BlueprintField) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE blueprint_fields
         SET field_type = $1, label = $2, required = $3, placeholder = $4,
             position_x = $5, position_y = $6, width = $7, height = $8, order_index = $9
         WHERE id = $10",
    )
    .bind(record.field_type.as_str())
    .bind(&record.label)
    .bind(record.required)
    .bind(&record.placeholder)
    .bind(record.position_x)
    .bind(record.position_y)
    .bind(record.width)
    .bind(record.height)
    .bind(record.order_index)
    .bind(record.id.0)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_field(pool: &PgPool, id: BlueprintFieldId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blueprint_fields WHERE id = $1")
        .bind(id.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all_fields(pool: &PgPool) -> Result<Vec<BlueprintField>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FieldRow>(
        "SELECT id, blueprint_id, field_type, label, required, placeholder,
                position_x, position_y, width, height, order_index, created_at
         FROM blueprint_fields ORDER BY blueprint_id, order_index, created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(FieldRow::into_record).collect()
}

#[derive(sqlx::FromRow)]
struct FieldRow {
    id: Uuid,
    blueprint_id: Uuid,
    field_type: String,
    label: String,
    required: bool,
    placeholder: Option<String>,
    position_x: i32,
    position_y: i32,
    width: i32,
    height: i32,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl FieldRow {
    fn into_record(self) -> Result<BlueprintField, sqlx::Error> {
        let field_type: FieldType = self
            .field_type
            .parse()
            .map_err(|e| decode_err("field_type", e))?;

        Ok(BlueprintField {
            id: BlueprintFieldId(self.id),
            blueprint_id: BlueprintId(self.blueprint_id),
            field_type,
            label: self.label,
            required: self.required,
            placeholder: self.placeholder,
            position_x: self.position_x,
            position_y: self.position_y,
            width: self.width,
            height: self.height,
            order_index: self.order_index,
            created_at: self.created_at,
        })
    }
}
