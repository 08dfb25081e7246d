//! Contract field value persistence operations.
//!
//! Writes are upserts on the `(contract_id, blueprint_field_id)` unique
//! key. The stored row (with its original id) is returned so the in-memory
//! mirror always matches the database.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use clm_core::{BlueprintFieldId, ContractFieldValue, ContractId, FieldValueId};

const UPSERT: &str = "INSERT INTO contract_field_values
        (id, contract_id, blueprint_field_id, value, created_at, updated_at)
     VALUES ($1, $2, $3, $4, $5, $6)
     ON CONFLICT (contract_id, blueprint_field_id)
     DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
     RETURNING id, contract_id, blueprint_field_id, value, created_at, updated_at";

async fn upsert_on(
    conn: &mut PgConnection,
    record: &ContractFieldValue,
) -> Result<ContractFieldValue, sqlx::Error> {
    let row = sqlx::query_as::<_, FieldValueRow>(UPSERT)
        .bind(record.id.0)
        .bind(record.contract_id.0)
        .bind(record.blueprint_field_id.0)
        .bind(&record.value)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(conn)
        .await?;

    Ok(row.into_record())
}

/// Insert or update one value.
pub async fn upsert(
    pool: &PgPool,
    record: &ContractFieldValue,
) -> Result<ContractFieldValue, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    upsert_on(&mut *conn, record).await
}

/// Upsert a batch of values in one transaction. Either every row is
/// written or none is.
pub async fn upsert_many(
    pool: &PgPool,
    records: &[ContractFieldValue],
) -> Result<Vec<ContractFieldValue>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut stored = Vec::with_capacity(records.len());
    for record in records {
        stored.push(upsert_on(&mut *tx, record).await?);
    }

    tx.commit().await?;
    Ok(stored)
}

pub async fn load_all(pool: &PgPool) -> Result<Vec<ContractFieldValue>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FieldValueRow>(
        "SELECT id, contract_id, blueprint_field_id, value, created_at, updated_at
         FROM contract_field_values ORDER BY contract_id, created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FieldValueRow::into_record).collect())
}

#[derive(sqlx::FromRow)]
struct FieldValueRow {
    id: Uuid,
    contract_id: Uuid,
    blueprint_field_id: Uuid,
    value: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FieldValueRow {
    fn into_record(self) -> ContractFieldValue {
        ContractFieldValue {
            id: FieldValueId(self.id),
            contract_id: ContractId(self.contract_id),
            blueprint_field_id: BlueprintFieldId(self.blueprint_field_id),
            value: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
