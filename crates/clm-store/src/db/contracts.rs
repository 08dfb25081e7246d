//! Contract persistence operations.
//!
//! Status transitions are validated in `clm-state` against a freshly read
//! row; the write is conditional on the status that was read, so a change
//! made in between is detected instead of overwritten.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clm_core::{BlueprintId, ContractId};
use clm_state::{Contract, ContractStatus, Milestone};

use super::decode_err;

const COLUMNS: &str = "id, blueprint_id, name, status, created_at, updated_at, \
                       approved_at, sent_at, signed_at, locked_at, revoked_at";

pub async fn insert(pool: &PgPool, record: &Contract) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO contracts (id, blueprint_id, name, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id.0)
    .bind(record.blueprint_id.0)
    .bind(&record.name)
    .bind(record.status.as_str())
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a contract by ID straight from the database.
pub async fn get_by_id(pool: &PgPool, id: ContractId) -> Result<Option<Contract>, sqlx::Error> {
    let row = sqlx::query_as::<_, ContractRow>(&format!(
        "SELECT {COLUMNS} FROM contracts WHERE id = $1"
    ))
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    row.map(ContractRow::into_record).transpose()
}

/// Persist a transitioned contract, provided its stored status is still
/// `expected`. Milestone columns that are already stamped are kept.
///
/// Returns `false` if the row is gone or its status moved on.
pub async fn update_status(
    pool: &PgPool,
    record: &Contract,
    expected: ContractStatus,
) -> Result<bool, sqlx::Error> {
    // Only the target's milestone column is written, and never overwritten.
    let stamp = Milestone::for_status(record.status);
    let sql = match stamp {
        Some(milestone) => format!(
            "UPDATE contracts SET status = $3, updated_at = $4, {col} = COALESCE({col}, $5) \
             WHERE id = $1 AND status = $2",
            col = milestone.column()
        ),
        None => "UPDATE contracts SET status = $3, updated_at = $4 \
                 WHERE id = $1 AND status = $2"
            .to_string(),
    };

    let mut query = sqlx::query(&sql)
        .bind(record.id.0)
        .bind(expected.as_str())
        .bind(record.status.as_str())
        .bind(record.updated_at);
    if let Some(milestone) = stamp {
        query = query.bind(record.milestone(milestone));
    }
    let result = query.execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a contract and (by cascade) its field values.
pub async fn delete(pool: &PgPool, id: ContractId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
        .bind(id.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all(pool: &PgPool) -> Result<Vec<Contract>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ContractRow>(&format!(
        "SELECT {COLUMNS} FROM contracts ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ContractRow::into_record).collect()
}

#[derive(sqlx::FromRow)]
struct ContractRow {
    id: Uuid,
    blueprint_id: Uuid,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    signed_at: Option<DateTime<Utc>>,
    locked_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
}

impl ContractRow {
    fn into_record(self) -> Result<Contract, sqlx::Error> {
        let status: ContractStatus = self.status.parse().map_err(|e| decode_err("status", e))?;

        Ok(Contract {
            id: ContractId(self.id),
            blueprint_id: BlueprintId(self.blueprint_id),
            name: self.name,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            approved_at: self.approved_at,
            sent_at: self.sent_at,
            signed_at: self.signed_at,
            locked_at: self.locked_at,
            revoked_at: self.revoked_at,
        })
    }
}
