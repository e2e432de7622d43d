//! Need persistence

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use spotter_common::models::{NeedSpec, StoredNeed};
use spotter_common::{Error, Result};

/// Save a need (insert or update by id)
pub async fn save_need(pool: &SqlitePool, need: &StoredNeed) -> Result<()> {
    let spec = serde_json::to_string(&need.spec)?;

    sqlx::query(
        r#"
        INSERT INTO needs (id, name, spec, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            spec = excluded.spec,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(need.id.to_string())
    .bind(&need.name)
    .bind(&spec)
    .bind(need.created_at.to_rfc3339())
    .bind(need.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a need by id
pub async fn load_need(pool: &SqlitePool, id: Uuid) -> Result<Option<StoredNeed>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, spec, created_at, updated_at
        FROM needs
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(parse_need_row).transpose()
}

/// All stored needs, most recently updated first
pub async fn list_needs(pool: &SqlitePool) -> Result<Vec<StoredNeed>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, spec, created_at, updated_at
        FROM needs
        ORDER BY updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(parse_need_row).collect()
}

/// Delete a need by id. Returns false when nothing matched.
pub async fn delete_need(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM needs WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn parse_need_row(row: sqlx::sqlite::SqliteRow) -> Result<StoredNeed> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| Error::Internal(format!("Invalid need id in storage: {}", e)))?;

    let spec_str: String = row.get("spec");
    let spec: NeedSpec = serde_json::from_str(&spec_str)?;

    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(StoredNeed {
        id,
        name: row.get("name"),
        spec,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid timestamp in storage: {}", e)))
}
