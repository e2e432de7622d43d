//! Import session persistence
//!
//! Sessions are saved on every state transition so a status query sees
//! the run as it progresses, and the final summary survives restarts.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use spotter_common::{Error, Result};

use crate::models::{ImportItemError, ImportSession, ImportState, ImportSummary};

/// Save a session (insert or update by session id)
pub async fn save_session(pool: &SqlitePool, session: &ImportSession) -> Result<()> {
    let state = serde_json::to_string(&session.state)?;
    let leagues = serde_json::to_string(&session.leagues)?;
    let need = serde_json::to_string(&session.need)?;
    let summary = serde_json::to_string(&session.summary)?;
    let errors = serde_json::to_string(&session.errors)?;

    sqlx::query(
        r#"
        INSERT INTO import_sessions (
            session_id, state, season, leagues, need, exclude_loans,
            summary, errors, started_at, ended_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_id) DO UPDATE SET
            state = excluded.state,
            summary = excluded.summary,
            errors = excluded.errors,
            ended_at = excluded.ended_at
        "#,
    )
    .bind(session.session_id.to_string())
    .bind(&state)
    .bind(session.season as i64)
    .bind(&leagues)
    .bind(&need)
    .bind(session.exclude_loans as i64)
    .bind(&summary)
    .bind(&errors)
    .bind(session.started_at.to_rfc3339())
    .bind(session.ended_at.map(|dt| dt.to_rfc3339()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a session by id
pub async fn load_session(pool: &SqlitePool, session_id: Uuid) -> Result<Option<ImportSession>> {
    let row = sqlx::query(
        r#"
        SELECT session_id, state, season, leagues, need, exclude_loans,
               summary, errors, started_at, ended_at
        FROM import_sessions
        WHERE session_id = ?
        "#,
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let state: String = row.get("state");
    let state: ImportState = serde_json::from_str(&state)?;

    let leagues: String = row.get("leagues");
    let need: String = row.get("need");
    let summary: String = row.get("summary");
    let errors: String = row.get("errors");

    let started_at: String = row.get("started_at");
    let started_at = parse_timestamp(&started_at)?;
    let ended_at: Option<String> = row.get("ended_at");
    let ended_at = ended_at.as_deref().map(parse_timestamp).transpose()?;

    let errors: Vec<ImportItemError> = serde_json::from_str(&errors)?;
    let summary: ImportSummary = serde_json::from_str(&summary)?;

    Ok(Some(ImportSession {
        session_id,
        state,
        season: row.get::<i64, _>("season") as u16,
        leagues: serde_json::from_str(&leagues)?,
        need: serde_json::from_str(&need)?,
        exclude_loans: row.get::<i64, _>("exclude_loans") != 0,
        summary,
        errors,
        started_at,
        ended_at,
    }))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid timestamp in storage: {}", e)))
}
