//! Player persistence
//!
//! The import pipeline only ever creates player entities. Reading,
//! editing and deleting belong to the curation surface, not to this
//! service.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use spotter_common::models::PlayerRecord;
use spotter_common::Result;

/// Create-new-record seam the orchestrator writes accepted candidates
/// through. Tests substitute a failing writer to exercise the partial
/// import path.
#[async_trait]
pub trait PlayerWriter: Send + Sync {
    /// Insert a new player entity, returning its generated id
    async fn insert_player(&self, record: &PlayerRecord) -> Result<Uuid>;
}

/// SQLite-backed player writer
pub struct SqlitePlayerWriter {
    pool: SqlitePool,
}

impl SqlitePlayerWriter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerWriter for SqlitePlayerWriter {
    async fn insert_player(&self, record: &PlayerRecord) -> Result<Uuid> {
        let scores = serde_json::to_string(&record.scores)?;
        let traits = serde_json::to_string(&record.traits)?;
        let strengths = serde_json::to_string(&record.strengths)?;
        let weaknesses = serde_json::to_string(&record.weaknesses)?;
        let video_ids = serde_json::to_string(&record.video_ids)?;

        sqlx::query(
            r#"
            INSERT INTO players (
                id, external_id, name, age, height_cm, position,
                preferred_foot, league_name, club_name, on_loan, loan_from,
                scores, traits, strengths, weaknesses,
                market_value, market_value_source, agency,
                overall_rating, potential_rating, image_path, video_ids,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.external_id as i64)
        .bind(&record.name)
        .bind(record.age.map(|v| v as i64))
        .bind(record.height_cm.map(|v| v as i64))
        .bind(&record.position)
        .bind(&record.preferred_foot)
        .bind(&record.league_name)
        .bind(&record.club_name)
        .bind(record.on_loan as i64)
        .bind(&record.loan_from)
        .bind(&scores)
        .bind(&traits)
        .bind(&strengths)
        .bind(&weaknesses)
        .bind(record.market_value)
        .bind(&record.market_value_source)
        .bind(&record.agency)
        .bind(record.overall_rating.map(|v| v as i64))
        .bind(record.potential_rating.map(|v| v as i64))
        .bind(&record.image_path)
        .bind(&video_ids)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(record.id)
    }
}

/// Count player rows, for run verification and tests
pub async fn count_players(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
