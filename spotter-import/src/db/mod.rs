//! Database access for spotter-import

pub mod needs;
pub mod players;
pub mod sessions;

use std::path::Path;

use spotter_common::Result;
use sqlx::SqlitePool;

/// Initialize the database connection pool, creating the file and the
/// service tables if missing
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// In-memory database, used by tests. Capped at one connection: every
/// pooled connection to `sqlite::memory:` would otherwise open its own
/// empty database.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create service tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Player entities. The candidate shape plus curated fields; no
    // uniqueness on external_id (duplicate imports across runs are a
    // storage-layer concern)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            external_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            age INTEGER,
            height_cm INTEGER,
            position TEXT,
            preferred_foot TEXT,
            league_name TEXT NOT NULL,
            club_name TEXT NOT NULL,
            on_loan INTEGER NOT NULL DEFAULT 0,
            loan_from TEXT,
            scores TEXT NOT NULL DEFAULT '{}',
            traits TEXT NOT NULL DEFAULT '[]',
            strengths TEXT NOT NULL DEFAULT '[]',
            weaknesses TEXT NOT NULL DEFAULT '[]',
            market_value INTEGER,
            market_value_source TEXT,
            agency TEXT,
            overall_rating INTEGER,
            potential_rating INTEGER,
            image_path TEXT,
            video_ids TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS needs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            spec TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS import_sessions (
            session_id TEXT PRIMARY KEY,
            state TEXT NOT NULL,
            season INTEGER NOT NULL,
            leagues TEXT NOT NULL,
            need TEXT NOT NULL,
            exclude_loans INTEGER NOT NULL DEFAULT 0,
            summary TEXT NOT NULL DEFAULT '{}',
            errors TEXT NOT NULL DEFAULT '[]',
            started_at TEXT NOT NULL,
            ended_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (players, needs, import_sessions)");

    Ok(())
}
