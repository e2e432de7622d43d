//! Import run API handlers
//!
//! POST /import/start, GET /import/status/:session_id,
//! POST /import/cancel/:session_id
//!
//! Starting a run validates the request, resolves the filter source
//! into an effective need, persists an Idle session and spawns the
//! orchestrator as a background task. Configuration problems surface
//! here, before any network call.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use spotter_common::models::FilterSource;

use crate::db::players::SqlitePlayerWriter;
use crate::error::{ApiError, ApiResult};
use crate::import::ImportOrchestrator;
use crate::models::{ImportRequest, ImportSession, ImportState};
use crate::services::league_names;
use crate::services::roster_fetcher::LeagueSelection;
use crate::{db, AppState};

/// POST /import/start response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartImportResponse {
    pub session_id: Uuid,
    pub state: ImportState,
    pub started_at: DateTime<Utc>,
}

/// POST /import/cancel response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelImportResponse {
    pub session_id: Uuid,
    pub state: ImportState,
    /// False when the session had already finished
    pub cancelled: bool,
}

/// POST /import/start
pub async fn start_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<Json<StartImportResponse>> {
    if request.season == 0 {
        return Err(ApiError::BadRequest(
            "Season must be a positive year".to_string(),
        ));
    }
    if request.leagues.is_empty() {
        return Err(ApiError::BadRequest(
            "No league identifiers supplied".to_string(),
        ));
    }

    // Catalog resolution for selections without an explicit provider id;
    // selections that stay unresolved are skipped by the fetcher and
    // reported in diagnostics
    let leagues: Vec<LeagueSelection> = request
        .leagues
        .into_iter()
        .map(league_names::resolve_selection)
        .collect();
    if leagues.iter().all(|l| l.provider_id.is_none()) {
        return Err(ApiError::BadRequest(
            "No league selection resolves to a provider identifier".to_string(),
        ));
    }

    // Resolve the filter source into one effective need before the run
    let need = match request.filter {
        FilterSource::FromNeed { need_id } => db::needs::load_need(&state.db, need_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Need not found: {}", need_id)))?
            .spec,
        FilterSource::Manual { spec } => spec,
    };
    need.validate()?;

    let session = ImportSession::new(request.season, leagues, need, request.exclude_loans);
    db::sessions::save_session(&state.db, &session).await?;

    let response = StartImportResponse {
        session_id: session.session_id,
        state: session.state,
        started_at: session.started_at,
    };

    let cancel = CancellationToken::new();
    state
        .cancellation_tokens
        .write()
        .await
        .insert(session.session_id, cancel.clone());

    tracing::info!(
        session_id = %session.session_id,
        season = session.season,
        "Import session created; starting background run"
    );

    let task_state = state.clone();
    let session_id = session.session_id;
    tokio::spawn(async move {
        let orchestrator = ImportOrchestrator::new(
            task_state.provider.clone(),
            SqlitePlayerWriter::new(task_state.db.clone()),
            task_state.db.clone(),
        );

        if let Err(e) = orchestrator.run(session, cancel).await {
            tracing::error!(
                session_id = %session_id,
                error = %e,
                "Import background task failed"
            );
            *task_state.last_error.write().await = Some(e.to_string());
        }

        task_state
            .cancellation_tokens
            .write()
            .await
            .remove(&session_id);
    });

    Ok(Json(response))
}

/// GET /import/status/:session_id
///
/// The stored session is the status: state, summary and per-item errors.
pub async fn get_import_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ImportSession>> {
    let session = db::sessions::load_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Import session not found: {}", session_id)))?;

    Ok(Json(session))
}

/// POST /import/cancel/:session_id
///
/// Idempotent: cancelling a finished session reports its terminal state
/// without touching it.
pub async fn cancel_import(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<CancelImportResponse>> {
    let cancelled = {
        let tokens = state.cancellation_tokens.read().await;
        match tokens.get(&session_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    };

    let session = db::sessions::load_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Import session not found: {}", session_id)))?;

    if cancelled {
        tracing::info!(session_id = %session_id, "Import cancellation requested");
    }

    Ok(Json(CancelImportResponse {
        session_id,
        state: session.state,
        cancelled,
    }))
}

/// Build import run routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/import/start", post(start_import))
        .route("/import/status/:session_id", get(get_import_status))
        .route("/import/cancel/:session_id", post(cancel_import))
}
