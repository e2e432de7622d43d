//! Need CRUD handlers
//!
//! Needs are created and edited only through these endpoints; an import
//! run reads them as a snapshot and is never affected by later edits.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use spotter_common::models::{NeedSpec, StoredNeed};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// POST /needs and PUT /needs/:id request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedPayload {
    pub name: String,
    #[serde(default)]
    pub spec: NeedSpec,
}

impl NeedPayload {
    fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Need name must not be empty".to_string()));
        }
        self.spec.validate()?;
        Ok(())
    }
}

/// GET /needs
pub async fn list_needs(State(state): State<AppState>) -> ApiResult<Json<Vec<StoredNeed>>> {
    let needs = db::needs::list_needs(&state.db).await?;
    Ok(Json(needs))
}

/// POST /needs
pub async fn create_need(
    State(state): State<AppState>,
    Json(payload): Json<NeedPayload>,
) -> ApiResult<Json<StoredNeed>> {
    payload.validate()?;

    let need = StoredNeed::new(payload.name, payload.spec);
    db::needs::save_need(&state.db, &need).await?;

    tracing::info!(need_id = %need.id, name = %need.name, "Need created");

    Ok(Json(need))
}

/// GET /needs/:id
pub async fn get_need(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StoredNeed>> {
    let need = db::needs::load_need(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Need not found: {}", id)))?;
    Ok(Json(need))
}

/// PUT /needs/:id
pub async fn update_need(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NeedPayload>,
) -> ApiResult<Json<StoredNeed>> {
    payload.validate()?;

    let mut need = db::needs::load_need(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Need not found: {}", id)))?;

    need.name = payload.name;
    need.spec = payload.spec;
    need.updated_at = Utc::now();
    db::needs::save_need(&state.db, &need).await?;

    tracing::info!(need_id = %need.id, "Need updated");

    Ok(Json(need))
}

/// DELETE /needs/:id
pub async fn delete_need(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = db::needs::delete_need(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Need not found: {}", id)));
    }

    tracing::info!(need_id = %id, "Need deleted");

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Build need CRUD routes
pub fn need_routes() -> Router<AppState> {
    Router::new()
        .route("/needs", get(list_needs).post(create_need))
        .route(
            "/needs/:id",
            get(get_need).put(update_need).delete(delete_need),
        )
}
