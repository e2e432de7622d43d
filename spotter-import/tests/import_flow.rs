//! End-to-end import flow over the HTTP surface with a scripted
//! provider: start a run, poll it to completion, check what got
//! persisted

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use spotter_import::db::players::count_players;
use spotter_import::services::provider_client::{
    PlayerEntry, PlayerInfo, ProviderError, RatingBlock, StatBlock, TeamEntry, TeamInfo,
};
use spotter_import::services::RosterProvider;
use spotter_import::AppState;

/// One Bundesliga team with a small squad: an aging keeper, a fitting
/// young defender, a loaned midfielder and a duplicate of the keeper
struct SquadProvider;

fn player(id: u32, name: &str, age: u8) -> PlayerEntry {
    PlayerEntry {
        player: PlayerInfo {
            id: Some(id),
            name: Some(name.to_string()),
            age: Some(age),
            height: Some("183 cm".to_string()),
            position: Some("Central Midfield".to_string()),
            preferred_foot: None,
        },
        stats: None,
    }
}

#[async_trait]
impl RosterProvider for SquadProvider {
    async fn teams(&self, league_id: u32, _season: u16) -> Result<Vec<TeamEntry>, ProviderError> {
        assert_eq!(league_id, 78, "Bundesliga should resolve to provider id 78");
        Ok(vec![TeamEntry {
            team: TeamInfo {
                id: Some(100),
                name: Some("FC Nord".to_string()),
            },
        }])
    }

    async fn players(
        &self,
        _team_id: u32,
        _season: u16,
        page: u32,
    ) -> Result<Vec<PlayerEntry>, ProviderError> {
        if page > 1 {
            return Ok(Vec::new());
        }

        let keeper = player(1, "Old Keeper", 34);

        let mut defender = player(2, "Junges Talent", 19);
        defender.player.height = Some("189 cm".to_string());
        defender.player.position = Some("Centre-Back".to_string());
        defender.player.preferred_foot = Some("Left".to_string());
        defender.stats = Some(StatBlock {
            on_loan: false,
            loan_from: None,
            traits: vec!["Aerial Duels".to_string()],
            ratings: Some(RatingBlock {
                zweikampf: Some(75),
                ..RatingBlock::default()
            }),
        });

        let mut loanee = player(3, "Leihspieler", 21);
        loanee.stats = Some(StatBlock {
            on_loan: true,
            loan_from: Some("FC Parent".to_string()),
            traits: Vec::new(),
            ratings: None,
        });

        // The provider repeats the keeper; the fetcher must dedup
        Ok(vec![keeper.clone(), defender, loanee, keeper])
    }
}

/// Provider whose every league fails at the team listing
struct DownProvider;

#[async_trait]
impl RosterProvider for DownProvider {
    async fn teams(&self, _league_id: u32, _season: u16) -> Result<Vec<TeamEntry>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }

    async fn players(
        &self,
        _team_id: u32,
        _season: u16,
        _page: u32,
    ) -> Result<Vec<PlayerEntry>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

async fn create_test_app(
    provider: Arc<dyn RosterProvider>,
) -> (axum::Router, sqlx::SqlitePool) {
    let pool = spotter_import::db::init_memory_pool()
        .await
        .expect("in-memory database");
    let state = AppState::new(pool.clone(), provider);
    (spotter_import::build_router(state), pool)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn wait_for_terminal(app: &axum::Router, session_id: &str) -> Value {
    for _ in 0..500 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/import/status/{}", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        match body["state"].as_str().unwrap() {
            "DONE" | "FAILED" | "CANCELLED" => return body,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("import session never reached a terminal state");
}

#[tokio::test]
async fn a_need_driven_import_persists_only_matching_candidates() {
    let (app, pool) = create_test_app(Arc::new(SquadProvider)).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/import/start")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "season": 2025,
                        "leagues": [ { "name": "bundesliga" } ],
                        "filter": {
                            "source": "manual",
                            "spec": { "minAge": 18, "maxAge": 30 }
                        },
                        "excludeLoans": true
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let started = body_json(response).await;
    let session_id = started["sessionId"].as_str().unwrap().to_string();

    let finished = wait_for_terminal(&app, &session_id).await;

    assert_eq!(finished["state"], "DONE");
    // Keeper, defender, loanee; the duplicate keeper entry is dropped
    assert_eq!(finished["summary"]["fetched"], 3);
    // Keeper is over the cap, the loanee is excluded: the defender stays
    assert_eq!(finished["summary"]["accepted"], 1);
    assert_eq!(finished["summary"]["persisted"], 1);
    assert_eq!(finished["summary"]["persistFailed"], 0);
    assert_eq!(finished["summary"]["leagues"][0]["name"], "Bundesliga");
    assert_eq!(finished["summary"]["leagues"][0]["candidates"], 3);

    assert_eq!(count_players(&pool).await.unwrap(), 1);

    // Cancelling a finished session is a no-op
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/import/cancel/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cancel = body_json(response).await;
    assert_eq!(cancel["cancelled"], false);
    assert_eq!(cancel["state"], "DONE");
}

#[tokio::test]
async fn imports_can_be_driven_by_a_stored_need() {
    let (app, pool) = create_test_app(Arc::new(SquadProvider)).await;

    // Author the need first
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/needs")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "name": "U30 rotation",
                        "spec": { "minAge": 18, "maxAge": 30 }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let need = body_json(response).await;
    let need_id = need["id"].as_str().unwrap().to_string();

    // Loans are not excluded this time: the loanee stays in
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/import/start")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "season": 2025,
                        "leagues": [ { "name": "Bundesliga" } ],
                        "filter": { "source": "fromNeed", "needId": need_id }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let started = body_json(response).await;
    let session_id = started["sessionId"].as_str().unwrap().to_string();

    let finished = wait_for_terminal(&app, &session_id).await;

    assert_eq!(finished["state"], "DONE");
    assert_eq!(finished["summary"]["fetched"], 3);
    assert_eq!(finished["summary"]["accepted"], 2);
    assert_eq!(finished["summary"]["persisted"], 2);
    assert_eq!(count_players(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn a_fully_failed_fetch_ends_in_failed_with_nothing_persisted() {
    let (app, pool) = create_test_app(Arc::new(DownProvider)).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/import/start")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "season": 2025,
                        "leagues": [ { "name": "Bundesliga" }, { "name": "La Liga" } ],
                        "filter": { "source": "manual", "spec": {} }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let started = body_json(response).await;
    let session_id = started["sessionId"].as_str().unwrap().to_string();

    let finished = wait_for_terminal(&app, &session_id).await;

    assert_eq!(finished["state"], "FAILED");
    assert!(finished["summary"]["failure"]
        .as_str()
        .unwrap()
        .contains("league"));
    assert_eq!(count_players(&pool).await.unwrap(), 0);
}
