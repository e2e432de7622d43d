//! Import orchestration
//!
//! Drives one run end to end: fetch rosters, apply the need filter,
//! persist accepted candidates, and keep the session record current at
//! every phase. Only a total fetch failure fails the run; filtering and
//! persisting accumulate per-item errors and still finish.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use spotter_common::models::{Candidate, PlayerRecord};
use spotter_common::Result;

use crate::db::players::PlayerWriter;
use crate::db::sessions;
use crate::matching::need_accepts;
use crate::models::{ImportItemError, ImportSession, ImportState};
use crate::services::roster_fetcher::fetch_rosters;
use crate::services::RosterProvider;

/// One-run orchestrator over a provider and a player store
pub struct ImportOrchestrator<W: PlayerWriter> {
    provider: Arc<dyn RosterProvider>,
    writer: W,
    db: SqlitePool,
}

impl<W: PlayerWriter> ImportOrchestrator<W> {
    pub fn new(provider: Arc<dyn RosterProvider>, writer: W, db: SqlitePool) -> Self {
        Self {
            provider,
            writer,
            db,
        }
    }

    /// Execute a run for a prepared session. Always returns the session
    /// in a terminal state; errors out of this function are storage
    /// failures while recording progress, not run outcomes.
    pub async fn run(
        &self,
        mut session: ImportSession,
        cancel: CancellationToken,
    ) -> Result<ImportSession> {
        tracing::info!(
            session_id = %session.session_id,
            season = session.season,
            leagues = session.leagues.len(),
            exclude_loans = session.exclude_loans,
            "Starting import run"
        );

        session.transition_to(ImportState::Fetching);
        sessions::save_session(&self.db, &session).await?;

        let outcome = match fetch_rosters(
            self.provider.as_ref(),
            session.season,
            &session.leagues,
            &cancel,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    error = %e,
                    "Import run failed during fetch"
                );
                session.summary.failure = Some(e.to_string());
                session.transition_to(ImportState::Failed);
                sessions::save_session(&self.db, &session).await?;
                return Ok(session);
            }
        };

        session.summary.fetched = outcome.candidates.len() as u32;
        session.summary.leagues = outcome.leagues;

        if outcome.cancelled {
            session.transition_to(ImportState::Cancelled);
            sessions::save_session(&self.db, &session).await?;
            return Ok(session);
        }

        session.transition_to(ImportState::Filtering);
        sessions::save_session(&self.db, &session).await?;

        let accepted: Vec<Candidate> = outcome
            .candidates
            .into_iter()
            .filter(|candidate| need_accepts(&session.need, candidate, session.exclude_loans))
            .collect();
        session.summary.accepted = accepted.len() as u32;

        tracing::info!(
            session_id = %session.session_id,
            fetched = session.summary.fetched,
            accepted = session.summary.accepted,
            "Need filter applied"
        );

        session.transition_to(ImportState::Persisting);
        sessions::save_session(&self.db, &session).await?;

        for candidate in &accepted {
            if cancel.is_cancelled() {
                tracing::info!(
                    session_id = %session.session_id,
                    persisted = session.summary.persisted,
                    "Import cancelled while persisting; written players remain"
                );
                session.transition_to(ImportState::Cancelled);
                sessions::save_session(&self.db, &session).await?;
                return Ok(session);
            }

            let record = PlayerRecord::from_candidate(candidate);
            match self.writer.insert_player(&record).await {
                Ok(_) => session.summary.persisted += 1,
                Err(e) => {
                    // One bad record must not discard the rest of the run
                    tracing::warn!(
                        session_id = %session.session_id,
                        external_id = candidate.external_id,
                        error = %e,
                        "Player write failed; continuing with remaining candidates"
                    );
                    session.summary.persist_failed += 1;
                    session.errors.push(ImportItemError {
                        external_id: candidate.external_id,
                        name: candidate.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        session.transition_to(ImportState::Done);
        sessions::save_session(&self.db, &session).await?;

        tracing::info!(
            session_id = %session.session_id,
            fetched = session.summary.fetched,
            accepted = session.summary.accepted,
            persisted = session.summary.persisted,
            persist_failed = session.summary.persist_failed,
            "Import run finished"
        );

        Ok(session)
    }
}
