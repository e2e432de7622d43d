//! Import session state machine
//!
//! A run progresses Idle → Fetching → Filtering → Persisting → Done.
//! Failed is reachable only from Fetching (the whole fetch failed);
//! Filtering and Persisting accumulate per-item errors and still reach
//! Done. Cancelled is the operator-abort terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spotter_common::models::{FilterSource, NeedSpec};

use crate::services::roster_fetcher::{LeagueReport, LeagueSelection};

/// Import run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportState {
    /// Accepted, background task not yet running
    Idle,
    /// Pulling rosters from the provider
    Fetching,
    /// Applying the need filter in memory
    Filtering,
    /// Writing accepted candidates
    Persisting,
    /// Run finished (possibly with per-item errors)
    Done,
    /// The whole fetch failed; nothing was persisted
    Failed,
    /// Aborted by the operator; already-written players remain
    Cancelled,
}

/// Caller-facing request to start an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Season year, e.g. 2025
    pub season: u16,
    pub leagues: Vec<LeagueSelection>,
    pub filter: FilterSource,
    #[serde(default)]
    pub exclude_loans: bool,
}

/// Structured run summary reported back to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Distinct candidates fetched across all leagues
    pub fetched: u32,
    /// Candidates the need filter retained
    pub accepted: u32,
    /// Player entities created
    pub persisted: u32,
    /// Accepted candidates whose write failed
    pub persist_failed: u32,
    #[serde(default)]
    pub leagues: Vec<LeagueReport>,
    /// Reason the run ended in Failed, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// One accepted candidate whose persistence failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemError {
    pub external_id: u32,
    pub name: String,
    pub message: String,
}

/// One import run, persisted on every state transition so status
/// queries survive the in-flight task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub session_id: Uuid,
    pub state: ImportState,
    pub season: u16,
    /// Selections after catalog resolution
    pub leagues: Vec<LeagueSelection>,
    /// Effective need, resolved once before the run starts
    pub need: NeedSpec,
    pub exclude_loans: bool,
    pub summary: ImportSummary,
    pub errors: Vec<ImportItemError>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl ImportSession {
    pub fn new(
        season: u16,
        leagues: Vec<LeagueSelection>,
        need: NeedSpec,
        exclude_loans: bool,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: ImportState::Idle,
            season,
            leagues,
            need,
            exclude_loans,
            summary: ImportSummary::default(),
            errors: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Move to a new state, stamping the end time on terminal states
    pub fn transition_to(&mut self, new_state: ImportState) {
        tracing::debug!(
            session_id = %self.session_id,
            old_state = ?self.state,
            new_state = ?new_state,
            "Import state transition"
        );
        self.state = new_state;
        if self.is_terminal() {
            self.ended_at = Some(Utc::now());
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            ImportState::Done | ImportState::Failed | ImportState::Cancelled
        )
    }
}
