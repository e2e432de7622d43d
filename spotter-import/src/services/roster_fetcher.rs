//! Roster fetching and normalization
//!
//! Walks league → team → page against the provider, normalizes raw
//! entries into candidates and deduplicates by external identifier
//! within one fetch call. A failed league is skipped, not fatal; the
//! whole fetch fails only when every resolvable league fails.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use spotter_common::models::{AttributeScores, Candidate};

use crate::error::ImportRunError;
use crate::services::provider_client::{PlayerEntry, RosterProvider};

/// Hard cap on squad pages per team. The provider's total-page metadata
/// is inconsistent and must never be trusted to end pagination.
pub const MAX_PAGES_PER_TEAM: u32 = 10;

/// One league the caller asked to fetch. Selections whose catalog entry
/// is not yet mapped into the provider's identifier space carry no
/// provider id and are skipped before any fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSelection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<u32>,
}

/// Per-league fetch diagnostics reported back in the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<u32>,
    /// True when the selection had no provider id and was never fetched
    pub unresolved: bool,
    /// Teams with a resolvable identifier
    pub teams: u32,
    /// Distinct candidates this league contributed
    pub candidates: u32,
    /// Team-listing failure for this league, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LeagueReport {
    fn for_selection(selection: &LeagueSelection) -> Self {
        Self {
            name: selection.name.clone(),
            provider_id: selection.provider_id,
            unresolved: selection.provider_id.is_none(),
            teams: 0,
            candidates: 0,
            error: None,
        }
    }
}

/// Result of one fetch call
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Candidates in league-then-team-then-page order, deduplicated
    pub candidates: Vec<Candidate>,
    pub leagues: Vec<LeagueReport>,
    /// True when the fetch stopped early on the cancellation token
    pub cancelled: bool,
}

/// Fetch and normalize all rosters for (season, selections).
///
/// Fails with `Configuration` when no selection resolves to a provider
/// identifier, and with `UpstreamUnavailable` when every resolvable
/// league fails at the team-listing call.
pub async fn fetch_rosters<P: RosterProvider + ?Sized>(
    provider: &P,
    season: u16,
    selections: &[LeagueSelection],
    cancel: &CancellationToken,
) -> Result<FetchOutcome, ImportRunError> {
    if selections.is_empty() {
        return Err(ImportRunError::Configuration(
            "No league identifiers supplied".to_string(),
        ));
    }
    if selections.iter().all(|s| s.provider_id.is_none()) {
        return Err(ImportRunError::Configuration(
            "No league selection resolves to a provider identifier".to_string(),
        ));
    }

    let mut seen: HashSet<u32> = HashSet::new();
    let mut outcome = FetchOutcome::default();
    let mut any_league_succeeded = false;

    for selection in selections {
        let mut report = LeagueReport::for_selection(selection);

        let Some(league_id) = selection.provider_id else {
            tracing::warn!(
                league = %selection.name,
                "Skipping league without a provider identifier"
            );
            outcome.leagues.push(report);
            continue;
        };

        let teams = match provider.teams(league_id, season).await {
            Ok(teams) => teams,
            Err(e) => {
                tracing::warn!(
                    league = %selection.name,
                    error = %e,
                    "Team listing failed; skipping league"
                );
                report.error = Some(e.to_string());
                outcome.leagues.push(report);
                continue;
            }
        };
        any_league_succeeded = true;

        tracing::info!(
            league = %selection.name,
            teams = teams.len(),
            "Fetching squads"
        );

        'teams: for entry in teams {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let Some(team_id) = entry.team.id else {
                tracing::debug!(
                    league = %selection.name,
                    "Skipping team without a resolvable identifier"
                );
                continue;
            };
            report.teams += 1;
            let club_name = entry
                .team
                .name
                .unwrap_or_else(|| format!("Team {}", team_id));

            for page in 1..=MAX_PAGES_PER_TEAM {
                if cancel.is_cancelled() {
                    outcome.cancelled = true;
                    break 'teams;
                }

                let entries = match provider.players(team_id, season, page).await {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(
                            league = %selection.name,
                            team_id,
                            page,
                            error = %e,
                            "Squad page failed; skipping rest of team"
                        );
                        break;
                    }
                };
                if entries.is_empty() {
                    break;
                }

                for raw in entries {
                    if let Some(candidate) = normalize_entry(raw, &selection.name, &club_name) {
                        // First occurrence wins; later duplicates are
                        // silently skipped
                        if seen.insert(candidate.external_id) {
                            report.candidates += 1;
                            outcome.candidates.push(candidate);
                        }
                    }
                }
            }
        }

        let cancelled = outcome.cancelled;
        outcome.leagues.push(report);
        if cancelled {
            break;
        }
    }

    if !outcome.cancelled && !any_league_succeeded {
        return Err(ImportRunError::UpstreamUnavailable(
            "Every requested league failed at the team-listing call".to_string(),
        ));
    }

    Ok(outcome)
}

/// Normalize one raw squad entry into a candidate. Entries without an
/// identifier or a name cannot be used and are dropped.
fn normalize_entry(entry: PlayerEntry, league_name: &str, club_name: &str) -> Option<Candidate> {
    let Some(external_id) = entry.player.id else {
        tracing::debug!(club = %club_name, "Skipping player entry without an identifier");
        return None;
    };
    let name = match entry.player.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => {
            tracing::debug!(external_id, "Skipping player entry without a name");
            return None;
        }
    };

    let stats = entry.stats.unwrap_or_default();
    let ratings = stats.ratings.unwrap_or_default();

    Some(Candidate {
        external_id,
        name,
        age: entry.player.age,
        height_cm: entry.player.height.as_deref().and_then(parse_height_cm),
        position: entry.player.position,
        preferred_foot: entry.player.preferred_foot,
        league_name: league_name.to_string(),
        club_name: club_name.to_string(),
        on_loan: stats.on_loan,
        loan_from: stats.loan_from,
        scores: AttributeScores {
            technik: ratings.technik,
            schnelligkeit: ratings.schnelligkeit,
            zweikampf: ratings.zweikampf,
            passspiel: ratings.passspiel,
            kopfball: ratings.kopfball,
            abschluss: ratings.abschluss,
        },
        traits: stats.traits,
    })
}

/// Parse a raw height string to whole centimeters. Non-numeric or
/// empty input is unknown (None), never zero.
pub fn parse_height_cm(raw: &str) -> Option<u16> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value = digits.parse::<u16>().ok()?;
    (value > 0).then_some(value)
}
