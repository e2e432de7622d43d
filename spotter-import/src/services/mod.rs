//! External collaborators of the import pipeline

pub mod league_names;
pub mod provider_client;
pub mod roster_fetcher;

pub use provider_client::{ProviderClient, ProviderError, RosterProvider};
pub use roster_fetcher::{fetch_rosters, FetchOutcome, LeagueReport, LeagueSelection};

/// Scripted provider for exercising the fetch and import paths without
/// a network
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::provider_client::{
        PlayerEntry, PlayerInfo, ProviderError, RosterProvider, TeamEntry, TeamInfo,
    };

    pub fn team_entry(id: u32, name: &str) -> TeamEntry {
        TeamEntry {
            team: TeamInfo {
                id: Some(id),
                name: Some(name.to_string()),
            },
        }
    }

    pub fn player_entry(id: u32, name: &str) -> PlayerEntry {
        PlayerEntry {
            player: PlayerInfo {
                id: Some(id),
                name: Some(name.to_string()),
                age: Some(24),
                height: Some("183 cm".to_string()),
                position: Some("Central Midfield".to_string()),
                preferred_foot: None,
            },
            stats: None,
        }
    }

    #[derive(Default)]
    pub struct ScriptedProvider {
        teams_by_league: HashMap<u32, Vec<TeamEntry>>,
        failing_leagues: HashSet<u32>,
        pages_by_team: HashMap<u32, Vec<Vec<PlayerEntry>>>,
        endless_teams: HashSet<u32>,
        fail_pages_after: HashMap<u32, u32>,
        calls: AtomicU32,
        player_calls: AtomicU32,
    }

    impl ScriptedProvider {
        pub fn add_team(&mut self, league_id: u32, entry: TeamEntry) {
            self.teams_by_league.entry(league_id).or_default().push(entry);
        }

        /// Append one squad page for a team
        pub fn add_page(&mut self, team_id: u32, entries: Vec<PlayerEntry>) {
            self.pages_by_team.entry(team_id).or_default().push(entries);
        }

        /// Make the team-listing call fail for a league
        pub fn fail_league(&mut self, league_id: u32) {
            self.failing_leagues.insert(league_id);
        }

        /// Make every squad page after `page` fail for a team
        pub fn fail_pages_after(&mut self, team_id: u32, page: u32) {
            self.fail_pages_after.insert(team_id, page);
        }

        /// Make a team return a full page forever
        pub fn set_endless(&mut self, team_id: u32) {
            self.endless_teams.insert(team_id);
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn player_call_count(&self) -> u32 {
            self.player_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RosterProvider for ScriptedProvider {
        async fn teams(
            &self,
            league_id: u32,
            _season: u16,
        ) -> Result<Vec<TeamEntry>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_leagues.contains(&league_id) {
                return Err(ProviderError::Network("connection refused".to_string()));
            }
            Ok(self
                .teams_by_league
                .get(&league_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn players(
            &self,
            team_id: u32,
            _season: u16,
            page: u32,
        ) -> Result<Vec<PlayerEntry>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.player_calls.fetch_add(1, Ordering::SeqCst);

            if self.endless_teams.contains(&team_id) {
                return Ok(vec![player_entry(9000 + page, &format!("Filler {}", page))]);
            }
            if let Some(&limit) = self.fail_pages_after.get(&team_id) {
                if page > limit {
                    return Err(ProviderError::Network("connection reset".to_string()));
                }
            }
            Ok(self
                .pages_by_team
                .get(&team_id)
                .and_then(|pages| pages.get((page - 1) as usize))
                .cloned()
                .unwrap_or_default())
        }
    }
}
