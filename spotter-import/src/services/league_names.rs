//! League catalog and name reconciliation
//!
//! Scouts enter league names as free text; the catalog maps a known
//! name onto the provider's identifier space. Reconciliation is
//! deliberately binary (normalize and compare), not fuzzy: a near-miss
//! should fail loudly in diagnostics rather than silently fetch the
//! wrong league.

use crate::services::roster_fetcher::LeagueSelection;

/// One league the service knows about. Entries not yet mapped into the
/// provider's identifier space carry no provider id.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub provider_id: Option<u32>,
}

/// Built-in league catalog
pub const LEAGUE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry { name: "Premier League", provider_id: Some(39) },
    CatalogEntry { name: "Championship", provider_id: Some(40) },
    CatalogEntry { name: "La Liga", provider_id: Some(140) },
    CatalogEntry { name: "Serie A", provider_id: Some(135) },
    CatalogEntry { name: "Bundesliga", provider_id: Some(78) },
    CatalogEntry { name: "2. Bundesliga", provider_id: Some(79) },
    CatalogEntry { name: "Ligue 1", provider_id: Some(61) },
    CatalogEntry { name: "Eredivisie", provider_id: Some(88) },
    CatalogEntry { name: "Primeira Liga", provider_id: Some(94) },
    CatalogEntry { name: "Süper Lig", provider_id: Some(203) },
    // Not yet mapped by the provider
    CatalogEntry { name: "3. Liga", provider_id: None },
    CatalogEntry { name: "Regionalliga West", provider_id: None },
];

/// Normalize a human-entered league name for comparison: trim,
/// lowercase, collapse inner whitespace.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Look up a catalog entry by human-entered name. Exact normalized
/// equality only.
pub fn find_catalog_entry(name: &str) -> Option<&'static CatalogEntry> {
    let wanted = normalize(name);
    LEAGUE_CATALOG
        .iter()
        .find(|entry| normalize(entry.name) == wanted)
}

/// Turn a caller-supplied selection into the one the fetcher sees.
/// A selection that already carries a provider id is trusted as-is;
/// otherwise the catalog is consulted. Unknown and unmapped names both
/// come back without a provider id and end up in diagnostics as
/// unresolved.
pub fn resolve_selection(selection: LeagueSelection) -> LeagueSelection {
    if selection.provider_id.is_some() {
        return selection;
    }
    match find_catalog_entry(&selection.name) {
        Some(entry) => LeagueSelection {
            // Canonical catalog spelling for diagnostics
            name: entry.name.to_string(),
            provider_id: entry.provider_id,
        },
        None => selection,
    }
}
