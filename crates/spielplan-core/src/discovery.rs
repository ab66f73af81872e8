//! Team discovery helpers.
//!
//! Discovery crawls several club listings concurrently, so the same
//! team/competition pair may be reported more than once. [`dedupe`] merges
//! those lists; [`team_configs`] turns the survivors into per-team
//! configuration keyed by the abbreviated competition identifier.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::identifier::abbreviate;

/// Base URL of the public league pages.
pub const LEAGUE_BASE_URL: &str = "https://www.basketball-bund.net/static/#/liga";

/// League name fragments that are never tracked as a team schedule.
const SKIPPED_LEAGUE_KEYWORDS: &[&str] = &["pokal", "testspiele"];

/// A team/competition pair found during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCandidate {
    /// Team display name.
    pub team_name: String,
    /// Competition (league) identifier.
    pub competition_id: u64,
    /// Competition display name.
    pub competition_name: String,
    /// Permanent team identifier across seasons.
    pub team_permanent_id: u64,
}

impl TeamCandidate {
    /// Creates a candidate.
    pub fn new(
        team_name: impl Into<String>,
        competition_id: u64,
        competition_name: impl Into<String>,
        team_permanent_id: u64,
    ) -> Self {
        Self {
            team_name: team_name.into(),
            competition_id,
            competition_name: competition_name.into(),
            team_permanent_id,
        }
    }

    fn key(&self) -> (u64, u64) {
        (self.team_permanent_id, self.competition_id)
    }
}

/// Merges candidate lists, keeping the first occurrence of every
/// `(team_permanent_id, competition_id)` pair.
///
/// Order of first occurrences is preserved, so the output depends on the
/// order of the input lists only through which duplicate survives.
pub fn dedupe<I, L>(lists: I) -> Vec<TeamCandidate>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = TeamCandidate>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut dropped = 0usize;

    for candidate in lists.into_iter().flatten() {
        if seen.insert(candidate.key()) {
            unique.push(candidate);
        } else {
            dropped += 1;
        }
    }

    debug!(unique = unique.len(), dropped, "Deduplicated team candidates");
    unique
}

/// A team as it appears on one side of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    /// Team display name.
    pub teamname: String,
    /// Permanent team identifier.
    pub team_permanent_id: u64,
}

/// Finds the side of a fixture whose name starts with `search`
/// (case-insensitive), home side first.
pub fn find_team<'a>(home: &'a TeamRef, guest: &'a TeamRef, search: &str) -> Option<&'a TeamRef> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    [home, guest]
        .into_iter()
        .find(|team| team.teamname.to_lowercase().starts_with(&needle))
}

/// Returns true for competitions that do not get their own schedule.
pub fn should_skip_league(competition_name: &str) -> bool {
    let name = competition_name.to_lowercase();
    SKIPPED_LEAGUE_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Per-team configuration derived from a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    /// Competition (league) identifier.
    pub competition_id: u64,
    /// Team display name.
    pub team_name: String,
    /// Short identifier, see [`abbreviate`].
    pub team_id: String,
    /// Public league page.
    pub league_url: String,
}

impl TeamConfig {
    /// Builds the configuration for a candidate.
    pub fn from_candidate(candidate: &TeamCandidate) -> Self {
        Self {
            competition_id: candidate.competition_id,
            team_name: candidate.team_name.clone(),
            team_id: abbreviate(&candidate.competition_name),
            league_url: format!("{}/{}", LEAGUE_BASE_URL, candidate.competition_id),
        }
    }
}

/// Builds team configurations from deduplicated candidates.
///
/// Cup and friendly competitions are skipped. When two competitions
/// abbreviate to the same identifier the first one is kept.
pub fn team_configs(candidates: &[TeamCandidate]) -> Vec<TeamConfig> {
    let mut by_id: HashMap<String, u64> = HashMap::new();
    let mut configs = Vec::new();

    for candidate in candidates {
        if should_skip_league(&candidate.competition_name) {
            debug!(
                competition = %candidate.competition_name,
                "Skipping competition"
            );
            continue;
        }

        let config = TeamConfig::from_candidate(candidate);
        if let Some(existing) = by_id.get(&config.team_id) {
            warn!(
                team_id = %config.team_id,
                kept = existing,
                dropped = config.competition_id,
                "Competition identifier collision"
            );
            continue;
        }

        by_id.insert(config.team_id.clone(), config.competition_id);
        configs.push(config);
    }

    configs
}
