//! Game result extraction and win/loss attribution.
//!
//! Upstream match records are loosely structured JSON and report results in
//! several ways: a compact `"78:65"` string, separately named score fields,
//! or just a flag saying the game is over. [`ResultExtractor`] runs an
//! ordered list of [`ResultStrategy`] implementations over the raw records;
//! the first strategy that produces a result wins.

use serde_json::Value;
use tracing::debug;

use crate::event::{Game, GameResult};

/// A single way of reading a result out of raw upstream records.
pub trait ResultStrategy: Send + Sync {
    /// Returns the strategy name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Tries to read a result from the match info and the game envelope.
    fn extract(&self, match_info: &Value, envelope: &Value) -> Option<GameResult>;
}

/// Reads a compact `"H:G"` score string from the game envelope.
#[derive(Debug, Clone)]
pub struct CompactScore {
    fields: Vec<&'static str>,
}

impl Default for CompactScore {
    fn default() -> Self {
        Self {
            fields: vec!["result", "ergebnis", "score"],
        }
    }
}

impl ResultStrategy for CompactScore {
    fn name(&self) -> &'static str {
        "compact_score"
    }

    fn extract(&self, _match_info: &Value, envelope: &Value) -> Option<GameResult> {
        self.fields
            .iter()
            .filter_map(|field| envelope.get(field)?.as_str())
            .find_map(parse_compact_score)
    }
}

/// Parses `"78:65"` into a finished result. Both sides must be integers.
pub fn parse_compact_score(text: &str) -> Option<GameResult> {
    let (home, guest) = text.split_once(':')?;
    let home = home.trim().parse().ok()?;
    let guest = guest.trim().parse().ok()?;
    Some(GameResult::scored(home, guest))
}

/// Reads a pair of score fields from the match info.
#[derive(Debug, Clone)]
pub struct ScoreFields {
    pairs: Vec<(&'static str, &'static str)>,
}

impl Default for ScoreFields {
    fn default() -> Self {
        Self {
            pairs: vec![
                ("homeScore", "guestScore"),
                ("heimEndstand", "gastEndstand"),
                ("heimErgebnis", "gastErgebnis"),
                ("homeTeamScore", "guestTeamScore"),
            ],
        }
    }
}

impl ResultStrategy for ScoreFields {
    fn name(&self) -> &'static str {
        "score_fields"
    }

    fn extract(&self, match_info: &Value, _envelope: &Value) -> Option<GameResult> {
        self.pairs.iter().find_map(|(home, guest)| {
            let home = score_value(match_info.get(home)?)?;
            let guest = score_value(match_info.get(guest)?)?;
            Some(GameResult::scored(home, guest))
        })
    }
}

/// Accepts non-negative integers and numeric strings.
fn score_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Detects a finished game without a readable score.
#[derive(Debug, Clone)]
pub struct FinishedSignals {
    flags: Vec<&'static str>,
    status_fields: Vec<&'static str>,
    finished_states: Vec<&'static str>,
}

impl Default for FinishedSignals {
    fn default() -> Self {
        Self {
            flags: vec!["isFinished", "finished", "ergebnisbestaetigt", "resultConfirmed"],
            status_fields: vec!["status", "matchStatus"],
            finished_states: vec!["finished", "beendet", "abgeschlossen", "final", "played"],
        }
    }
}

impl FinishedSignals {
    fn signals_in(&self, record: &Value) -> bool {
        let flagged = self
            .flags
            .iter()
            .any(|flag| record.get(flag).and_then(Value::as_bool) == Some(true));

        flagged
            || self.status_fields.iter().any(|field| {
                record
                    .get(field)
                    .and_then(Value::as_str)
                    .map(|status| {
                        let status = status.trim().to_lowercase();
                        self.finished_states.iter().any(|state| *state == status)
                    })
                    .unwrap_or(false)
            })
    }
}

impl ResultStrategy for FinishedSignals {
    fn name(&self) -> &'static str {
        "finished_signals"
    }

    fn extract(&self, match_info: &Value, envelope: &Value) -> Option<GameResult> {
        (self.signals_in(match_info) || self.signals_in(envelope)).then(GameResult::finished)
    }
}

/// Runs result strategies in order; the first hit wins.
pub struct ResultExtractor {
    strategies: Vec<Box<dyn ResultStrategy>>,
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CompactScore::default()),
            Box::new(ScoreFields::default()),
            Box::new(FinishedSignals::default()),
        ])
    }
}

impl std::fmt::Debug for ResultExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultExtractor")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResultExtractor {
    /// Creates an extractor with a custom strategy order.
    pub fn new(strategies: Vec<Box<dyn ResultStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the names of the configured strategies, in order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extracts a result, or `None` if the game has not been played.
    pub fn extract(&self, match_info: &Value, envelope: &Value) -> Option<GameResult> {
        self.strategies.iter().find_map(|strategy| {
            let result = strategy.extract(match_info, envelope)?;
            debug!(strategy = strategy.name(), ?result, "Extracted game result");
            Some(result)
        })
    }
}

/// A game result from the point of view of a tracked team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The tracked team scored more points.
    Won { home: u32, guest: u32 },
    /// The tracked team did not score more points.
    Lost { home: u32, guest: u32 },
    /// Both scores are known but the tracked team is not playing.
    Score { home: u32, guest: u32 },
    /// The game is over but no score is known.
    Finished,
    /// The game has not been played.
    Pending,
}

impl GameOutcome {
    /// Attributes the result of `game` to `tracked_team`.
    ///
    /// The tracked side is found by case-insensitive substring match on the
    /// team names, home first. Equal scores count as a loss.
    pub fn for_team(game: &Game, tracked_team: &str) -> Self {
        let Some(result) = game.result else {
            return Self::Pending;
        };

        let Some((home, guest)) = result.scores() else {
            return if result.is_finished {
                Self::Finished
            } else {
                Self::Pending
            };
        };

        let needle = tracked_team.trim().to_lowercase();
        let tracked_score = if needle.is_empty() {
            None
        } else if game.home.to_lowercase().contains(&needle) {
            Some((home, guest))
        } else if game.guest.to_lowercase().contains(&needle) {
            Some((guest, home))
        } else {
            None
        };

        match tracked_score {
            Some((own, other)) if own > other => Self::Won { home, guest },
            Some(_) => Self::Lost { home, guest },
            None => Self::Score { home, guest },
        }
    }

    /// Returns the badge text shown next to a game.
    pub fn badge(&self) -> Option<String> {
        match self {
            Self::Won { home, guest } => Some(format!("Sieg {}:{}", home, guest)),
            Self::Lost { home, guest } => Some(format!("Niederlage {}:{}", home, guest)),
            Self::Score { home, guest } => Some(format!("Beendet {}:{}", home, guest)),
            Self::Finished => Some("Beendet".to_string()),
            Self::Pending => None,
        }
    }
}
