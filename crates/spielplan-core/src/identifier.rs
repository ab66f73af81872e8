//! Short identifiers for competitions.
//!
//! A competition name such as `"Herren Bezirksliga A"` is turned into a
//! short, filesystem-safe key (`"he-bl-a"`) that doubles as the team id and
//! as a display label. The conversion is a fixed pipeline of
//! [`AbbreviationRule`]s applied to the sanitized token stream:
//!
//! 1. [`MiniMarker`] strips a leading `mini` and switches on level abbreviation
//! 2. [`GenderOrAgeGroup`] maps `damen`/`herren` or keeps `u12`, `mu14`, `wu16`
//! 3. [`CupCompetition`] emits `pokal` and ends the pipeline
//! 4. [`LeagueLevel`] shortens `bezirksliga` to `bl`, `kreisliga` to `kl`, ...
//! 5. [`MiniLevel`] shortens the mini-league level word to its first letter
//! 6. [`DivisionSuffix`] keeps every remaining token
//!
//! # Example
//!
//! ```
//! use spielplan_core::identifier::abbreviate;
//!
//! assert_eq!(abbreviate("Herren Bezirksliga A"), "he-bl-a");
//! assert_eq!(abbreviate("BBV Pokal Herren"), "pokal");
//! assert_eq!(abbreviate("Mini U11 Fortgeschrittene 1"), "u11-f-1");
//! ```

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

/// Age group tokens: `u12`, `mu14`, `wu16`.
static AGE_GROUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:m|w)?u\d+").expect("Invalid age group regex"));

/// Character replacements applied before tokenizing.
const TRANSLITERATIONS: &[(&str, &str)] = &[("ä", "ae"), ("ö", "oe"), ("ü", "ue"), ("ß", "ss")];

/// Whole-word shortenings applied after transliteration.
const COMPOUND_REPLACEMENTS: &[(&str, &str)] = &[("rueckrunde", "rr")];

/// Lowercases, transliterates umlauts and collapses everything that is not
/// `[a-z0-9]` into single hyphens.
pub fn sanitize_for_filename(name: &str) -> String {
    let mut text = name.to_lowercase();
    for (from, to) in TRANSLITERATIONS.iter().chain(COMPOUND_REPLACEMENTS) {
        text = text.replace(from, to);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    out.trim_matches('-').to_string()
}

/// Working state threaded through the abbreviation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// Tokens not yet consumed.
    pub remaining: VecDeque<String>,
    /// Output tokens, in order.
    pub output: Vec<String>,
    /// Whether the competition is a mini league.
    pub is_mini: bool,
    /// Set by a rule to discard everything that is left.
    pub finished: bool,
}

impl TokenStream {
    /// Sanitizes `name` and splits it into tokens.
    pub fn from_name(name: &str) -> Self {
        Self {
            remaining: sanitize_for_filename(name)
                .split('-')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            ..Default::default()
        }
    }

    fn peek(&self) -> Option<&str> {
        self.remaining.front().map(String::as_str)
    }

    fn peek_second(&self) -> Option<&str> {
        self.remaining.get(1).map(String::as_str)
    }

    fn consume(&mut self) -> Option<String> {
        self.remaining.pop_front()
    }

    fn emit(&mut self, token: impl Into<String>) {
        self.output.push(token.into());
    }

    /// Joins the output tokens with hyphens.
    pub fn identifier(&self) -> String {
        self.output.join("-")
    }
}

/// One consume-if-match step of the abbreviation pipeline.
pub trait AbbreviationRule: Send + Sync {
    /// Returns the rule name.
    fn name(&self) -> &'static str;

    /// Inspects the head of the stream and consumes what it recognizes.
    fn apply(&self, stream: &mut TokenStream);
}

/// Strips a leading `mini` marker (only when something follows it).
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniMarker;

impl AbbreviationRule for MiniMarker {
    fn name(&self) -> &'static str {
        "mini_marker"
    }

    fn apply(&self, stream: &mut TokenStream) {
        if stream.peek() == Some("mini") && stream.remaining.len() > 1 {
            stream.consume();
            stream.is_mini = true;
        }
    }
}

/// Maps `damen`/`herren` to `da`/`he`, or keeps an age group token verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenderOrAgeGroup;

impl AbbreviationRule for GenderOrAgeGroup {
    fn name(&self) -> &'static str {
        "gender_or_age_group"
    }

    fn apply(&self, stream: &mut TokenStream) {
        let short = match stream.peek() {
            Some("damen") => "da".to_string(),
            Some("herren") => "he".to_string(),
            Some(token) if AGE_GROUP_REGEX.is_match(token) => token.to_string(),
            _ => return,
        };
        stream.consume();
        stream.emit(short);
    }
}

/// Recognizes `bbv pokal` or `pokal`; cup identifiers are the prefix plus
/// `pokal`, whatever follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct CupCompetition;

impl AbbreviationRule for CupCompetition {
    fn name(&self) -> &'static str {
        "cup_competition"
    }

    fn apply(&self, stream: &mut TokenStream) {
        let matched = match (stream.peek(), stream.peek_second()) {
            (Some("bbv"), Some("pokal")) => 2,
            (Some("pokal"), _) => 1,
            _ => return,
        };
        for _ in 0..matched {
            stream.consume();
        }
        stream.emit("pokal");
        stream.finished = true;
    }
}

/// Shortens a league token (`*liga*`) to its first letter plus `l`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeagueLevel;

impl AbbreviationRule for LeagueLevel {
    fn name(&self) -> &'static str {
        "league_level"
    }

    fn apply(&self, stream: &mut TokenStream) {
        let Some(first) = stream
            .peek()
            .filter(|t| t.contains("liga"))
            .and_then(|t| t.chars().next())
        else {
            return;
        };
        stream.consume();
        stream.emit(format!("{}l", first));
    }
}

/// In mini leagues, shortens the level word (`fortgeschrittene`) to its
/// first letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniLevel;

impl AbbreviationRule for MiniLevel {
    fn name(&self) -> &'static str {
        "mini_level"
    }

    fn apply(&self, stream: &mut TokenStream) {
        if !stream.is_mini {
            return;
        }
        let Some(first) = stream
            .peek()
            .filter(|t| t.len() >= 3 && t.chars().all(|c| c.is_ascii_alphabetic()))
            .and_then(|t| t.chars().next())
        else {
            return;
        };
        stream.consume();
        stream.emit(first.to_string());
    }
}

/// Keeps all remaining tokens as division/group suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivisionSuffix;

impl AbbreviationRule for DivisionSuffix {
    fn name(&self) -> &'static str {
        "division_suffix"
    }

    fn apply(&self, stream: &mut TokenStream) {
        while let Some(token) = stream.consume() {
            if token.chars().all(|c| c.is_ascii_alphanumeric()) {
                stream.emit(token);
            }
        }
    }
}

/// An ordered abbreviation pipeline.
pub struct Abbreviator {
    rules: Vec<Box<dyn AbbreviationRule>>,
}

impl Default for Abbreviator {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MiniMarker),
            Box::new(GenderOrAgeGroup),
            Box::new(CupCompetition),
            Box::new(LeagueLevel),
            Box::new(MiniLevel),
            Box::new(DivisionSuffix),
        ])
    }
}

impl std::fmt::Debug for Abbreviator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Abbreviator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl Abbreviator {
    /// Creates a pipeline from an explicit rule order.
    pub fn new(rules: Vec<Box<dyn AbbreviationRule>>) -> Self {
        Self { rules }
    }

    /// Returns the rule names in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs the pipeline over a competition name.
    pub fn abbreviate(&self, competition_name: &str) -> String {
        let mut stream = TokenStream::from_name(competition_name);
        for rule in &self.rules {
            if stream.finished {
                break;
            }
            rule.apply(&mut stream);
        }
        stream.identifier()
    }
}

/// Abbreviates a competition name with the default pipeline.
pub fn abbreviate(competition_name: &str) -> String {
    static DEFAULT: LazyLock<Abbreviator> = LazyLock::new(Abbreviator::default);
    DEFAULT.abbreviate(competition_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(name: &str) -> TokenStream {
        TokenStream::from_name(name)
    }

    mod sanitize {
        use super::*;

        #[test]
        fn transliterates_and_collapses() {
            assert_eq!(sanitize_for_filename("Kreisliga Süd"), "kreisliga-sued");
            assert_eq!(sanitize_for_filename("  Größe -- Maß  "), "groesse-mass");
            assert_eq!(sanitize_for_filename("Oberliga (Rückrunde)"), "oberliga-rr");
        }

        #[test]
        fn uppercase_umlauts() {
            assert_eq!(sanitize_for_filename("ÜBUNGSLIGA"), "uebungsliga");
        }

        #[test]
        fn empty_input() {
            assert_eq!(sanitize_for_filename(""), "");
            assert_eq!(sanitize_for_filename("---"), "");
        }
    }

    mod rules {
        use super::*;

        #[test]
        fn mini_marker_needs_a_follower() {
            let mut s = stream("Mini U11");
            MiniMarker.apply(&mut s);
            assert!(s.is_mini);
            assert_eq!(s.remaining, vec!["u11"]);

            let mut s = stream("Mini");
            MiniMarker.apply(&mut s);
            assert!(!s.is_mini);
        }

        #[test]
        fn gender_prefixes() {
            let mut s = stream("Damen Landesliga");
            GenderOrAgeGroup.apply(&mut s);
            assert_eq!(s.output, vec!["da"]);

            let mut s = stream("wU14 Oberliga");
            GenderOrAgeGroup.apply(&mut s);
            assert_eq!(s.output, vec!["wu14"]);

            let mut s = stream("Senioren Liga");
            GenderOrAgeGroup.apply(&mut s);
            assert!(s.output.is_empty());
        }

        #[test]
        fn cup_terminates() {
            let mut s = stream("BBV Pokal Herren");
            CupCompetition.apply(&mut s);
            assert!(s.finished);
            assert_eq!(s.output, vec!["pokal"]);
            assert_eq!(s.remaining, vec!["herren"]);
        }

        #[test]
        fn bbv_without_pokal_is_not_a_cup() {
            let mut s = stream("BBV Liga");
            CupCompetition.apply(&mut s);
            assert!(!s.finished);
            assert!(s.output.is_empty());
        }

        #[test]
        fn league_level() {
            let mut s = stream("Bezirksliga A");
            LeagueLevel.apply(&mut s);
            assert_eq!(s.output, vec!["bl"]);
        }

        #[test]
        fn mini_level_requires_alphabetic_word() {
            let mut s = stream("Fortgeschrittene 1");
            s.is_mini = true;
            MiniLevel.apply(&mut s);
            assert_eq!(s.output, vec!["f"]);

            let mut s = stream("1 Fortgeschrittene");
            s.is_mini = true;
            MiniLevel.apply(&mut s);
            assert!(s.output.is_empty());

            let mut s = stream("Fortgeschrittene");
            MiniLevel.apply(&mut s);
            assert!(s.output.is_empty());
        }
    }

    mod pipeline {
        use super::*;

        #[test]
        fn rule_order() {
            assert_eq!(
                Abbreviator::default().rule_names(),
                vec![
                    "mini_marker",
                    "gender_or_age_group",
                    "cup_competition",
                    "league_level",
                    "mini_level",
                    "division_suffix",
                ]
            );
        }

        #[test]
        fn reference_names() {
            assert_eq!(abbreviate("Herren Bezirksliga A"), "he-bl-a");
            assert_eq!(abbreviate("BBV Pokal Herren"), "pokal");
            assert_eq!(abbreviate("Mini U11 Fortgeschrittene 1"), "u11-f-1");
        }

        #[test]
        fn more_competitions() {
            assert_eq!(abbreviate("Damen Kreisliga"), "da-kl");
            assert_eq!(abbreviate("U14 Pokal Damen"), "u14-pokal");
            assert_eq!(abbreviate("mU16 Oberliga B"), "mu16-ol-b");
            assert_eq!(abbreviate("Herren Landesliga Rückrunde"), "he-ll-rr");
            assert_eq!(abbreviate("Freizeitrunde Mixed"), "freizeitrunde-mixed");
            assert_eq!(abbreviate(""), "");
        }

        #[test]
        fn spelling_variants_collide() {
            let expected = abbreviate("Herren Bezirksliga Süd");
            assert_eq!(expected, "he-bl-sued");
            assert_eq!(abbreviate("  HERREN   bezirksliga  sued "), expected);
            assert_eq!(abbreviate("Herren-Bezirksliga Süd"), expected);
        }

        #[test]
        fn distinct_divisions_stay_distinct() {
            assert_ne!(
                abbreviate("Herren Bezirksliga A"),
                abbreviate("Herren Bezirksliga B")
            );
        }

        #[test]
        fn deterministic() {
            let name = "Mini U10 Anfänger 2";
            assert_eq!(abbreviate(name), abbreviate(name));
            assert_eq!(abbreviate(name), "u10-a-2");
        }
    }
}
