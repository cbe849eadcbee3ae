use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::IMPORTANCE_KEYS;
use crate::parse;
use crate::predict::{self, Prediction};
use crate::sample::Scenario;

pub const DEFAULT_ODDS: f64 = 1.90;
pub const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no scores entered")]
    EmptyBatch,
    #[error("scores must be valid numbers")]
    InvalidScore,
    #[error("scores must be non-negative")]
    NegativeScore,
    #[error("add match data before analyzing")]
    NoMatchData,
    #[error("both teams need a name")]
    BlankTeamName,
    #[error("team names must be different")]
    SameTeamNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Basketball,
}

impl Sport {
    pub fn label(self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
        }
    }

    /// Assumed per-team score when a team has no recorded matches yet.
    pub fn baseline_score(self) -> f64 {
        match self {
            Sport::Football => 1.3,
            Sport::Basketball => 100.0,
        }
    }

    /// Typical combined score for the sport, the anchor for the scoring
    /// trend and for low-data regression.
    pub fn league_average(self) -> f64 {
        match self {
            Sport::Football => 2.5,
            Sport::Basketball => 220.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Team1Home,
    Team2Home,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadDirection {
    Team1,
    Team2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    H2h,
    Team1,
    Team2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Team1Wins,
    Team2Wins,
    OpponentWins,
    Draw,
}

impl Outcome {
    /// Display label with the configured team names substituted in, so
    /// renaming a team never stales already-entered records.
    pub fn label(self, team1: &str, team2: &str) -> String {
        match self {
            Outcome::Team1Wins => format!("{team1} Wins"),
            Outcome::Team2Wins => format!("{team2} Wins"),
            Outcome::OpponentWins => "Opponent Wins".to_string(),
            Outcome::Draw => "Draw".to_string(),
        }
    }
}

/// One observed match result. In `Team2`-category records the score fields
/// are swapped at insertion: `team1_score` holds the opponent's score and
/// `team2_score` the team's own, so "team 2 scored" is always `team2_score`
/// across both the h2h and team2 collections.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_number: u32,
    pub team1_score: f64,
    pub team2_score: f64,
    pub total_score: f64,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl MatchRecord {
    fn build(
        category: Category,
        match_number: u32,
        score: f64,
        opp_score: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (team1_score, team2_score) = match category {
            Category::Team2 => (opp_score, score),
            Category::H2h | Category::Team1 => (score, opp_score),
        };
        let outcome = match category {
            Category::H2h => {
                if team1_score > team2_score {
                    Outcome::Team1Wins
                } else if team2_score > team1_score {
                    Outcome::Team2Wins
                } else {
                    Outcome::Draw
                }
            }
            Category::Team1 => {
                if team1_score > team2_score {
                    Outcome::Team1Wins
                } else if team2_score > team1_score {
                    Outcome::OpponentWins
                } else {
                    Outcome::Draw
                }
            }
            Category::Team2 => {
                if team2_score > team1_score {
                    Outcome::Team2Wins
                } else if team1_score > team2_score {
                    Outcome::OpponentWins
                } else {
                    Outcome::Draw
                }
            }
        };
        Self {
            match_number,
            team1_score,
            team2_score,
            total_score: team1_score + team2_score,
            outcome,
            timestamp,
        }
    }
}

/// The three disjoint record collections. Submitting a category replaces it
/// wholesale; records within a category stay sorted ascending by timestamp.
#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    h2h: Vec<MatchRecord>,
    team1: Vec<MatchRecord>,
    team2: Vec<MatchRecord>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self, category: Category) -> &[MatchRecord] {
        match category {
            Category::H2h => &self.h2h,
            Category::Team1 => &self.team1,
            Category::Team2 => &self.team2,
        }
    }

    pub fn h2h(&self) -> &[MatchRecord] {
        &self.h2h
    }

    pub fn team1(&self) -> &[MatchRecord] {
        &self.team1
    }

    pub fn team2(&self) -> &[MatchRecord] {
        &self.team2
    }

    pub fn total_matches(&self) -> usize {
        self.h2h.len() + self.team1.len() + self.team2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_matches() == 0
    }

    /// Validates the whole batch, then replaces the category. Pairs are
    /// (own score, opponent score) for the team categories and
    /// (team 1 score, team 2 score) for h2h. Timestamps are synthetic:
    /// the i-th of n submitted matches is stamped n-i weeks back, so the
    /// last entry is the most recent.
    pub fn submit_scores(
        &mut self,
        category: Category,
        pairs: &[(f64, f64)],
    ) -> Result<usize, InputError> {
        if pairs.is_empty() {
            return Err(InputError::EmptyBatch);
        }
        if pairs.iter().any(|(a, b)| !a.is_finite() || !b.is_finite()) {
            return Err(InputError::InvalidScore);
        }
        if pairs.iter().any(|(a, b)| *a < 0.0 || *b < 0.0) {
            return Err(InputError::NegativeScore);
        }

        let now = Utc::now();
        let n = pairs.len();
        let mut records: Vec<MatchRecord> = pairs
            .iter()
            .copied()
            .enumerate()
            .map(|(i, (score, opp_score))| {
                let timestamp = now - Duration::weeks((n - i) as i64);
                MatchRecord::build(category, (i + 1) as u32, score, opp_score, timestamp)
            })
            .collect();
        records.sort_by_key(|r| r.timestamp);

        match category {
            Category::H2h => self.h2h = records,
            Category::Team1 => self.team1 = records,
            Category::Team2 => self.team2 = records,
        }
        Ok(n)
    }

    pub fn clear_all(&mut self) {
        self.h2h.clear();
        self.team1.clear();
        self.team2.clear();
    }
}

/// Everything a prediction run needs besides the match records. Passed into
/// `predict` explicitly; there is no process-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchupConfig {
    pub sport: Sport,
    pub team1_name: String,
    pub team2_name: String,
    pub team1_ranking: u32,
    pub team2_ranking: u32,
    pub importance: String,
    pub location: Location,
    pub total_line: f64,
    pub point_spread: f64,
    pub spread_direction: SpreadDirection,
    pub total_odds: f64,
    pub spread_odds_team1: f64,
    pub spread_odds_team2: f64,
}

impl Default for MatchupConfig {
    fn default() -> Self {
        Self {
            sport: Sport::Football,
            team1_name: "Team 1".to_string(),
            team2_name: "Team 2".to_string(),
            team1_ranking: 0,
            team2_ranking: 0,
            importance: "regular".to_string(),
            location: Location::Neutral,
            total_line: 0.0,
            point_spread: 0.0,
            spread_direction: SpreadDirection::Team1,
            total_odds: DEFAULT_ODDS,
            spread_odds_team1: DEFAULT_ODDS,
            spread_odds_team2: DEFAULT_ODDS,
        }
    }
}

pub fn recency_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - timestamp).num_days();
    if days <= 0 {
        "Today".to_string()
    } else if days == 1 {
        "Yesterday".to_string()
    } else {
        format!("{days} days ago")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sport,
    Team1Name,
    Team2Name,
    Team1Ranking,
    Team2Ranking,
    Importance,
    Location,
    H2hTeam1,
    H2hTeam2,
    Team1Scores,
    Team1Opponent,
    Team2Scores,
    Team2Opponent,
    TotalLine,
    TotalOdds,
    PointSpread,
    SpreadDirection,
    SpreadOddsTeam1,
    SpreadOddsTeam2,
}

pub const FIELDS: [Field; 19] = [
    Field::Sport,
    Field::Team1Name,
    Field::Team2Name,
    Field::Team1Ranking,
    Field::Team2Ranking,
    Field::Importance,
    Field::Location,
    Field::H2hTeam1,
    Field::H2hTeam2,
    Field::Team1Scores,
    Field::Team1Opponent,
    Field::Team2Scores,
    Field::Team2Opponent,
    Field::TotalLine,
    Field::TotalOdds,
    Field::PointSpread,
    Field::SpreadDirection,
    Field::SpreadOddsTeam1,
    Field::SpreadOddsTeam2,
];

impl Field {
    /// Cycle fields step through a fixed option list instead of taking text.
    pub fn is_cycle(self) -> bool {
        matches!(
            self,
            Field::Sport | Field::Importance | Field::Location | Field::SpreadDirection
        )
    }

    /// The score-entry category this field belongs to, if any.
    pub fn category(self) -> Option<Category> {
        match self {
            Field::H2hTeam1 | Field::H2hTeam2 => Some(Category::H2h),
            Field::Team1Scores | Field::Team1Opponent => Some(Category::Team1),
            Field::Team2Scores | Field::Team2Opponent => Some(Category::Team2),
            _ => None,
        }
    }
}

/// All interactive state for the terminal app: the store, the raw form
/// buffers, the selection cursor and the status log. Text buffers are parsed
/// with the strict parse-or-default helpers only when a prediction runs.
pub struct AppState {
    pub store: MatchStore,
    pub sport: Sport,
    pub importance: String,
    pub location: Location,
    pub spread_direction: SpreadDirection,
    pub team1_name: String,
    pub team2_name: String,
    pub team1_ranking: String,
    pub team2_ranking: String,
    pub h2h_team1: String,
    pub h2h_team2: String,
    pub team1_scores: String,
    pub team1_opponent: String,
    pub team2_scores: String,
    pub team2_opponent: String,
    pub total_line: String,
    pub total_odds: String,
    pub point_spread: String,
    pub spread_odds_team1: String,
    pub spread_odds_team2: String,
    pub selected: usize,
    pub editing: bool,
    pub edit_backup: String,
    pub pending_clear: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub last_prediction: Option<Prediction>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: MatchStore::new(),
            sport: Sport::Football,
            importance: "regular".to_string(),
            location: Location::Neutral,
            spread_direction: SpreadDirection::Team1,
            team1_name: String::new(),
            team2_name: String::new(),
            team1_ranking: String::new(),
            team2_ranking: String::new(),
            h2h_team1: String::new(),
            h2h_team2: String::new(),
            team1_scores: String::new(),
            team1_opponent: String::new(),
            team2_scores: String::new(),
            team2_opponent: String::new(),
            total_line: String::new(),
            total_odds: String::new(),
            point_spread: String::new(),
            spread_odds_team1: String::new(),
            spread_odds_team2: String::new(),
            selected: 0,
            editing: false,
            edit_backup: String::new(),
            pending_clear: false,
            help_overlay: false,
            logs: VecDeque::new(),
            last_prediction: None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    pub fn team1_label(&self) -> String {
        parse::non_blank_or(&self.team1_name, "Team 1")
    }

    pub fn team2_label(&self) -> String {
        parse::non_blank_or(&self.team2_name, "Team 2")
    }

    pub fn selected_field(&self) -> Field {
        FIELDS[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FIELDS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + FIELDS.len() - 1) % FIELDS.len();
    }

    pub fn field_label(&self, field: Field) -> String {
        match field {
            Field::Sport => "Sport".to_string(),
            Field::Team1Name => "Team 1 name".to_string(),
            Field::Team2Name => "Team 2 name".to_string(),
            Field::Team1Ranking => format!("{} ranking", self.team1_label()),
            Field::Team2Ranking => format!("{} ranking", self.team2_label()),
            Field::Importance => "Match importance".to_string(),
            Field::Location => "Match location".to_string(),
            Field::H2hTeam1 => format!("H2H {} scores", self.team1_label()),
            Field::H2hTeam2 => format!("H2H {} scores", self.team2_label()),
            Field::Team1Scores => format!("{} scores", self.team1_label()),
            Field::Team1Opponent => format!("{} opponents", self.team1_label()),
            Field::Team2Scores => format!("{} scores", self.team2_label()),
            Field::Team2Opponent => format!("{} opponents", self.team2_label()),
            Field::TotalLine => "Total line".to_string(),
            Field::TotalOdds => "Total odds".to_string(),
            Field::PointSpread => "Point spread".to_string(),
            Field::SpreadDirection => "Spread favorite".to_string(),
            Field::SpreadOddsTeam1 => format!("Spread odds {}", self.team1_label()),
            Field::SpreadOddsTeam2 => format!("Spread odds {}", self.team2_label()),
        }
    }

    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::Sport => self.sport.label().to_string(),
            Field::Importance => self.importance.clone(),
            Field::Location => match self.location {
                Location::Team1Home => format!("{} home", self.team1_label()),
                Location::Team2Home => format!("{} home", self.team2_label()),
                Location::Neutral => "Neutral venue".to_string(),
            },
            Field::SpreadDirection => match self.spread_direction {
                SpreadDirection::Team1 => self.team1_label(),
                SpreadDirection::Team2 => self.team2_label(),
            },
            _ => self
                .field_text(field)
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }

    fn field_text(&self, field: Field) -> Option<&str> {
        let text = match field {
            Field::Team1Name => &self.team1_name,
            Field::Team2Name => &self.team2_name,
            Field::Team1Ranking => &self.team1_ranking,
            Field::Team2Ranking => &self.team2_ranking,
            Field::H2hTeam1 => &self.h2h_team1,
            Field::H2hTeam2 => &self.h2h_team2,
            Field::Team1Scores => &self.team1_scores,
            Field::Team1Opponent => &self.team1_opponent,
            Field::Team2Scores => &self.team2_scores,
            Field::Team2Opponent => &self.team2_opponent,
            Field::TotalLine => &self.total_line,
            Field::TotalOdds => &self.total_odds,
            Field::PointSpread => &self.point_spread,
            Field::SpreadOddsTeam1 => &self.spread_odds_team1,
            Field::SpreadOddsTeam2 => &self.spread_odds_team2,
            _ => return None,
        };
        Some(text.as_str())
    }

    pub fn field_text_mut(&mut self, field: Field) -> Option<&mut String> {
        let text = match field {
            Field::Team1Name => &mut self.team1_name,
            Field::Team2Name => &mut self.team2_name,
            Field::Team1Ranking => &mut self.team1_ranking,
            Field::Team2Ranking => &mut self.team2_ranking,
            Field::H2hTeam1 => &mut self.h2h_team1,
            Field::H2hTeam2 => &mut self.h2h_team2,
            Field::Team1Scores => &mut self.team1_scores,
            Field::Team1Opponent => &mut self.team1_opponent,
            Field::Team2Scores => &mut self.team2_scores,
            Field::Team2Opponent => &mut self.team2_opponent,
            Field::TotalLine => &mut self.total_line,
            Field::TotalOdds => &mut self.total_odds,
            Field::PointSpread => &mut self.point_spread,
            Field::SpreadOddsTeam1 => &mut self.spread_odds_team1,
            Field::SpreadOddsTeam2 => &mut self.spread_odds_team2,
            _ => return None,
        };
        Some(text)
    }

    pub fn cycle_selected(&mut self) {
        match self.selected_field() {
            Field::Sport => {
                self.sport = match self.sport {
                    Sport::Football => Sport::Basketball,
                    Sport::Basketball => Sport::Football,
                };
            }
            Field::Location => {
                self.location = match self.location {
                    Location::Neutral => Location::Team1Home,
                    Location::Team1Home => Location::Team2Home,
                    Location::Team2Home => Location::Neutral,
                };
            }
            Field::SpreadDirection => {
                self.spread_direction = match self.spread_direction {
                    SpreadDirection::Team1 => SpreadDirection::Team2,
                    SpreadDirection::Team2 => SpreadDirection::Team1,
                };
            }
            Field::Importance => {
                let idx = IMPORTANCE_KEYS
                    .iter()
                    .position(|k| *k == self.importance)
                    .unwrap_or(0);
                self.importance = IMPORTANCE_KEYS[(idx + 1) % IMPORTANCE_KEYS.len()].to_string();
            }
            _ => {}
        }
    }

    pub fn begin_edit(&mut self) {
        let field = self.selected_field();
        if field.is_cycle() {
            self.cycle_selected();
            return;
        }
        if let Some(text) = self.field_text(field) {
            self.edit_backup = text.to_string();
            self.editing = true;
        }
    }

    pub fn commit_edit(&mut self) {
        self.editing = false;
    }

    pub fn cancel_edit(&mut self) {
        let field = self.selected_field();
        let backup = self.edit_backup.clone();
        if let Some(text) = self.field_text_mut(field) {
            *text = backup;
        }
        self.editing = false;
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.selected_field();
        if let Some(text) = self.field_text_mut(field) {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.selected_field();
        if let Some(text) = self.field_text_mut(field) {
            text.pop();
        }
    }

    /// Snapshot of the form parsed into an explicit config value, with the
    /// documented fallbacks (blank names, odds 1.90, inactive lines at 0).
    pub fn effective_config(&self) -> MatchupConfig {
        MatchupConfig {
            sport: self.sport,
            team1_name: self.team1_label(),
            team2_name: self.team2_label(),
            team1_ranking: parse::parse_u32_or(&self.team1_ranking, 0),
            team2_ranking: parse::parse_u32_or(&self.team2_ranking, 0),
            importance: self.importance.clone(),
            location: self.location,
            total_line: parse::parse_f64_or(&self.total_line, 0.0),
            point_spread: parse::parse_f64_or(&self.point_spread, 0.0),
            spread_direction: self.spread_direction,
            total_odds: parse::parse_f64_or(&self.total_odds, DEFAULT_ODDS),
            spread_odds_team1: parse::parse_f64_or(&self.spread_odds_team1, DEFAULT_ODDS),
            spread_odds_team2: parse::parse_f64_or(&self.spread_odds_team2, DEFAULT_ODDS),
        }
    }

    /// Submits the score buffers for one category, replacing its records.
    pub fn submit_category(&mut self, category: Category) {
        let (raw_own, raw_opp) = match category {
            Category::H2h => (&self.h2h_team1, &self.h2h_team2),
            Category::Team1 => (&self.team1_scores, &self.team1_opponent),
            Category::Team2 => (&self.team2_scores, &self.team2_opponent),
        };
        let own = match parse::parse_score_list(raw_own) {
            Ok(scores) => scores,
            Err(err) => {
                self.push_log(format!("[ERROR] {err}"));
                return;
            }
        };
        let opp = match parse::parse_score_list(raw_opp) {
            Ok(scores) => scores,
            Err(err) => {
                self.push_log(format!("[ERROR] {err}"));
                return;
            }
        };
        let pairs = parse::zip_scores(&own, &opp);
        let what = match category {
            Category::H2h => "Head-to-Head matches".to_string(),
            Category::Team1 => format!("matches for {}", self.team1_label()),
            Category::Team2 => format!("matches for {}", self.team2_label()),
        };
        match self.store.submit_scores(category, &pairs) {
            Ok(n) => {
                match category {
                    Category::H2h => {
                        self.h2h_team1.clear();
                        self.h2h_team2.clear();
                    }
                    Category::Team1 => {
                        self.team1_scores.clear();
                        self.team1_opponent.clear();
                    }
                    Category::Team2 => {
                        self.team2_scores.clear();
                        self.team2_opponent.clear();
                    }
                }
                self.pending_clear = false;
                self.push_log(format!("[INFO] Added {n} {what}"));
            }
            Err(err) => self.push_log(format!("[ERROR] {err}")),
        }
    }

    pub fn run_prediction(&mut self) {
        let config = self.effective_config();
        match predict::predict(&self.store, &config) {
            Ok(prediction) => {
                self.push_log(format!(
                    "[INFO] Prediction: {} {} - {} {}",
                    config.team1_name,
                    prediction.team1_score,
                    prediction.team2_score,
                    config.team2_name
                ));
                self.last_prediction = Some(prediction);
            }
            Err(err) => self.push_log(format!("[ERROR] {err}")),
        }
    }

    /// Clearing non-empty data takes a second press; the store-level clear
    /// itself is unconditional.
    pub fn request_clear(&mut self) {
        if self.store.is_empty() {
            self.push_log("[INFO] No match data to clear");
            return;
        }
        if !self.pending_clear {
            self.pending_clear = true;
            self.push_log("[WARN] Press c again to clear all match data");
            return;
        }
        self.store.clear_all();
        self.last_prediction = None;
        self.pending_clear = false;
        self.push_log("[INFO] All match data cleared");
    }

    pub fn load_scenario(&mut self, scenario: Scenario) {
        self.store.clear_all();
        self.sport = scenario.config.sport;
        self.importance = scenario.config.importance.clone();
        self.location = scenario.config.location;
        self.spread_direction = scenario.config.spread_direction;
        self.team1_name = scenario.config.team1_name.clone();
        self.team2_name = scenario.config.team2_name.clone();
        self.team1_ranking = scenario.config.team1_ranking.to_string();
        self.team2_ranking = scenario.config.team2_ranking.to_string();
        self.total_line = trim_number(scenario.config.total_line);
        self.total_odds = trim_number(scenario.config.total_odds);
        self.point_spread = trim_number(scenario.config.point_spread);
        self.spread_odds_team1 = trim_number(scenario.config.spread_odds_team1);
        self.spread_odds_team2 = trim_number(scenario.config.spread_odds_team2);
        for (category, pairs) in [
            (Category::H2h, &scenario.h2h),
            (Category::Team1, &scenario.team1),
            (Category::Team2, &scenario.team2),
        ] {
            if let Err(err) = self.store.submit_scores(category, pairs) {
                self.push_log(format!("[WARN] Scenario load: {err}"));
            }
        }
        self.last_prediction = None;
        self.pending_clear = false;
        self.push_log(format!("[INFO] Loaded {} scenario", self.sport.label()));
    }
}

fn trim_number(v: f64) -> String {
    if v == 0.0 {
        String::new()
    } else if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
