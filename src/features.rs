use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::state::{Location, MatchStore, MatchupConfig, Sport};

/// Fixed multipliers per match context. An unknown key is a configuration
/// bug and fails loudly instead of silently poisoning every figure
/// downstream.
pub static IMPORTANCE_MULTIPLIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("decider", 1.3),
        ("rivalry", 1.2),
        ("qualifier", 1.15),
        ("regular", 1.0),
        ("nba_playoff", 1.25),
        ("nba_allstar", 0.9),
        ("nba_playin", 1.2),
        ("nba_final", 1.35),
    ])
});

/// Display/cycling order for the importance options.
pub const IMPORTANCE_KEYS: [&str; 8] = [
    "regular",
    "qualifier",
    "rivalry",
    "decider",
    "nba_playin",
    "nba_playoff",
    "nba_final",
    "nba_allstar",
];

// Momentum looks at this many most-recent matches, most recent weighted
// heaviest: (3-i)/6 for i = 0,1,2.
const MOMENTUM_WINDOW: usize = 3;
const TREND_MIN_MATCHES: usize = 3;
const H2H_MIN_MATCHES: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown match importance '{0}'")]
    UnknownImportance(String),
}

/// Scalar features for one prediction run, computed fresh from the store and
/// config and never persisted.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSet {
    pub team1_avg_score: f64,
    pub team2_avg_score: f64,
    pub team1_avg_conceded: f64,
    pub team2_avg_conceded: f64,
    pub h2h_advantage: f64,
    pub team1_momentum: f64,
    pub team2_momentum: f64,
    pub scoring_trend: f64,
    pub location_factor: f64,
    pub ranking_diff: f64,
    pub importance: f64,
    pub total_matches: usize,
    pub h2h_matches: usize,
}

pub fn importance_multiplier(key: &str) -> Result<f64, ConfigError> {
    IMPORTANCE_MULTIPLIERS
        .get(key)
        .copied()
        .ok_or_else(|| ConfigError::UnknownImportance(key.to_string()))
}

pub fn prepare_features(
    store: &MatchStore,
    config: &MatchupConfig,
) -> Result<FeatureSet, ConfigError> {
    let sport = config.sport;
    let location_factor = match config.location {
        Location::Team1Home => 1.0,
        Location::Team2Home => -1.0,
        Location::Neutral => 0.0,
    };
    // Lower ranking number = stronger team, so a lower team 1 ranking yields
    // a positive diff favoring team 1. Zero means unranked.
    let ranking_diff = if config.team1_ranking != 0 && config.team2_ranking != 0 {
        config.team2_ranking as f64 - config.team1_ranking as f64
    } else {
        0.0
    };

    Ok(FeatureSet {
        team1_avg_score: team_average(store, true, sport),
        team2_avg_score: team_average(store, false, sport),
        team1_avg_conceded: team_conceded(store, true, sport),
        team2_avg_conceded: team_conceded(store, false, sport),
        h2h_advantage: h2h_advantage(store),
        team1_momentum: momentum(store, true),
        team2_momentum: momentum(store, false),
        scoring_trend: scoring_trend(store, sport),
        location_factor,
        ranking_diff,
        importance: importance_multiplier(&config.importance)?,
        total_matches: store.total_matches(),
        h2h_matches: store.h2h().len(),
    })
}

/// Mean score across the team's relevant categories (h2h plus its own
/// collection), falling back to the sport baseline with no data.
pub fn team_average(store: &MatchStore, for_team1: bool, sport: Sport) -> f64 {
    let mut scores = Vec::new();
    if for_team1 {
        scores.extend(store.h2h().iter().map(|m| m.team1_score));
        scores.extend(store.team1().iter().map(|m| m.team1_score));
    } else {
        scores.extend(store.h2h().iter().map(|m| m.team2_score));
        scores.extend(store.team2().iter().map(|m| m.team2_score));
    }
    mean(&scores).unwrap_or_else(|| sport.baseline_score())
}

pub fn team_conceded(store: &MatchStore, for_team1: bool, sport: Sport) -> f64 {
    let mut conceded = Vec::new();
    if for_team1 {
        conceded.extend(store.h2h().iter().map(|m| m.team2_score));
        conceded.extend(store.team1().iter().map(|m| m.team2_score));
    } else {
        conceded.extend(store.h2h().iter().map(|m| m.team1_score));
        conceded.extend(store.team2().iter().map(|m| m.team1_score));
    }
    mean(&conceded).unwrap_or_else(|| sport.baseline_score())
}

/// Win-share imbalance over head-to-head meetings, in [-1, 1]. Under two
/// meetings (or no decisive ones) there is not enough signal: 0.
pub fn h2h_advantage(store: &MatchStore) -> f64 {
    if store.h2h().len() < H2H_MIN_MATCHES {
        return 0.0;
    }
    let mut team1_wins = 0usize;
    let mut team2_wins = 0usize;
    for m in store.h2h() {
        if m.team1_score > m.team2_score {
            team1_wins += 1;
        } else if m.team2_score > m.team1_score {
            team2_wins += 1;
        }
    }
    let decisive = team1_wins + team2_wins;
    if decisive == 0 {
        return 0.0;
    }
    (team1_wins as f64 - team2_wins as f64) / decisive as f64
}

/// Recent-form signal over the team's three most recent matches (h2h pooled
/// with its own category). Fewer than three pooled matches: 0.
pub fn momentum(store: &MatchStore, for_team1: bool) -> f64 {
    let mut entries: Vec<(f64, f64, DateTime<Utc>)> = Vec::new();
    if for_team1 {
        entries.extend(
            store
                .h2h()
                .iter()
                .map(|m| (m.team1_score, m.team2_score, m.timestamp)),
        );
        entries.extend(
            store
                .team1()
                .iter()
                .map(|m| (m.team1_score, m.team2_score, m.timestamp)),
        );
    } else {
        entries.extend(
            store
                .h2h()
                .iter()
                .map(|m| (m.team2_score, m.team1_score, m.timestamp)),
        );
        entries.extend(
            store
                .team2()
                .iter()
                .map(|m| (m.team2_score, m.team1_score, m.timestamp)),
        );
    }
    entries.sort_by(|a, b| b.2.cmp(&a.2));
    if entries.len() < MOMENTUM_WINDOW {
        return 0.0;
    }
    entries
        .iter()
        .take(MOMENTUM_WINDOW)
        .enumerate()
        .map(|(i, (scored, conceded, _))| {
            let weight = (MOMENTUM_WINDOW - i) as f64 / 6.0;
            if scored > conceded {
                weight
            } else if scored < conceded {
                -weight
            } else {
                0.0
            }
        })
        .sum()
}

/// Deviation of the combined-score mean from the league average, across all
/// three categories. Fewer than three records: 0.
pub fn scoring_trend(store: &MatchStore, sport: Sport) -> f64 {
    let totals: Vec<f64> = store
        .h2h()
        .iter()
        .chain(store.team1())
        .chain(store.team2())
        .map(|m| m.total_score)
        .collect();
    if totals.len() < TREND_MIN_MATCHES {
        return 0.0;
    }
    let avg = totals.iter().sum::<f64>() / totals.len() as f64;
    let league_avg = sport.league_average();
    (avg - league_avg) / league_avg
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Category;

    fn store_with(
        h2h: &[(f64, f64)],
        team1: &[(f64, f64)],
        team2: &[(f64, f64)],
    ) -> MatchStore {
        let mut store = MatchStore::new();
        if !h2h.is_empty() {
            store.submit_scores(Category::H2h, h2h).expect("valid h2h");
        }
        if !team1.is_empty() {
            store
                .submit_scores(Category::Team1, team1)
                .expect("valid team1");
        }
        if !team2.is_empty() {
            store
                .submit_scores(Category::Team2, team2)
                .expect("valid team2");
        }
        store
    }

    #[test]
    fn averages_fall_back_to_sport_baseline() {
        let store = MatchStore::new();
        assert_eq!(team_average(&store, true, Sport::Football), 1.3);
        assert_eq!(team_average(&store, false, Sport::Basketball), 100.0);
        assert_eq!(team_conceded(&store, true, Sport::Football), 1.3);
    }

    #[test]
    fn averages_pool_h2h_with_own_category() {
        let store = store_with(&[(2.0, 1.0)], &[(4.0, 0.0)], &[(3.0, 1.0)]);
        // Team 1: scored 2 (h2h) and 4 (own), conceded 1 and 0.
        assert_eq!(team_average(&store, true, Sport::Football), 3.0);
        assert_eq!(team_conceded(&store, true, Sport::Football), 0.5);
        // Team 2: scored 1 (h2h) and 3 (own, swapped storage), conceded 2 and 1.
        assert_eq!(team_average(&store, false, Sport::Football), 2.0);
        assert_eq!(team_conceded(&store, false, Sport::Football), 1.5);
    }

    #[test]
    fn h2h_advantage_needs_two_meetings() {
        let store = store_with(&[(5.0, 0.0)], &[], &[]);
        assert_eq!(h2h_advantage(&store), 0.0);
    }

    #[test]
    fn h2h_advantage_balanced_sample() {
        // One win each plus a draw: (1 - 1) / 2 = 0.
        let store = store_with(&[(2.0, 1.0), (1.0, 1.0), (0.0, 2.0)], &[], &[]);
        assert_eq!(store.h2h().len(), 3);
        assert_eq!(h2h_advantage(&store), 0.0);
    }

    #[test]
    fn h2h_advantage_all_draws_is_zero() {
        let store = store_with(&[(1.0, 1.0), (2.0, 2.0)], &[], &[]);
        assert_eq!(h2h_advantage(&store), 0.0);
    }

    #[test]
    fn h2h_advantage_one_sided() {
        let store = store_with(&[(2.0, 0.0), (3.0, 1.0), (1.0, 2.0)], &[], &[]);
        let advantage = h2h_advantage(&store);
        assert!((advantage - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn momentum_needs_three_pooled_matches() {
        let store = store_with(&[(2.0, 0.0)], &[(3.0, 0.0)], &[]);
        assert_eq!(momentum(&store, true), 0.0);
    }

    #[test]
    fn momentum_weights_recent_wins() {
        // All three wins: 0.5 + 2/6 + 1/6 = 1.0.
        let store = store_with(&[], &[(2.0, 0.0), (3.0, 1.0), (1.0, 0.0)], &[]);
        assert!((momentum(&store, true) - 1.0).abs() < 1e-12);

        // Most recent a loss, then a win, then a draw: -0.5 + 2/6 + 0.
        let store = store_with(&[], &[(1.0, 1.0), (2.0, 0.0), (0.0, 1.0)], &[]);
        assert!((momentum(&store, true) - (-0.5 + 2.0 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn scoring_trend_needs_three_records() {
        let store = store_with(&[(3.0, 1.0), (2.0, 2.0)], &[], &[]);
        assert_eq!(scoring_trend(&store, Sport::Football), 0.0);
    }

    #[test]
    fn scoring_trend_measures_deviation_from_league_average() {
        // Totals 4, 4, 4 against a 2.5 league average: (4 - 2.5) / 2.5 = 0.6.
        let store = store_with(&[(3.0, 1.0), (2.0, 2.0), (4.0, 0.0)], &[], &[]);
        assert!((scoring_trend(&store, Sport::Football) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn ranking_diff_requires_both_rankings() {
        let store = store_with(&[(1.0, 0.0)], &[], &[]);
        let mut config = MatchupConfig::default();
        config.team1_ranking = 3;
        config.team2_ranking = 0;
        let features = prepare_features(&store, &config).expect("known importance");
        assert_eq!(features.ranking_diff, 0.0);

        config.team2_ranking = 10;
        let features = prepare_features(&store, &config).expect("known importance");
        assert_eq!(features.ranking_diff, 7.0);
    }

    #[test]
    fn unknown_importance_fails_loudly() {
        let store = store_with(&[(1.0, 0.0)], &[], &[]);
        let mut config = MatchupConfig::default();
        config.importance = "friendly".to_string();
        assert!(prepare_features(&store, &config).is_err());
    }

    #[test]
    fn importance_table_is_exact() {
        assert_eq!(importance_multiplier("regular").unwrap(), 1.0);
        assert_eq!(importance_multiplier("decider").unwrap(), 1.3);
        assert_eq!(importance_multiplier("rivalry").unwrap(), 1.2);
        assert_eq!(importance_multiplier("qualifier").unwrap(), 1.15);
        assert_eq!(importance_multiplier("nba_playoff").unwrap(), 1.25);
        assert_eq!(importance_multiplier("nba_allstar").unwrap(), 0.9);
        assert_eq!(importance_multiplier("nba_playin").unwrap(), 1.2);
        assert_eq!(importance_multiplier("nba_final").unwrap(), 1.35);
    }
}
