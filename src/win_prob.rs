use serde::Serialize;

use crate::features::FeatureSet;
use crate::state::Sport;

// Strength weights. Conceptually these sum to 1.0 across the signals; the
// per-term products below are the binding contract.
const SCORING_WEIGHT: f64 = 0.20;
const DEFENSE_WEIGHT: f64 = 0.15;
const H2H_WEIGHT: f64 = 0.25;
const MOMENTUM_WEIGHT: f64 = 0.10;
const HOME_WEIGHT: f64 = 0.10;
const RANKING_WEIGHT: f64 = 0.05;
const IMPORTANCE_WEIGHT: f64 = 0.05;

const MIN_DRAW_PROB: f64 = 0.05;
const MIN_OUTCOME_PCT: f64 = 5.0;
const ADJUST_STEP: f64 = 5.0;
const DRAW_CAP: f64 = 40.0;
const WIN_CAP: f64 = 85.0;

/// Win/draw probabilities in percent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WinProbs {
    pub team1: f64,
    pub team2: f64,
    pub draw: f64,
}

impl WinProbs {
    /// The headline confidence figure: the most likely outcome's share.
    pub fn confidence(&self) -> f64 {
        self.team1.max(self.team2).max(self.draw)
    }
}

/// Composite strength scalars for both teams. Each team's defense credit is
/// relative to the other's concession rate, and the h2h/location/ranking
/// terms flip sign between the two.
pub fn team_strengths(features: &FeatureSet) -> (f64, f64) {
    let importance_scale = features.importance * IMPORTANCE_WEIGHT + 1.0;

    let mut team1 = 0.0;
    team1 += (features.team1_avg_score - features.team2_avg_conceded) * SCORING_WEIGHT;
    team1 += (features.team2_avg_conceded - features.team1_avg_conceded) * DEFENSE_WEIGHT;
    team1 += features.h2h_advantage * H2H_WEIGHT;
    team1 += features.team1_momentum * MOMENTUM_WEIGHT;
    team1 += features.location_factor * HOME_WEIGHT;
    team1 += features.ranking_diff * RANKING_WEIGHT / 20.0;
    team1 *= importance_scale;

    let mut team2 = 0.0;
    team2 += (features.team2_avg_score - features.team1_avg_conceded) * SCORING_WEIGHT;
    team2 += (features.team1_avg_conceded - features.team2_avg_conceded) * DEFENSE_WEIGHT;
    team2 -= features.h2h_advantage * H2H_WEIGHT;
    team2 += features.team2_momentum * MOMENTUM_WEIGHT;
    team2 -= features.location_factor * HOME_WEIGHT;
    team2 -= features.ranking_diff * RANKING_WEIGHT / 20.0;
    team2 *= importance_scale;

    (team1, team2)
}

/// Turns the strength pair into the percent triple. The 5-point floor is
/// applied AFTER the scale to 100, so the floored triple can sum past 100;
/// `adjust_probabilities` renormalizes to exactly 100 afterwards.
pub fn calculate_probabilities(features: &FeatureSet, sport: Sport) -> WinProbs {
    let (s1, s2) = team_strengths(features);

    // Evenly matched teams draw more often; a large strength gap suppresses
    // the draw, floored at 5%.
    let draw_base = match sport {
        Sport::Football => 0.25,
        Sport::Basketball => 0.05,
    };
    let strength_diff = (s1 - s2).abs();
    let draw_prob = (draw_base - strength_diff * 0.1).max(MIN_DRAW_PROB);

    let mut team1_win = 0.5 + (s1 - s2) / 2.0;
    let mut team2_win = 0.5 + (s2 - s1) / 2.0;
    team1_win *= 1.0 - draw_prob;
    team2_win *= 1.0 - draw_prob;

    let total = team1_win + team2_win + draw_prob;
    WinProbs {
        team1: (team1_win / total * 100.0).max(MIN_OUTCOME_PCT),
        team2: (team2_win / total * 100.0).max(MIN_OUTCOME_PCT),
        draw: (draw_prob / total * 100.0).max(MIN_OUTCOME_PCT),
    }
}

/// Nudges the triple toward the projected outcome, then renormalizes so the
/// three shares sum to exactly 100.
pub fn adjust_probabilities(probs: WinProbs, projected_margin: f64) -> WinProbs {
    let mut team1 = probs.team1;
    let mut team2 = probs.team2;
    let mut draw = probs.draw;

    if projected_margin.abs() < 0.5 {
        draw = (draw + ADJUST_STEP).min(DRAW_CAP);
    } else if projected_margin > 0.5 {
        team1 = (team1 + ADJUST_STEP).min(WIN_CAP);
    } else if projected_margin < -0.5 {
        team2 = (team2 + ADJUST_STEP).min(WIN_CAP);
    }

    let total = team1 + team2 + draw;
    WinProbs {
        team1: team1 / total * 100.0,
        team2: team2 / total * 100.0,
        draw: draw / total * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_features() -> FeatureSet {
        FeatureSet {
            team1_avg_score: 1.5,
            team2_avg_score: 1.5,
            team1_avg_conceded: 1.0,
            team2_avg_conceded: 1.0,
            h2h_advantage: 0.0,
            team1_momentum: 0.0,
            team2_momentum: 0.0,
            scoring_trend: 0.0,
            location_factor: 0.0,
            ranking_diff: 0.0,
            importance: 1.0,
            total_matches: 6,
            h2h_matches: 3,
        }
    }

    #[test]
    fn even_matchup_splits_probability() {
        let probs = calculate_probabilities(&neutral_features(), Sport::Football);
        assert!((probs.team1 - probs.team2).abs() < 1e-9);
        assert!((probs.draw - 25.0).abs() < 1e-9);
        assert!((probs.team1 + probs.team2 + probs.draw - 100.0).abs() < 1e-9);
    }

    #[test]
    fn every_component_is_floored_at_five() {
        let mut features = neutral_features();
        // Lopsided enough that team 2's raw share goes negative.
        features.team1_avg_score = 4.0;
        features.team2_avg_score = 0.3;
        features.team1_momentum = 1.0;
        features.team2_momentum = -1.0;
        features.h2h_advantage = 1.0;
        let probs = calculate_probabilities(&features, Sport::Football);
        assert!(probs.team1 >= 5.0);
        assert!(probs.team2 >= 5.0);
        assert!(probs.draw >= 5.0);
    }

    #[test]
    fn floor_applies_after_normalization_so_sum_can_exceed_100() {
        let mut features = neutral_features();
        features.team1_avg_score = 4.0;
        features.team2_avg_score = 0.3;
        features.team1_momentum = 1.0;
        features.team2_momentum = -1.0;
        features.h2h_advantage = 1.0;
        let probs = calculate_probabilities(&features, Sport::Football);
        // Intentional, not a bug: the floored triple overshoots and only
        // the consistency adjustment brings it back to 100.
        assert!(probs.team1 + probs.team2 + probs.draw > 100.0);

        let adjusted = adjust_probabilities(probs, 3.0);
        assert!((adjusted.team1 + adjusted.team2 + adjusted.draw - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tight_margin_boosts_draw_up_to_cap() {
        let probs = WinProbs {
            team1: 35.0,
            team2: 27.0,
            draw: 38.0,
        };
        let adjusted = adjust_probabilities(probs, 0.2);
        // 38 + 5 hits the 40 cap before renormalization.
        let expected_draw = 40.0 / (35.0 + 27.0 + 40.0) * 100.0;
        assert!((adjusted.draw - expected_draw).abs() < 1e-9);
    }

    #[test]
    fn positive_margin_boosts_team1() {
        let probs = WinProbs {
            team1: 50.0,
            team2: 30.0,
            draw: 20.0,
        };
        let adjusted = adjust_probabilities(probs, 1.2);
        assert!(adjusted.team1 > 50.0);
        assert!((adjusted.team1 + adjusted.team2 + adjusted.draw - 100.0).abs() < 1e-9);
    }

    #[test]
    fn negative_margin_boosts_team2() {
        let probs = WinProbs {
            team1: 40.0,
            team2: 40.0,
            draw: 20.0,
        };
        let adjusted = adjust_probabilities(probs, -2.0);
        assert!(adjusted.team2 > adjusted.team1);
    }

    #[test]
    fn half_point_margin_hits_no_adjustment_branch() {
        let probs = WinProbs {
            team1: 40.0,
            team2: 35.0,
            draw: 25.0,
        };
        // |0.5| is neither < 0.5 nor > 0.5: the triple only renormalizes.
        let adjusted = adjust_probabilities(probs, 0.5);
        assert!((adjusted.team1 - 40.0).abs() < 1e-9);
        assert!((adjusted.draw - 25.0).abs() < 1e-9);
    }

    #[test]
    fn home_advantage_tilts_strengths() {
        let mut features = neutral_features();
        features.location_factor = 1.0;
        let (s1, s2) = team_strengths(&features);
        assert!(s1 > s2);
        // 0.10 each way, scaled by the importance factor (1.05 at regular).
        assert!((s1 - s2 - 0.2 * 1.05).abs() < 1e-9);
    }
}
