use crate::features::FeatureSet;
use crate::state::Sport;

// Below this sample size the projections regress toward the league average
// (total) or get damped (margin).
const LOW_SAMPLE_MATCHES: usize = 4;

fn pick(sport: Sport, football: f64, basketball: f64) -> f64 {
    match sport {
        Sport::Football => football,
        Sport::Basketball => basketball,
    }
}

/// Expected combined score: each side's attack averaged against the other's
/// concession rate, nudged by the scoring trend and the match context.
pub fn projected_total(features: &FeatureSet, sport: Sport) -> f64 {
    let mut total = (features.team1_avg_score
        + features.team2_avg_conceded
        + features.team2_avg_score
        + features.team1_avg_conceded)
        / 2.0;
    total += features.scoring_trend * pick(sport, 0.5, 10.0);

    // Throwaway matches tend to open up; high-stakes ones tighten.
    if features.importance < 1.0 {
        total *= 1.1;
    } else if features.importance > 1.2 {
        total *= 0.9;
    }

    if features.total_matches < LOW_SAMPLE_MATCHES {
        total = total * 0.7 + sport.league_average() * 0.3;
    }

    total.max(pick(sport, 0.5, 50.0))
}

/// Expected team1-minus-team2 score difference.
pub fn projected_margin(features: &FeatureSet, sport: Sport) -> f64 {
    let mut margin = (features.team1_avg_score - features.team2_avg_conceded)
        - (features.team2_avg_score - features.team1_avg_conceded);
    margin += features.h2h_advantage * pick(sport, 0.5, 5.0);
    margin += (features.team1_momentum - features.team2_momentum) * pick(sport, 0.3, 3.0);
    margin += features.location_factor * pick(sport, 0.4, 4.0);
    margin += features.ranking_diff * pick(sport, 0.02, 0.2);

    // Favorites dominate more in high-stakes matches.
    if features.importance > 1.2 {
        margin *= 1.1;
    }
    if features.total_matches < LOW_SAMPLE_MATCHES {
        margin *= 0.7;
    }
    margin
}

/// Splits total and margin into a concrete score line. Each side rounds
/// independently, so the pair can disagree with the rounded total; the
/// per-side rounding is the contract, do not reconcile them.
pub fn projected_scores(total: f64, margin: f64) -> (u32, u32) {
    let team1 = ((total / 2.0) + (margin / 2.0)).round().max(0.0) as u32;
    let team2 = ((total / 2.0) - (margin / 2.0)).round().max(0.0) as u32;
    (team1, team2)
}
