use serde::Serialize;

use crate::state::{MatchupConfig, SpreadDirection};

// Projection edges inside this band are treated as noise: no call.
const EDGE_DEAD_ZONE: f64 = 0.3;
// Percent of cover/over probability per point of projected edge.
const PROB_PER_POINT: f64 = 20.0;

#[derive(Debug, Clone, Serialize)]
pub struct OverUnderRec {
    pub recommendation: String,
    pub prob_over: f64,
    pub prob_under: f64,
    pub ev_without_odds: f64,
    pub ev_with_odds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadRec {
    pub recommendation: String,
    pub prob_cover: f64,
    pub prob_not_cover: f64,
    pub ev_without_odds: f64,
    pub ev_with_odds: f64,
}

fn fmt_points(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// Over/under call against the configured total line; `None` while the line
/// is inactive (0). Both EVs are intentionally computed from the over
/// probability regardless of which side the call lands on.
pub fn over_under_recommendation(
    projected_total: f64,
    config: &MatchupConfig,
) -> Option<OverUnderRec> {
    if config.total_line <= 0.0 {
        return None;
    }
    let diff = projected_total - config.total_line;
    let prob_over = if diff > 0.0 {
        (50.0 + diff * PROB_PER_POINT).min(80.0)
    } else {
        (50.0 - diff.abs() * PROB_PER_POINT).max(20.0)
    };
    let recommendation = if diff > EDGE_DEAD_ZONE {
        format!("OVER {}", fmt_points(config.total_line))
    } else if diff < -EDGE_DEAD_ZONE {
        format!("UNDER {}", fmt_points(config.total_line))
    } else {
        "NO EDGE".to_string()
    };
    let ev_with_odds = if config.total_odds > 1.0 {
        prob_over / 100.0 * config.total_odds - 1.0
    } else {
        // Odds at or below 1.0 cannot pay out; treat as absent.
        0.0
    };
    Some(OverUnderRec {
        recommendation,
        prob_over,
        prob_under: 100.0 - prob_over,
        ev_without_odds: prob_over / 100.0 - 0.5,
        ev_with_odds,
    })
}

/// Spread call from the chosen favorite's perspective; margin and spread are
/// both negated when the favorite is team 2 so the comparison math never
/// branches. `None` while the spread is inactive (0).
pub fn spread_recommendation(
    projected_margin: f64,
    config: &MatchupConfig,
) -> Option<SpreadRec> {
    if config.point_spread <= 0.0 {
        return None;
    }
    let (adjusted_margin, spread) = match config.spread_direction {
        SpreadDirection::Team1 => (projected_margin, config.point_spread),
        SpreadDirection::Team2 => (-projected_margin, -config.point_spread),
    };
    let prob_cover = (50.0 + (adjusted_margin - spread) * PROB_PER_POINT).clamp(20.0, 80.0);

    let (favorite, underdog, favorite_odds) = match config.spread_direction {
        SpreadDirection::Team1 => (
            config.team1_name.as_str(),
            config.team2_name.as_str(),
            config.spread_odds_team1,
        ),
        SpreadDirection::Team2 => (
            config.team2_name.as_str(),
            config.team1_name.as_str(),
            config.spread_odds_team2,
        ),
    };
    let recommendation = if adjusted_margin > spread + EDGE_DEAD_ZONE {
        format!("{favorite} -{}", fmt_points(config.point_spread))
    } else if adjusted_margin < spread - EDGE_DEAD_ZONE {
        format!("{underdog} +{}", fmt_points(config.point_spread))
    } else {
        "NO EDGE".to_string()
    };
    let ev_with_odds = if favorite_odds > 1.0 {
        prob_cover / 100.0 * favorite_odds - 1.0
    } else {
        0.0
    };
    Some(SpreadRec {
        recommendation,
        prob_cover,
        prob_not_cover: 100.0 - prob_cover,
        ev_without_odds: prob_cover / 100.0 - 0.5,
        ev_with_odds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchupConfig {
        MatchupConfig {
            team1_name: "Barcelona".to_string(),
            team2_name: "Real Madrid".to_string(),
            total_line: 2.5,
            total_odds: 1.90,
            point_spread: 0.5,
            spread_odds_team1: 1.85,
            spread_odds_team2: 1.95,
            ..MatchupConfig::default()
        }
    }

    #[test]
    fn inactive_lines_produce_no_recommendation() {
        let mut cfg = config();
        cfg.total_line = 0.0;
        cfg.point_spread = 0.0;
        assert!(over_under_recommendation(3.2, &cfg).is_none());
        assert!(spread_recommendation(1.0, &cfg).is_none());
    }

    #[test]
    fn clear_over_edge() {
        // diff = 0.7: OVER 2.5 at probability min(80, 50 + 14) = 64.
        let rec = over_under_recommendation(3.2, &config()).expect("line active");
        assert_eq!(rec.recommendation, "OVER 2.5");
        assert!((rec.prob_over - 64.0).abs() < 1e-9);
        assert!((rec.prob_under - 36.0).abs() < 1e-9);
        assert!((rec.ev_without_odds - 0.14).abs() < 1e-9);
        assert!((rec.ev_with_odds - (0.64 * 1.90 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn under_edge_still_prices_the_over() {
        let rec = over_under_recommendation(1.5, &config()).expect("line active");
        assert_eq!(rec.recommendation, "UNDER 2.5");
        assert!((rec.prob_over - 30.0).abs() < 1e-9);
        // EV deliberately stays keyed to the over probability.
        assert!((rec.ev_without_odds - (-0.2)).abs() < 1e-9);
    }

    #[test]
    fn dead_zone_means_no_edge() {
        let rec = over_under_recommendation(2.7, &config()).expect("line active");
        assert_eq!(rec.recommendation, "NO EDGE");
    }

    #[test]
    fn over_probability_is_capped() {
        let rec = over_under_recommendation(9.0, &config()).expect("line active");
        assert!((rec.prob_over - 80.0).abs() < 1e-9);
        let rec = over_under_recommendation(0.5, &config()).expect("line active");
        assert!((rec.prob_over - 20.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_odds_zero_the_priced_ev() {
        let mut cfg = config();
        cfg.total_odds = 1.0;
        let rec = over_under_recommendation(3.2, &cfg).expect("line active");
        assert_eq!(rec.ev_with_odds, 0.0);
    }

    #[test]
    fn favorite_covers_comfortably() {
        // Margin 1.2 against a 0.5 spread: cover prob 50 + 0.7*20 = 64.
        let rec = spread_recommendation(1.2, &config()).expect("spread active");
        assert_eq!(rec.recommendation, "Barcelona -0.5");
        assert!((rec.prob_cover - 64.0).abs() < 1e-9);
        assert!((rec.ev_with_odds - (0.64 * 1.85 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn underdog_side_when_favorite_falls_short() {
        let rec = spread_recommendation(-0.5, &config()).expect("spread active");
        assert_eq!(rec.recommendation, "Real Madrid +0.5");
        assert!(rec.prob_cover < 50.0);
    }

    #[test]
    fn team2_direction_negates_margin_and_spread() {
        let mut cfg = config();
        cfg.spread_direction = SpreadDirection::Team2;
        // Team 2 favored by 0.5 while the projection says team 1 by 1.2:
        // adjusted margin -1.2 vs spread -0.5 leaves the underdog side.
        let rec = spread_recommendation(1.2, &cfg).expect("spread active");
        assert_eq!(rec.recommendation, "Barcelona +0.5");
        // prob_cover = 50 + (-1.2 - (-0.5)) * 20 = 36, from team 2's odds.
        assert!((rec.prob_cover - 36.0).abs() < 1e-9);
        assert!((rec.ev_with_odds - (0.36 * 1.95 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn cover_probability_is_clamped() {
        let rec = spread_recommendation(5.0, &config()).expect("spread active");
        assert!((rec.prob_cover - 80.0).abs() < 1e-9);
        let rec = spread_recommendation(-5.0, &config()).expect("spread active");
        assert!((rec.prob_cover - 20.0).abs() < 1e-9);
    }
}
