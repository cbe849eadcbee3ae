use rand::Rng;

use crate::state::{MatchupConfig, Sport, SpreadDirection};

/// A full demo setup: config plus the three score batches, ready to load
/// into a store. Pairs follow the submission convention: (team 1, team 2)
/// for h2h and (own, opponent) for the team categories.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: MatchupConfig,
    pub h2h: Vec<(f64, f64)>,
    pub team1: Vec<(f64, f64)>,
    pub team2: Vec<(f64, f64)>,
}

/// The canned walkthrough scenario for each sport.
pub fn sample_scenario(sport: Sport) -> Scenario {
    match sport {
        Sport::Football => Scenario {
            config: MatchupConfig {
                sport,
                team1_name: "Barcelona".to_string(),
                team2_name: "Real Madrid".to_string(),
                team1_ranking: 3,
                team2_ranking: 2,
                total_line: 2.5,
                total_odds: 1.90,
                point_spread: 0.5,
                spread_direction: SpreadDirection::Team1,
                spread_odds_team1: 1.85,
                spread_odds_team2: 1.95,
                ..MatchupConfig::default()
            },
            h2h: vec![(2.0, 1.0), (1.0, 1.0), (0.0, 2.0)],
            team1: vec![(3.0, 0.0), (2.0, 1.0), (1.0, 0.0)],
            team2: vec![(2.0, 1.0), (3.0, 0.0), (0.0, 1.0)],
        },
        Sport::Basketball => Scenario {
            config: MatchupConfig {
                sport,
                team1_name: "Lakers".to_string(),
                team2_name: "Celtics".to_string(),
                team1_ranking: 3,
                team2_ranking: 2,
                total_line: 220.5,
                total_odds: 1.90,
                point_spread: 0.5,
                spread_direction: SpreadDirection::Team1,
                spread_odds_team1: 1.85,
                spread_odds_team2: 1.95,
                ..MatchupConfig::default()
            },
            h2h: vec![(110.0, 108.0), (105.0, 100.0), (98.0, 102.0)],
            team1: vec![(115.0, 100.0), (110.0, 102.0), (108.0, 98.0)],
            team2: vec![(112.0, 108.0), (118.0, 110.0), (105.0, 100.0)],
        },
    }
}

/// A randomized plausible matchup for quick demos, same shape as the canned
/// scenario but with fresh scores every time.
pub fn random_scenario<R: Rng>(sport: Sport, rng: &mut R) -> Scenario {
    let matches_per_category = rng.gen_range(3..=5);
    let score = |rng: &mut R| -> f64 {
        match sport {
            Sport::Football => rng.gen_range(0..=4) as f64,
            Sport::Basketball => rng.gen_range(88..=126) as f64,
        }
    };
    let batch = |rng: &mut R| -> Vec<(f64, f64)> {
        (0..matches_per_category)
            .map(|_| (score(rng), score(rng)))
            .collect()
    };

    let h2h = batch(rng);
    let team1 = batch(rng);
    let team2 = batch(rng);

    let point_spread = match sport {
        Sport::Football => [0.5, 1.5, 2.5][rng.gen_range(0..3)],
        Sport::Basketball => [3.5, 5.5, 7.5][rng.gen_range(0..3)],
    };
    let odds = |rng: &mut R| (rng.gen_range(180..=200) as f64) / 100.0;

    Scenario {
        config: MatchupConfig {
            sport,
            team1_name: "Alpha".to_string(),
            team2_name: "Omega".to_string(),
            team1_ranking: rng.gen_range(1..=20),
            team2_ranking: rng.gen_range(1..=20),
            total_line: match sport {
                Sport::Football => 2.5,
                Sport::Basketball => 220.5,
            },
            total_odds: odds(rng),
            point_spread,
            spread_direction: if rng.gen_bool(0.5) {
                SpreadDirection::Team1
            } else {
                SpreadDirection::Team2
            },
            spread_odds_team1: odds(rng),
            spread_odds_team2: odds(rng),
            ..MatchupConfig::default()
        },
        h2h,
        team1,
        team2,
    }
}
