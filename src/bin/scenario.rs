use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use matchup_terminal::predict::predict;
use matchup_terminal::state::{Category, MatchStore, MatchupConfig};

#[derive(Debug, serde::Deserialize)]
struct ScenarioCase {
    #[serde(default)]
    config: MatchupConfig,
    #[serde(default)]
    h2h: Vec<(f64, f64)>,
    #[serde(default)]
    team1: Vec<(f64, f64)>,
    #[serde(default)]
    team2: Vec<(f64, f64)>,
}

// This binary is intentionally simple: it loads one scenario file and prints
// the engine output. Useful for tuning the heuristics without the TUI.
fn main() -> anyhow::Result<()> {
    let mut as_json = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            as_json = true;
        } else {
            path = Some(PathBuf::from(arg));
        }
    }
    let path = path.unwrap_or_else(|| PathBuf::from("tests/fixtures/scenario_football.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let case: ScenarioCase = serde_json::from_str(&raw).context("parse scenario")?;

    let mut store = MatchStore::new();
    for (category, pairs) in [
        (Category::H2h, &case.h2h),
        (Category::Team1, &case.team1),
        (Category::Team2, &case.team2),
    ] {
        if !pairs.is_empty() {
            store.submit_scores(category, pairs)?;
        }
    }

    let prediction = predict(&store, &case.config)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let config = &case.config;
    let probs = &prediction.probabilities;
    println!(
        "{} {} - {} {}",
        config.team1_name, prediction.team1_score, prediction.team2_score, config.team2_name
    );
    println!(
        "{}: {:.1}%  Draw: {:.1}%  {}: {:.1}%",
        config.team1_name, probs.team1, probs.draw, config.team2_name, probs.team2
    );
    println!(
        "Projected total {:.2}, margin {:+.2}",
        prediction.projected_total, prediction.projected_margin
    );
    if let Some(ou) = &prediction.over_under {
        println!(
            "Total line: {} ({:.1}% over), EV {:+.2} flat / {:+.2} priced",
            ou.recommendation, ou.prob_over, ou.ev_without_odds, ou.ev_with_odds
        );
    }
    if let Some(spread) = &prediction.spread {
        println!(
            "Spread: {} ({:.1}% cover), EV {:+.2} flat / {:+.2} priced",
            spread.recommendation, spread.prob_cover, spread.ev_without_odds, spread.ev_with_odds
        );
    }
    Ok(())
}
